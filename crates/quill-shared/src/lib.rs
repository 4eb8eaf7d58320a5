//! # Quill Shared
//!
//! Request/response types for the API surface, shared between the server
//! and any Rust client.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
