//! # Quill Core
//!
//! The domain layer of the Quill publishing engine.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! entities, error kinds, the slug generator, repository/identity ports, and the
//! content service enforcing the post/category lifecycle and authorization rules.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;
pub mod slug;

pub use error::DomainError;
pub use service::ContentService;
