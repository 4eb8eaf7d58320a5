//! Identity provider adapter.

mod jwt;

pub use jwt::{JwtConfig, JwtTokenService};
