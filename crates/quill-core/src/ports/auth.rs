//! Identity provider port.
//!
//! The engine never issues credentials; it only resolves request tokens to a
//! principal and trusts the result fully.

use uuid::Uuid;

/// Claims carried by an identity token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub exp: i64,
}

/// Token service trait - validates tokens issued by the external identity
/// provider. Token minting is exposed for tests and local tooling.
pub trait TokenService: Send + Sync {
    /// Generate a token for a user (dev/test use).
    fn generate_token(&self, user_id: Uuid, email: &str, name: &str) -> Result<String, AuthError>;

    /// Validate and decode a token.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,
}
