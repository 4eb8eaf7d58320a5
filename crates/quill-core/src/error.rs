//! Domain-level error types.

use thiserror::Error;

/// Domain errors - business rule failures surfaced by the content service.
///
/// Every failure is returned synchronously with a stable kind; nothing is
/// retried internally.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A protected operation was called without a resolved principal.
    #[error("Unauthorized")]
    Unauthorized,

    /// The authenticated principal does not own the targeted post.
    #[error("Forbidden")]
    Forbidden,

    /// The referenced entity does not exist (or is not visible to the caller).
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// Slug or name collision on create/rename.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Input failed schema constraints.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Unexpected repository fault.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            // A write that loses a uniqueness race at the store surfaces the
            // same way as a pre-check failure.
            RepoError::Constraint(msg) => DomainError::Conflict(msg),
            RepoError::NotFound => DomainError::NotFound { entity: "Resource" },
            RepoError::Connection(msg) | RepoError::Query(msg) => DomainError::Internal(msg),
        }
    }
}
