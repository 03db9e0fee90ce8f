//! Domain errors for the user cache service.

use thiserror::Error;

/// Domain-level errors that can occur in the user cache service.
///
/// Absence of an entity is not an error: lookups return `Ok(None)`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    /// A key was malformed (non-numeric, zero or negative).
    ///
    /// Raised while constructing an [`EntityId`](crate::domain::models::EntityId),
    /// so no store or cache access happens for a rejected key.
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// The backing store could not be reached or rejected the operation.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Entity attributes failed validation before reaching the store.
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// A stored or transported value could not be decoded.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Result alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::StoreUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}
