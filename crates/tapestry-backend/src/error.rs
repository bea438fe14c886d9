//! Error types for backend operations

use thiserror::Error;

/// Errors that can occur in the in-memory backend
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    /// Requested record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Record already exists
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Operation failed (injected failure or unreachable service)
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// Fixture could not be parsed
    #[error("Invalid fixture: {0}")]
    Fixture(String),
}

impl From<serde_json::Error> for BackendError {
    fn from(e: serde_json::Error) -> Self {
        BackendError::Fixture(e.to_string())
    }
}
