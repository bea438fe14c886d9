//! Graph engine error types

use thiserror::Error;

/// Errors that can occur in relationship graph operations
///
/// Backend failures carry only the failed operation; the backend detail is
/// logged where it happens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Validation rejected the relationship
    #[error("Invalid relationship: {0}")]
    InvalidRelationship(String),

    /// Pathway request cannot be satisfied
    #[error("Invalid pathway: {0}")]
    InvalidPathway(String),

    /// Backend call failed
    #[error("Unable to {0}")]
    Backend(&'static str),
}
