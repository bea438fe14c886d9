//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Engine configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] tapestry_orchestrator::ConfigError),

    /// Fixture could not be loaded
    #[error("Fixture error: {0}")]
    Fixture(#[from] tapestry_backend::BackendError),

    /// Engine operation failed
    #[error("{0}")]
    Engine(#[from] tapestry_orchestrator::OrchestratorError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Some items of a batch failed
    #[error("{failed} of {total} item(s) failed")]
    PartialFailure {
        /// Failed items
        failed: usize,
        /// Submitted items
        total: usize,
    },
}
