//! Error types for orchestrator operations

use tapestry_graph::GraphError;
use tapestry_rules::RuleError;
use tapestry_suggest::SuggestError;
use thiserror::Error;

/// Errors that can occur in orchestrator operations
///
/// Backend failures carry only the failed operation; the backend detail is
/// logged where it happens.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrchestratorError {
    /// Backend call failed
    #[error("Unable to {0}")]
    Backend(&'static str),

    /// Organization settings update rejected locally
    #[error("Invalid organization config: {0}")]
    InvalidConfig(String),

    /// Rule rejected locally
    #[error(transparent)]
    InvalidRule(#[from] RuleError),

    /// Suggestion engine error
    #[error(transparent)]
    Suggest(#[from] SuggestError),

    /// Relationship graph error
    #[error(transparent)]
    Graph(#[from] GraphError),
}
