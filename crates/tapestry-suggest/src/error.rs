//! Suggestion engine error types

use thiserror::Error;

/// Errors surfaced by the suggestion engine
///
/// Backend detail is logged, not carried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SuggestError {
    /// Backend tag suggestion failed
    #[error("Unable to generate tag suggestions")]
    TagSuggestions,

    /// Backend category suggestion failed
    #[error("Unable to generate category suggestions")]
    CategorySuggestions,
}
