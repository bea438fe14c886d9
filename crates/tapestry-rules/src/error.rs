//! Rule engine error types

use thiserror::Error;

/// Errors that reject a rule before it is persisted
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    /// A cultural-context action must describe educational use
    #[error(
        "Rule '{rule_id}': cultural context must be educational (mention \"educational\" or \"learning\"), got '{value}'"
    )]
    InvalidCulturalContext {
        /// Offending rule
        rule_id: String,
        /// Rejected context text
        value: String,
    },
}
