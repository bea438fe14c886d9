//! Tag and category suggestions
//!
//! Suggestions are ephemeral: produced per analysis call and never persisted
//! by the engine itself.

use serde::{Deserialize, Serialize};

/// Where a tag suggestion came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagSource {
    /// Derived from the item's text
    ContentAnalysis,

    /// Derived from cultural context analysis
    CulturalAnalysis,

    /// Proposed by community members
    CommunityInput,

    /// Proposed by a model
    AiInference,
}

/// A proposed tag with its confidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagSuggestion {
    /// The tag text
    pub tag: String,

    /// Confidence in [0.0, 1.0]
    pub confidence: f64,

    /// Human-readable justification
    #[serde(default)]
    pub reason: String,

    /// Origin of the suggestion
    pub source: TagSource,

    /// Whether the tag refers to traditional knowledge
    #[serde(default)]
    pub traditional_knowledge: bool,
}

impl TagSuggestion {
    /// Create a suggestion with no traditional-knowledge flag
    pub fn new(
        tag: impl Into<String>,
        confidence: f64,
        reason: impl Into<String>,
        source: TagSource,
    ) -> Self {
        Self {
            tag: tag.into(),
            confidence,
            reason: reason.into(),
            source,
            traditional_knowledge: false,
        }
    }

    /// Mark the suggestion as traditional knowledge
    pub fn traditional(mut self) -> Self {
        self.traditional_knowledge = true;
        self
    }
}

/// Category proposal as returned by the backend
///
/// The backend may omit the appropriateness score; the suggestion engine
/// fills it in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCategorySuggestion {
    /// The category name
    pub category: String,

    /// Confidence in [0.0, 1.0]
    pub confidence: f64,

    /// Cultural appropriateness, if the backend computed one
    #[serde(default)]
    pub cultural_appropriateness: Option<f64>,

    /// Human-readable justification
    #[serde(default)]
    pub reason: String,
}

impl RawCategorySuggestion {
    /// Create a raw suggestion without an appropriateness score
    pub fn new(category: impl Into<String>, confidence: f64) -> Self {
        Self {
            category: category.into(),
            confidence,
            cultural_appropriateness: None,
            reason: String::new(),
        }
    }
}

/// Annotated category proposal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySuggestion {
    /// The category name
    pub category: String,

    /// Confidence in [0.0, 1.0]
    pub confidence: f64,

    /// Cultural appropriateness in [0.0, 1.0]
    pub cultural_appropriateness: f64,

    /// Advisory flag: community members may want to review this category.
    /// Never blocks the suggestion from being shown or applied.
    pub requires_community_validation: bool,

    /// Human-readable justification
    #[serde(default)]
    pub reason: String,
}
