//! Organization analysis results and learning feedback

use crate::{CategorySuggestion, CulturalMetadata, ItemId, ItemType, RuleMatch, TagSuggestion};
use serde::{Deserialize, Serialize};

/// Everything the engine knows about how an item could be organized
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationAnalysis {
    /// Analyzed item
    pub item_id: ItemId,

    /// Analyzed item's type
    pub item_type: ItemType,

    /// Proposed tags
    #[serde(default)]
    pub suggested_tags: Vec<TagSuggestion>,

    /// Proposed categories
    #[serde(default)]
    pub suggested_categories: Vec<CategorySuggestion>,

    /// Cultural context, when analysis produced one
    #[serde(default)]
    pub cultural_context: Option<CulturalMetadata>,

    /// Organization rules that matched the item
    #[serde(default)]
    pub rule_matches: Vec<RuleMatch>,

    /// Aggregate confidence in [0.0, 1.0]
    #[serde(default)]
    pub overall_confidence: f64,

    /// When the analysis was produced (seconds since Unix epoch)
    #[serde(default)]
    pub analyzed_at: u64,
}

impl OrganizationAnalysis {
    /// Empty analysis for an item
    pub fn empty(item_id: ItemId, item_type: ItemType) -> Self {
        Self {
            item_id,
            item_type,
            suggested_tags: Vec::new(),
            suggested_categories: Vec::new(),
            cultural_context: None,
            rule_matches: Vec::new(),
            overall_confidence: 0.0,
            analyzed_at: 0,
        }
    }
}

/// A user's correction of suggested organization, recorded for learning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationFeedback {
    /// Item the feedback is about
    pub item_id: ItemId,

    /// Item type
    pub item_type: ItemType,

    /// Suggestions the user kept
    #[serde(default)]
    pub accepted: Vec<String>,

    /// Suggestions the user removed
    #[serde(default)]
    pub rejected: Vec<String>,

    /// Optional free-form note
    #[serde(default)]
    pub note: Option<String>,
}
