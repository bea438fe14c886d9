//! Relationship module - typed edges between content items

use crate::ItemId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a relationship based on UUIDv7
///
/// UUIDv7 keeps relationships chronologically sortable without coordination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationshipId(uuid::Uuid);

impl RelationshipId {
    /// Generate a new UUIDv7-based RelationshipId
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }

    /// Parse a RelationshipId from its string form
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| format!("Invalid relationship id: {}", e))
    }
}

impl Default for RelationshipId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RelationshipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Type of relationship between two items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    /// Source contains or precedes the target
    Parent,
    /// Source is contained in or follows the target
    Child,
    /// Items at the same level
    Sibling,
    /// Same material as understood by another culture
    CulturalVariant,
    /// Same material in another language
    Translation,
    /// Community commentary on the target
    CommunityResponse,
    /// Teaching material supporting the target
    EducationalSupplement,
    /// Research building on the target
    ResearchExtension,
    /// Continuation of a tradition
    TraditionalContinuation,
    /// Contemporary adaptation of the target
    ModernAdaptation,
}

impl RelationshipType {
    /// Every relationship type, in declaration order
    pub const ALL: [RelationshipType; 10] = [
        RelationshipType::Parent,
        RelationshipType::Child,
        RelationshipType::Sibling,
        RelationshipType::CulturalVariant,
        RelationshipType::Translation,
        RelationshipType::CommunityResponse,
        RelationshipType::EducationalSupplement,
        RelationshipType::ResearchExtension,
        RelationshipType::TraditionalContinuation,
        RelationshipType::ModernAdaptation,
    ];

    /// Whether the relationship reads the same in both directions
    pub fn is_bidirectional(&self) -> bool {
        matches!(
            self,
            RelationshipType::Sibling | RelationshipType::CulturalVariant | RelationshipType::Translation
        )
    }

    /// Baseline strength before the educational bonus
    pub fn base_strength(&self) -> f64 {
        match self {
            RelationshipType::Parent | RelationshipType::Child => 0.9,
            RelationshipType::Sibling => 0.8,
            RelationshipType::CulturalVariant => 0.85,
            RelationshipType::Translation => 0.8,
            RelationshipType::CommunityResponse => 0.7,
            RelationshipType::EducationalSupplement => 0.75,
            RelationshipType::ResearchExtension => 0.7,
            RelationshipType::TraditionalContinuation => 0.95,
            RelationshipType::ModernAdaptation => 0.75,
        }
    }

    /// Get the type name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipType::Parent => "parent",
            RelationshipType::Child => "child",
            RelationshipType::Sibling => "sibling",
            RelationshipType::CulturalVariant => "cultural_variant",
            RelationshipType::Translation => "translation",
            RelationshipType::CommunityResponse => "community_response",
            RelationshipType::EducationalSupplement => "educational_supplement",
            RelationshipType::ResearchExtension => "research_extension",
            RelationshipType::TraditionalContinuation => "traditional_continuation",
            RelationshipType::ModernAdaptation => "modern_adaptation",
        }
    }

    /// Parse a type from its snake_case name
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s.to_lowercase())
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RelationshipType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid relationship type: {}", s))
    }
}

/// Review state of a persisted relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    /// Not yet reviewed
    #[default]
    Pending,
    /// Accepted without further review
    Validated,
    /// Visible and usable while community members review it
    CommunityReview,
}

/// A persisted edge between two items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// Unique identifier
    pub id: RelationshipId,

    /// Source item
    pub source_id: ItemId,

    /// Target item
    pub target_id: ItemId,

    /// Kind of relationship
    pub relationship_type: RelationshipType,

    /// Strength in [0.0, 1.0]
    pub strength: f64,

    /// Whether the edge reads in both directions
    pub bidirectional: bool,

    /// Creation time (seconds since Unix epoch)
    pub created_at: u64,

    /// Who created the edge
    #[serde(default)]
    pub created_by: Option<String>,

    /// Free-form cultural context supplied at creation
    #[serde(default)]
    pub cultural_context: Option<String>,

    /// Review state
    #[serde(default)]
    pub validation_status: ValidationStatus,
}

impl Relationship {
    /// Create a new relationship; bidirectionality follows the type table
    ///
    /// # Panics
    /// Panics if strength is outside [0, 1]
    pub fn new(
        source_id: ItemId,
        target_id: ItemId,
        relationship_type: RelationshipType,
        strength: f64,
        created_at: u64,
    ) -> Self {
        assert!((0.0..=1.0).contains(&strength), "Strength must be in [0, 1]");

        Self {
            id: RelationshipId::new(),
            source_id,
            target_id,
            relationship_type,
            strength,
            bidirectional: relationship_type.is_bidirectional(),
            created_at,
            created_by: None,
            cultural_context: None,
            validation_status: ValidationStatus::Pending,
        }
    }

    /// Whether the edge touches the given item
    pub fn involves(&self, item: &ItemId) -> bool {
        &self.source_id == item || &self.target_id == item
    }

    /// The endpoint opposite to `item`, if the edge touches it
    pub fn other_end(&self, item: &ItemId) -> Option<&ItemId> {
        if &self.source_id == item {
            Some(&self.target_id)
        } else if &self.target_id == item {
            Some(&self.source_id)
        } else {
            None
        }
    }
}

/// Optional context supplied when creating a relationship
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationshipContext {
    /// Who is creating the edge
    #[serde(default)]
    pub created_by: Option<String>,

    /// Cultural context note
    #[serde(default)]
    pub cultural_context: Option<String>,
}

/// A candidate edge proposed by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipSuggestion {
    /// Proposed target item
    pub target_id: ItemId,

    /// Proposed type
    pub relationship_type: RelationshipType,

    /// Confidence in [0.0, 1.0]
    pub confidence: f64,

    /// Cultural appropriateness in [0.0, 1.0]
    pub cultural_appropriateness: f64,

    /// Advisory review flag
    #[serde(default)]
    pub requires_community_validation: bool,

    /// Whether the edge would be bidirectional
    #[serde(default)]
    pub bidirectional: bool,

    /// Human-readable justification
    #[serde(default)]
    pub reason: String,
}

impl RelationshipSuggestion {
    /// Create a suggestion; bidirectionality follows the type table
    pub fn new(
        target_id: impl Into<ItemId>,
        relationship_type: RelationshipType,
        confidence: f64,
        cultural_appropriateness: f64,
    ) -> Self {
        Self {
            target_id: target_id.into(),
            relationship_type,
            confidence,
            cultural_appropriateness,
            requires_community_validation: false,
            bidirectional: relationship_type.is_bidirectional(),
            reason: String::new(),
        }
    }
}

/// Outcome of validating a proposed relationship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipValidation {
    /// Whether the relationship may be created
    pub valid: bool,

    /// Problems preventing creation
    #[serde(default)]
    pub issues: Vec<String>,

    /// Whether the edge is culturally appropriate
    pub culturally_appropriate: bool,

    /// Advisory: community approval is recommended (never blocks creation)
    pub requires_community_approval: bool,

    /// Educational value in [0.0, 1.0]
    pub educational_value: f64,

    /// Improvement hints
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl Default for RelationshipValidation {
    fn default() -> Self {
        Self {
            valid: true,
            issues: Vec::new(),
            culturally_appropriate: true,
            requires_community_approval: false,
            educational_value: 0.5,
            suggestions: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bidirectional_table() {
        let expected = [
            (RelationshipType::Parent, false),
            (RelationshipType::Child, false),
            (RelationshipType::Sibling, true),
            (RelationshipType::CulturalVariant, true),
            (RelationshipType::Translation, true),
            (RelationshipType::CommunityResponse, false),
            (RelationshipType::EducationalSupplement, false),
            (RelationshipType::ResearchExtension, false),
            (RelationshipType::TraditionalContinuation, false),
            (RelationshipType::ModernAdaptation, false),
        ];

        for (relationship_type, bidirectional) in expected {
            assert_eq!(
                relationship_type.is_bidirectional(),
                bidirectional,
                "{} bidirectionality",
                relationship_type
            );
        }
    }

    #[test]
    fn test_type_parse_roundtrip() {
        for relationship_type in RelationshipType::ALL {
            assert_eq!(RelationshipType::parse(relationship_type.as_str()), Some(relationship_type));
        }
        assert!("cousin".parse::<RelationshipType>().is_err());
    }

    #[test]
    fn test_other_end() {
        let rel = Relationship::new("a".into(), "b".into(), RelationshipType::Parent, 0.9, 0);
        assert_eq!(rel.other_end(&"a".into()), Some(&ItemId::new("b")));
        assert_eq!(rel.other_end(&"b".into()), Some(&ItemId::new("a")));
        assert_eq!(rel.other_end(&"c".into()), None);
        assert!(!rel.bidirectional);
    }

    #[test]
    #[should_panic]
    fn test_invalid_strength() {
        Relationship::new("a".into(), "b".into(), RelationshipType::Sibling, 1.5, 0);
    }
}
