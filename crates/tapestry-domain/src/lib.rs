//! Tapestry Domain Layer
//!
//! Core model for the content organization and relationship intelligence engine.
//! Every other crate in the workspace depends on the types defined here.
//!
//! ## Key Concepts
//!
//! - **Content item**: an opaque document or collection, read and annotated but never owned
//! - **Cultural metadata**: informational annotation; never a permission
//! - **Suggestions**: ephemeral tag/category proposals with confidence scores
//! - **Organization rules**: declarative condition → action pairs
//! - **Relationships**: typed edges between items with a derived strength
//! - **Scoring**: pure functions shared by every engine
//!
//! ## Architecture
//!
//! - Pure data and scoring logic only
//! - The backend boundary is the [`traits::OrganizationBackend`] trait
//! - Infrastructure implementations live in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod content;
pub mod cultural;
pub mod network;
pub mod organization_config;
pub mod relationship;
pub mod rule;
pub mod scoring;
pub mod suggestion;
pub mod traits;

// Re-exports for convenience
pub use analysis::{OrganizationAnalysis, OrganizationFeedback};
pub use content::{ContentItem, FieldValue, ItemId, ItemType};
pub use cultural::{CulturalMetadata, SensitivityLevel};
pub use network::{
    CulturalCluster, EducationalPathway, IndirectRelationship, NetworkHealth, NetworkStatistics,
    PathwayId, RelationshipNetwork,
};
pub use organization_config::{BatchProcessingConfig, OrganizationConfigUpdate, SmartOrganizationConfig};
pub use relationship::{
    Relationship, RelationshipContext, RelationshipId, RelationshipSuggestion, RelationshipType,
    RelationshipValidation, ValidationStatus,
};
pub use rule::{
    ConditionOperator, OrganizationAction, OrganizationRule, RuleAction, RuleCondition, RuleMatch,
    RuleValue,
};
pub use suggestion::{CategorySuggestion, RawCategorySuggestion, TagSource, TagSuggestion};
