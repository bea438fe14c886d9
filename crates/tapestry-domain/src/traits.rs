//! Trait definitions for external interactions
//!
//! The engine's only boundary is a content-and-relationship backend reached
//! through asynchronous, RPC-style calls that exchange plain data records.
//! Implementations live in other crates (`tapestry-backend`).

use crate::{
    CulturalMetadata, EducationalPathway, ContentItem, ItemId, ItemType, NetworkHealth,
    OrganizationAnalysis, OrganizationConfigUpdate, OrganizationFeedback, OrganizationRule,
    RawCategorySuggestion, Relationship, RelationshipId, RelationshipSuggestion, RelationshipType,
    RelationshipValidation, SmartOrganizationConfig, TagSuggestion,
};
use async_trait::async_trait;

/// Backend for content analysis, mutation, rules, relationships and configuration
///
/// Every call may be slow or fail with an opaque error. Callers must not
/// assume anything about the error beyond its `Display` form.
#[async_trait]
pub trait OrganizationBackend: Send + Sync {
    /// Error type for backend operations
    type Error: std::fmt::Display + Send + Sync;

    // --- Items ---

    /// Fetch an item by id
    async fn get_content_item(&self, item_id: &ItemId) -> Result<ContentItem, Self::Error>;

    // --- Analysis ---

    /// Run the backend's organization analysis for an item
    async fn analyze_item_organization(
        &self,
        item_id: &ItemId,
        item_type: ItemType,
    ) -> Result<OrganizationAnalysis, Self::Error>;

    /// Raw tag suggestions for an item
    async fn generate_tag_suggestions(
        &self,
        content: &ContentItem,
        metadata: Option<&CulturalMetadata>,
    ) -> Result<Vec<TagSuggestion>, Self::Error>;

    /// Raw category suggestions for an item
    async fn generate_category_suggestions(
        &self,
        content: &ContentItem,
        metadata: Option<&CulturalMetadata>,
    ) -> Result<Vec<RawCategorySuggestion>, Self::Error>;

    /// Cultural context analysis for an item
    async fn analyze_cultural_context(
        &self,
        content: &ContentItem,
    ) -> Result<CulturalMetadata, Self::Error>;

    /// Record a user correction for learning
    async fn record_organization_feedback(
        &self,
        feedback: &OrganizationFeedback,
    ) -> Result<(), Self::Error>;

    // --- Mutation ---

    /// Apply tags to an item
    async fn apply_tags_to_item(
        &self,
        item_id: &ItemId,
        item_type: ItemType,
        tags: &[String],
    ) -> Result<(), Self::Error>;

    /// Apply categories to an item
    async fn apply_categories_to_item(
        &self,
        item_id: &ItemId,
        item_type: ItemType,
        categories: &[String],
    ) -> Result<(), Self::Error>;

    /// Attach cultural metadata to an item
    async fn apply_cultural_metadata_to_item(
        &self,
        item_id: &ItemId,
        item_type: ItemType,
        metadata: &CulturalMetadata,
    ) -> Result<(), Self::Error>;

    /// Move an item into a collection
    async fn move_item_to_collection(
        &self,
        item_id: &ItemId,
        collection_id: &ItemId,
    ) -> Result<(), Self::Error>;

    /// Ask community members to review an item
    async fn request_cultural_validation(
        &self,
        item_id: &ItemId,
        item_type: ItemType,
        reason: &str,
    ) -> Result<(), Self::Error>;

    // --- Rules ---

    /// Persist a new rule
    async fn create_organization_rule(
        &self,
        rule: &OrganizationRule,
    ) -> Result<OrganizationRule, Self::Error>;

    /// Replace an existing rule
    async fn update_organization_rule(
        &self,
        rule: &OrganizationRule,
    ) -> Result<OrganizationRule, Self::Error>;

    /// Delete a rule
    async fn delete_organization_rule(&self, rule_id: &str) -> Result<(), Self::Error>;

    /// List rules, optionally scoped to a collection
    async fn get_organization_rules(
        &self,
        collection_id: Option<&ItemId>,
    ) -> Result<Vec<OrganizationRule>, Self::Error>;

    // --- Relationships ---

    /// Persist a new relationship
    async fn create_collection_relationship(
        &self,
        relationship: &Relationship,
    ) -> Result<Relationship, Self::Error>;

    /// Replace an existing relationship
    async fn update_collection_relationship(
        &self,
        relationship: &Relationship,
    ) -> Result<Relationship, Self::Error>;

    /// Delete a relationship
    async fn delete_collection_relationship(
        &self,
        relationship_id: &RelationshipId,
    ) -> Result<(), Self::Error>;

    /// Every relationship touching an item, in either direction
    async fn get_collection_relationships(
        &self,
        item_id: &ItemId,
    ) -> Result<Vec<Relationship>, Self::Error>;

    /// Candidate relationships for an item
    async fn suggest_collection_relationships(
        &self,
        item_id: &ItemId,
    ) -> Result<Vec<RelationshipSuggestion>, Self::Error>;

    /// Items similar to the given one
    async fn find_similar_collections(
        &self,
        item_id: &ItemId,
        limit: usize,
    ) -> Result<Vec<RelationshipSuggestion>, Self::Error>;

    /// The same material as understood by other cultures
    async fn discover_cultural_variants(
        &self,
        item_id: &ItemId,
    ) -> Result<Vec<RelationshipSuggestion>, Self::Error>;

    /// Community commentary on an item
    async fn find_community_responses(
        &self,
        item_id: &ItemId,
    ) -> Result<Vec<RelationshipSuggestion>, Self::Error>;

    /// Baseline validation of a proposed relationship
    async fn validate_collection_relationship(
        &self,
        source_id: &ItemId,
        target_id: &ItemId,
        relationship_type: RelationshipType,
    ) -> Result<RelationshipValidation, Self::Error>;

    /// Persist a user-defined pathway
    async fn create_custom_pathway(
        &self,
        pathway: &EducationalPathway,
    ) -> Result<EducationalPathway, Self::Error>;

    /// Pathways the backend recommends starting from an item
    async fn get_recommended_pathways(
        &self,
        item_id: &ItemId,
    ) -> Result<Vec<EducationalPathway>, Self::Error>;

    /// Health report of the graph around an item
    async fn get_network_health(&self, item_id: &ItemId) -> Result<NetworkHealth, Self::Error>;

    /// Protocols recorded for a cultural origin
    async fn get_cultural_protocols(&self, cultural_origin: &str) -> Result<Vec<String>, Self::Error>;

    // --- Configuration ---

    /// Current organization settings
    async fn get_organization_config(&self) -> Result<SmartOrganizationConfig, Self::Error>;

    /// Apply a partial settings update and return the result
    async fn update_organization_config(
        &self,
        update: &OrganizationConfigUpdate,
    ) -> Result<SmartOrganizationConfig, Self::Error>;
}
