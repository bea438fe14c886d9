//! Suggestion and relationship operations exposed through the orchestrator

use crate::{Orchestrator, OrchestratorError};
use tapestry_domain::traits::OrganizationBackend;
use tapestry_domain::{
    CategorySuggestion, ContentItem, CulturalCluster, CulturalMetadata, EducationalPathway, ItemId,
    NetworkHealth, OrganizationFeedback, Relationship, RelationshipContext, RelationshipId,
    RelationshipNetwork, RelationshipSuggestion, RelationshipType, RelationshipValidation,
    TagSuggestion,
};
use tracing::debug;

impl<B> Orchestrator<B>
where
    B: OrganizationBackend,
{
    // --- Suggestions ---

    /// Tag suggestions after the traditional-knowledge filter
    pub async fn generate_tag_suggestions(
        &self,
        content: &ContentItem,
        metadata: Option<&CulturalMetadata>,
    ) -> Result<Vec<TagSuggestion>, OrchestratorError> {
        Ok(self
            .suggestions
            .generate_tag_suggestions(content, metadata)
            .await?)
    }

    /// Category suggestions with appropriateness and review flags
    pub async fn generate_category_suggestions(
        &self,
        content: &ContentItem,
        metadata: Option<&CulturalMetadata>,
    ) -> Result<Vec<CategorySuggestion>, OrchestratorError> {
        Ok(self
            .suggestions
            .generate_category_suggestions(content, metadata)
            .await?)
    }

    /// Cultural context for an item; never fails
    pub async fn analyze_cultural_context(&self, content: &ContentItem) -> CulturalMetadata {
        self.suggestions.analyze_cultural_context(content).await
    }

    /// Record a user correction when learning is enabled
    ///
    /// When the settings cannot be loaded the feedback is recorded anyway.
    pub async fn record_feedback(&self, feedback: &OrganizationFeedback) {
        if let Ok(settings) = self.get_organization_config().await {
            if !settings.learning_enabled {
                debug!("Learning disabled; dropping feedback for {}", feedback.item_id);
                return;
            }
        }
        self.suggestions.record_feedback(feedback).await;
    }

    // --- Relationships ---

    /// Validate a proposed relationship
    pub async fn validate_relationship(
        &self,
        source_id: &ItemId,
        target_id: &ItemId,
        relationship_type: RelationshipType,
    ) -> Result<RelationshipValidation, OrchestratorError> {
        Ok(self
            .graph
            .validate_relationship(source_id, target_id, relationship_type)
            .await?)
    }

    /// Validate, then persist a relationship
    pub async fn create_relationship(
        &self,
        source_id: &ItemId,
        target_id: &ItemId,
        relationship_type: RelationshipType,
        context: Option<RelationshipContext>,
    ) -> Result<Relationship, OrchestratorError> {
        Ok(self
            .graph
            .create_relationship(source_id, target_id, relationship_type, context)
            .await?)
    }

    /// Revalidate and persist changes to a relationship
    pub async fn update_relationship(
        &self,
        relationship: Relationship,
    ) -> Result<Relationship, OrchestratorError> {
        Ok(self.graph.update_relationship(relationship).await?)
    }

    /// Delete a relationship
    pub async fn delete_relationship(
        &self,
        relationship_id: &RelationshipId,
    ) -> Result<(), OrchestratorError> {
        Ok(self.graph.delete_relationship(relationship_id).await?)
    }

    /// Every relationship touching an item
    pub async fn get_relationships(&self, item_id: &ItemId) -> Result<Vec<Relationship>, OrchestratorError> {
        Ok(self.graph.get_relationships(item_id).await?)
    }

    /// Filtered relationship candidates
    pub async fn suggest_relationships(
        &self,
        item_id: &ItemId,
    ) -> Result<Vec<RelationshipSuggestion>, OrchestratorError> {
        Ok(self.graph.suggest_relationships(item_id).await?)
    }

    /// Filtered similar items
    pub async fn find_similar_collections(
        &self,
        item_id: &ItemId,
        limit: Option<usize>,
    ) -> Result<Vec<RelationshipSuggestion>, OrchestratorError> {
        Ok(self.graph.find_similar_collections(item_id, limit).await?)
    }

    /// Filtered cultural variants
    pub async fn discover_cultural_variants(
        &self,
        item_id: &ItemId,
    ) -> Result<Vec<RelationshipSuggestion>, OrchestratorError> {
        Ok(self.graph.discover_cultural_variants(item_id).await?)
    }

    /// Filtered community responses
    pub async fn find_community_responses(
        &self,
        item_id: &ItemId,
    ) -> Result<Vec<RelationshipSuggestion>, OrchestratorError> {
        Ok(self.graph.find_community_responses(item_id).await?)
    }

    /// Bounded view of the graph around an item
    pub async fn analyze_relationship_network(
        &self,
        item_id: &ItemId,
        depth: Option<usize>,
    ) -> Result<RelationshipNetwork, OrchestratorError> {
        Ok(self.graph.analyze_relationship_network(item_id, depth).await?)
    }

    /// Cultural clusters around an item
    pub async fn get_cultural_clusters(
        &self,
        item_id: &ItemId,
        depth: Option<usize>,
    ) -> Result<Vec<CulturalCluster>, OrchestratorError> {
        Ok(self.graph.get_cultural_clusters(item_id, depth).await?)
    }

    /// Community-response edges around an item
    pub async fn get_community_network(
        &self,
        item_id: &ItemId,
        depth: Option<usize>,
    ) -> Result<Vec<Relationship>, OrchestratorError> {
        Ok(self.graph.get_community_network(item_id, depth).await?)
    }

    /// Hierarchy and continuation edges around an item
    pub async fn get_traditional_hierarchy(
        &self,
        item_id: &ItemId,
        depth: Option<usize>,
    ) -> Result<Vec<Relationship>, OrchestratorError> {
        Ok(self.graph.get_traditional_hierarchy(item_id, depth).await?)
    }

    /// Learning pathways from an item
    pub async fn generate_educational_pathways(
        &self,
        item_id: &ItemId,
    ) -> Result<Vec<EducationalPathway>, OrchestratorError> {
        Ok(self.graph.generate_educational_pathways(item_id).await?)
    }

    /// Persist a pathway over caller-chosen items
    pub async fn create_custom_pathway(
        &self,
        title: &str,
        items: &[ItemId],
    ) -> Result<EducationalPathway, OrchestratorError> {
        Ok(self.graph.create_custom_pathway(title, items).await?)
    }

    /// Pathways the backend recommends from an item
    pub async fn get_recommended_pathways(
        &self,
        item_id: &ItemId,
    ) -> Result<Vec<EducationalPathway>, OrchestratorError> {
        Ok(self.graph.get_recommended_pathways(item_id).await?)
    }

    /// Backend health report for the graph around an item
    pub async fn get_network_health(&self, item_id: &ItemId) -> Result<NetworkHealth, OrchestratorError> {
        Ok(self.graph.get_network_health(item_id).await?)
    }

    /// Protocols recorded for a cultural origin
    pub async fn get_cultural_protocols(
        &self,
        cultural_origin: &str,
    ) -> Result<Vec<String>, OrchestratorError> {
        Ok(self.graph.get_cultural_protocols(cultural_origin).await?)
    }
}
