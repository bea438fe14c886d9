//! In-memory organization backend

use crate::BackendError;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tapestry_domain::scoring::{
    category_cultural_appropriateness, overall_confidence, requires_community_validation,
};
use tapestry_domain::traits::OrganizationBackend;
use tapestry_domain::{
    CategorySuggestion, ContentItem, CulturalMetadata, EducationalPathway, ItemId, ItemType,
    NetworkHealth, OrganizationAnalysis, OrganizationConfigUpdate, OrganizationFeedback,
    OrganizationRule, RawCategorySuggestion, Relationship, RelationshipId, RelationshipSuggestion,
    RelationshipType, RelationshipValidation, SmartOrganizationConfig, TagSuggestion,
    ValidationStatus,
};

/// Which relationship-candidate query a scripted list answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuggestionKind {
    /// `suggest_collection_relationships`
    Related,
    /// `find_similar_collections`
    Similar,
    /// `discover_cultural_variants`
    CulturalVariant,
    /// `find_community_responses`
    CommunityResponse,
}

/// A write the engine issued against an item
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Tags applied
    TagsApplied {
        /// Target item
        item_id: ItemId,
        /// Applied tags
        tags: Vec<String>,
    },
    /// Categories applied
    CategoriesApplied {
        /// Target item
        item_id: ItemId,
        /// Applied categories
        categories: Vec<String>,
    },
    /// Cultural metadata attached
    CulturalMetadataApplied {
        /// Target item
        item_id: ItemId,
        /// Attached metadata
        metadata: CulturalMetadata,
    },
    /// Item moved into a collection
    MovedToCollection {
        /// Moved item
        item_id: ItemId,
        /// Destination collection
        collection_id: ItemId,
    },
    /// Community review requested
    ValidationRequested {
        /// Item under review
        item_id: ItemId,
        /// Reason given
        reason: String,
    },
}

#[derive(Default)]
struct BackendState {
    items: HashMap<ItemId, ContentItem>,
    analyses: HashMap<ItemId, OrganizationAnalysis>,
    tag_suggestions: HashMap<ItemId, Vec<TagSuggestion>>,
    category_suggestions: HashMap<ItemId, Vec<RawCategorySuggestion>>,
    cultural_contexts: HashMap<ItemId, CulturalMetadata>,
    candidates: HashMap<(SuggestionKind, ItemId), Vec<RelationshipSuggestion>>,
    validations: HashMap<(ItemId, ItemId, RelationshipType), RelationshipValidation>,
    relationships: Vec<Relationship>,
    rules: Vec<OrganizationRule>,
    pathways: Vec<EducationalPathway>,
    protocols: HashMap<String, Vec<String>>,
    config: SmartOrganizationConfig,
    feedback: Vec<OrganizationFeedback>,
    mutations: Vec<Mutation>,
    calls: HashMap<&'static str, usize>,
    failing_operations: HashSet<&'static str>,
    failing_items: HashSet<ItemId>,
}

/// Thread-safe in-memory backend with scripted analysis results
///
/// Share it between the engine and the test through an `Arc`; every
/// configuration method takes `&self`.
///
/// # Examples
///
/// ```
/// use tapestry_backend::InMemoryBackend;
///
/// let backend = InMemoryBackend::new();
/// backend.fail_operation("get_organization_rules");
/// assert_eq!(backend.total_calls(), 0);
/// ```
#[derive(Default)]
pub struct InMemoryBackend {
    state: Mutex<BackendState>,
    latency: Option<Duration>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

/// Tracks one in-progress call; decrements the in-flight count on drop
struct InFlight<'a> {
    counter: &'a AtomicUsize,
}

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize, peak: &AtomicUsize) -> Self {
        let now = counter.fetch_add(1, Ordering::SeqCst) + 1;
        peak.fetch_max(now, Ordering::SeqCst);
        Self { counter }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn not_found(what: &str, id: impl std::fmt::Display) -> BackendError {
    BackendError::NotFound(format!("{} {}", what, id))
}

impl InMemoryBackend {
    /// Create an empty backend with default settings and no latency
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every call by `latency` (lets concurrency be observed)
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    fn state(&self) -> MutexGuard<'_, BackendState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Count the call, apply injected failures, then wait out the latency
    async fn begin(
        &self,
        operation: &'static str,
        item_id: Option<&ItemId>,
    ) -> Result<InFlight<'_>, BackendError> {
        let call = InFlight::enter(&self.in_flight, &self.peak_in_flight);

        {
            let mut state = self.state();
            *state.calls.entry(operation).or_insert(0) += 1;

            if state.failing_operations.contains(operation) {
                tracing::debug!("Injected failure for {}", operation);
                return Err(BackendError::Unavailable(operation.to_string()));
            }
            if let Some(item_id) = item_id {
                if state.failing_items.contains(item_id) {
                    tracing::debug!("Injected failure for {} on {}", operation, item_id);
                    return Err(BackendError::Unavailable(format!("{} ({})", operation, item_id)));
                }
            }
        }

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        Ok(call)
    }

    // --- Seeding ---

    /// Store (or replace) an item
    pub fn add_item(&self, item: ContentItem) {
        self.state().items.insert(item.id.clone(), item);
    }

    /// Store a relationship as-is
    pub fn add_relationship(&self, relationship: Relationship) {
        self.state().relationships.push(relationship);
    }

    /// Store a rule as-is
    pub fn add_rule(&self, rule: OrganizationRule) {
        self.state().rules.push(rule);
    }

    /// Return this analysis for the item instead of deriving one
    pub fn script_analysis(&self, item_id: impl Into<ItemId>, analysis: OrganizationAnalysis) {
        self.state().analyses.insert(item_id.into(), analysis);
    }

    /// Tag suggestions returned for the item
    pub fn script_tag_suggestions(&self, item_id: impl Into<ItemId>, tags: Vec<TagSuggestion>) {
        self.state().tag_suggestions.insert(item_id.into(), tags);
    }

    /// Category suggestions returned for the item
    pub fn script_category_suggestions(
        &self,
        item_id: impl Into<ItemId>,
        categories: Vec<RawCategorySuggestion>,
    ) {
        self.state().category_suggestions.insert(item_id.into(), categories);
    }

    /// Cultural context returned for the item
    pub fn script_cultural_context(&self, item_id: impl Into<ItemId>, context: CulturalMetadata) {
        self.state().cultural_contexts.insert(item_id.into(), context);
    }

    /// Relationship candidates returned by one of the candidate queries
    pub fn script_relationship_suggestions(
        &self,
        kind: SuggestionKind,
        item_id: impl Into<ItemId>,
        suggestions: Vec<RelationshipSuggestion>,
    ) {
        self.state().candidates.insert((kind, item_id.into()), suggestions);
    }

    /// Validation returned for a proposed relationship
    pub fn script_validation(
        &self,
        source_id: impl Into<ItemId>,
        target_id: impl Into<ItemId>,
        relationship_type: RelationshipType,
        validation: RelationshipValidation,
    ) {
        self.state()
            .validations
            .insert((source_id.into(), target_id.into(), relationship_type), validation);
    }

    /// Protocols recorded for a cultural origin
    pub fn set_cultural_protocols(&self, origin: impl Into<String>, protocols: Vec<String>) {
        self.state().protocols.insert(origin.into(), protocols);
    }

    /// Replace the stored organization settings
    pub fn set_config(&self, config: SmartOrganizationConfig) {
        self.state().config = config;
    }

    // --- Failure injection ---

    /// Make every call to `operation` fail
    pub fn fail_operation(&self, operation: &'static str) {
        self.state().failing_operations.insert(operation);
    }

    /// Stop failing calls to `operation`
    pub fn recover_operation(&self, operation: &'static str) {
        self.state().failing_operations.remove(operation);
    }

    /// Make every item-scoped call for `item_id` fail
    pub fn fail_item(&self, item_id: impl Into<ItemId>) {
        self.state().failing_items.insert(item_id.into());
    }

    // --- Inspection ---

    /// Number of calls made to `operation`
    pub fn call_count(&self, operation: &str) -> usize {
        self.state().calls.get(operation).copied().unwrap_or(0)
    }

    /// Number of calls made to any operation
    pub fn total_calls(&self) -> usize {
        self.state().calls.values().sum()
    }

    /// Reset every call counter
    pub fn reset_call_counts(&self) {
        self.state().calls.clear();
    }

    /// Highest number of calls observed in progress at once
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Writes issued so far, in order
    pub fn mutations(&self) -> Vec<Mutation> {
        self.state().mutations.clone()
    }

    /// Feedback recorded so far
    pub fn feedback(&self) -> Vec<OrganizationFeedback> {
        self.state().feedback.clone()
    }

    /// Stored relationships
    pub fn relationships(&self) -> Vec<Relationship> {
        self.state().relationships.clone()
    }

    /// Stored rules
    pub fn rules(&self) -> Vec<OrganizationRule> {
        self.state().rules.clone()
    }

    /// Stored pathways
    pub fn pathways(&self) -> Vec<EducationalPathway> {
        self.state().pathways.clone()
    }

    /// Current copy of an item
    pub fn item(&self, item_id: &ItemId) -> Option<ContentItem> {
        self.state().items.get(item_id).cloned()
    }

    /// Stored organization settings
    pub fn config(&self) -> SmartOrganizationConfig {
        self.state().config.clone()
    }
}

/// Analysis built from scripted suggestions when none was scripted whole
fn derive_analysis(
    state: &BackendState,
    item_id: &ItemId,
    item_type: ItemType,
) -> Result<OrganizationAnalysis, BackendError> {
    let item = state
        .items
        .get(item_id)
        .ok_or_else(|| not_found("item", item_id))?;
    let sensitivity = item
        .cultural
        .as_ref()
        .map(|c| c.sensitivity_level)
        .unwrap_or_default();

    let mut analysis = OrganizationAnalysis::empty(item_id.clone(), item_type);
    analysis.suggested_tags = state.tag_suggestions.get(item_id).cloned().unwrap_or_default();
    analysis.suggested_categories = state
        .category_suggestions
        .get(item_id)
        .map(|raw| {
            raw.iter()
                .map(|suggestion| {
                    let appropriateness = suggestion.cultural_appropriateness.unwrap_or_else(|| {
                        category_cultural_appropriateness(&suggestion.category, sensitivity)
                    });
                    CategorySuggestion {
                        category: suggestion.category.clone(),
                        confidence: suggestion.confidence,
                        cultural_appropriateness: appropriateness,
                        requires_community_validation: requires_community_validation(
                            appropriateness,
                            sensitivity,
                        ),
                        reason: suggestion.reason.clone(),
                    }
                })
                .collect()
        })
        .unwrap_or_default();
    analysis.cultural_context = state
        .cultural_contexts
        .get(item_id)
        .cloned()
        .or_else(|| item.cultural.clone());
    analysis.overall_confidence =
        overall_confidence(&analysis.suggested_tags, &analysis.suggested_categories);
    analysis.analyzed_at = now_secs();

    Ok(analysis)
}

fn push_unique(target: &mut Vec<String>, values: &[String]) {
    for value in values {
        if !target.contains(value) {
            target.push(value.clone());
        }
    }
}

#[async_trait]
impl OrganizationBackend for InMemoryBackend {
    type Error = BackendError;

    async fn get_content_item(&self, item_id: &ItemId) -> Result<ContentItem, Self::Error> {
        let _call = self.begin("get_content_item", Some(item_id)).await?;
        self.state()
            .items
            .get(item_id)
            .cloned()
            .ok_or_else(|| not_found("item", item_id))
    }

    async fn analyze_item_organization(
        &self,
        item_id: &ItemId,
        item_type: ItemType,
    ) -> Result<OrganizationAnalysis, Self::Error> {
        let _call = self.begin("analyze_item_organization", Some(item_id)).await?;
        let state = self.state();
        match state.analyses.get(item_id) {
            Some(analysis) => Ok(analysis.clone()),
            None => derive_analysis(&state, item_id, item_type),
        }
    }

    async fn generate_tag_suggestions(
        &self,
        content: &ContentItem,
        _metadata: Option<&CulturalMetadata>,
    ) -> Result<Vec<TagSuggestion>, Self::Error> {
        let _call = self.begin("generate_tag_suggestions", Some(&content.id)).await?;
        Ok(self
            .state()
            .tag_suggestions
            .get(&content.id)
            .cloned()
            .unwrap_or_default())
    }

    async fn generate_category_suggestions(
        &self,
        content: &ContentItem,
        _metadata: Option<&CulturalMetadata>,
    ) -> Result<Vec<RawCategorySuggestion>, Self::Error> {
        let _call = self
            .begin("generate_category_suggestions", Some(&content.id))
            .await?;
        Ok(self
            .state()
            .category_suggestions
            .get(&content.id)
            .cloned()
            .unwrap_or_default())
    }

    async fn analyze_cultural_context(
        &self,
        content: &ContentItem,
    ) -> Result<CulturalMetadata, Self::Error> {
        let _call = self.begin("analyze_cultural_context", Some(&content.id)).await?;
        Ok(self
            .state()
            .cultural_contexts
            .get(&content.id)
            .cloned()
            .or_else(|| content.cultural.clone())
            .unwrap_or_default())
    }

    async fn record_organization_feedback(
        &self,
        feedback: &OrganizationFeedback,
    ) -> Result<(), Self::Error> {
        let _call = self
            .begin("record_organization_feedback", Some(&feedback.item_id))
            .await?;
        self.state().feedback.push(feedback.clone());
        Ok(())
    }

    async fn apply_tags_to_item(
        &self,
        item_id: &ItemId,
        _item_type: ItemType,
        tags: &[String],
    ) -> Result<(), Self::Error> {
        let _call = self.begin("apply_tags_to_item", Some(item_id)).await?;
        let mut state = self.state();
        if let Some(item) = state.items.get_mut(item_id) {
            push_unique(&mut item.tags, tags);
        }
        state.mutations.push(Mutation::TagsApplied {
            item_id: item_id.clone(),
            tags: tags.to_vec(),
        });
        Ok(())
    }

    async fn apply_categories_to_item(
        &self,
        item_id: &ItemId,
        _item_type: ItemType,
        categories: &[String],
    ) -> Result<(), Self::Error> {
        let _call = self.begin("apply_categories_to_item", Some(item_id)).await?;
        let mut state = self.state();
        if let Some(item) = state.items.get_mut(item_id) {
            push_unique(&mut item.categories, categories);
        }
        state.mutations.push(Mutation::CategoriesApplied {
            item_id: item_id.clone(),
            categories: categories.to_vec(),
        });
        Ok(())
    }

    async fn apply_cultural_metadata_to_item(
        &self,
        item_id: &ItemId,
        _item_type: ItemType,
        metadata: &CulturalMetadata,
    ) -> Result<(), Self::Error> {
        let _call = self
            .begin("apply_cultural_metadata_to_item", Some(item_id))
            .await?;
        let mut state = self.state();
        if let Some(item) = state.items.get_mut(item_id) {
            item.cultural = Some(metadata.clone());
        }
        state.mutations.push(Mutation::CulturalMetadataApplied {
            item_id: item_id.clone(),
            metadata: metadata.clone(),
        });
        Ok(())
    }

    async fn move_item_to_collection(
        &self,
        item_id: &ItemId,
        collection_id: &ItemId,
    ) -> Result<(), Self::Error> {
        let _call = self.begin("move_item_to_collection", Some(item_id)).await?;
        let mut state = self.state();
        if let Some(item) = state.items.get_mut(item_id) {
            item.collection_id = Some(collection_id.clone());
        }
        state.mutations.push(Mutation::MovedToCollection {
            item_id: item_id.clone(),
            collection_id: collection_id.clone(),
        });
        Ok(())
    }

    async fn request_cultural_validation(
        &self,
        item_id: &ItemId,
        _item_type: ItemType,
        reason: &str,
    ) -> Result<(), Self::Error> {
        let _call = self.begin("request_cultural_validation", Some(item_id)).await?;
        self.state().mutations.push(Mutation::ValidationRequested {
            item_id: item_id.clone(),
            reason: reason.to_string(),
        });
        Ok(())
    }

    async fn create_organization_rule(
        &self,
        rule: &OrganizationRule,
    ) -> Result<OrganizationRule, Self::Error> {
        let _call = self.begin("create_organization_rule", None).await?;
        let mut state = self.state();
        if state.rules.iter().any(|r| r.id == rule.id) {
            return Err(BackendError::Conflict(format!("rule {}", rule.id)));
        }
        state.rules.push(rule.clone());
        Ok(rule.clone())
    }

    async fn update_organization_rule(
        &self,
        rule: &OrganizationRule,
    ) -> Result<OrganizationRule, Self::Error> {
        let _call = self.begin("update_organization_rule", None).await?;
        let mut state = self.state();
        let existing = state
            .rules
            .iter_mut()
            .find(|r| r.id == rule.id)
            .ok_or_else(|| not_found("rule", &rule.id))?;
        *existing = rule.clone();
        Ok(rule.clone())
    }

    async fn delete_organization_rule(&self, rule_id: &str) -> Result<(), Self::Error> {
        let _call = self.begin("delete_organization_rule", None).await?;
        let mut state = self.state();
        let before = state.rules.len();
        state.rules.retain(|r| r.id != rule_id);
        if state.rules.len() == before {
            return Err(not_found("rule", rule_id));
        }
        Ok(())
    }

    async fn get_organization_rules(
        &self,
        collection_id: Option<&ItemId>,
    ) -> Result<Vec<OrganizationRule>, Self::Error> {
        let _call = self.begin("get_organization_rules", None).await?;
        let state = self.state();
        Ok(state
            .rules
            .iter()
            .filter(|rule| match (collection_id, &rule.collection_id) {
                (None, _) | (Some(_), None) => true,
                (Some(wanted), Some(scope)) => wanted == scope,
            })
            .cloned()
            .collect())
    }

    async fn create_collection_relationship(
        &self,
        relationship: &Relationship,
    ) -> Result<Relationship, Self::Error> {
        let _call = self
            .begin("create_collection_relationship", Some(&relationship.source_id))
            .await?;
        let mut state = self.state();
        if state.relationships.iter().any(|r| r.id == relationship.id) {
            return Err(BackendError::Conflict(format!("relationship {}", relationship.id)));
        }
        state.relationships.push(relationship.clone());
        Ok(relationship.clone())
    }

    async fn update_collection_relationship(
        &self,
        relationship: &Relationship,
    ) -> Result<Relationship, Self::Error> {
        let _call = self
            .begin("update_collection_relationship", Some(&relationship.source_id))
            .await?;
        let mut state = self.state();
        let existing = state
            .relationships
            .iter_mut()
            .find(|r| r.id == relationship.id)
            .ok_or_else(|| not_found("relationship", relationship.id))?;
        *existing = relationship.clone();
        Ok(relationship.clone())
    }

    async fn delete_collection_relationship(
        &self,
        relationship_id: &RelationshipId,
    ) -> Result<(), Self::Error> {
        let _call = self.begin("delete_collection_relationship", None).await?;
        let mut state = self.state();
        let before = state.relationships.len();
        state.relationships.retain(|r| &r.id != relationship_id);
        if state.relationships.len() == before {
            return Err(not_found("relationship", relationship_id));
        }
        Ok(())
    }

    async fn get_collection_relationships(
        &self,
        item_id: &ItemId,
    ) -> Result<Vec<Relationship>, Self::Error> {
        let _call = self.begin("get_collection_relationships", Some(item_id)).await?;
        Ok(self
            .state()
            .relationships
            .iter()
            .filter(|r| r.involves(item_id))
            .cloned()
            .collect())
    }

    async fn suggest_collection_relationships(
        &self,
        item_id: &ItemId,
    ) -> Result<Vec<RelationshipSuggestion>, Self::Error> {
        let _call = self
            .begin("suggest_collection_relationships", Some(item_id))
            .await?;
        Ok(self
            .state()
            .candidates
            .get(&(SuggestionKind::Related, item_id.clone()))
            .cloned()
            .unwrap_or_default())
    }

    async fn find_similar_collections(
        &self,
        item_id: &ItemId,
        limit: usize,
    ) -> Result<Vec<RelationshipSuggestion>, Self::Error> {
        let _call = self.begin("find_similar_collections", Some(item_id)).await?;
        let mut similar = self
            .state()
            .candidates
            .get(&(SuggestionKind::Similar, item_id.clone()))
            .cloned()
            .unwrap_or_default();
        similar.truncate(limit);
        Ok(similar)
    }

    async fn discover_cultural_variants(
        &self,
        item_id: &ItemId,
    ) -> Result<Vec<RelationshipSuggestion>, Self::Error> {
        let _call = self.begin("discover_cultural_variants", Some(item_id)).await?;
        Ok(self
            .state()
            .candidates
            .get(&(SuggestionKind::CulturalVariant, item_id.clone()))
            .cloned()
            .unwrap_or_default())
    }

    async fn find_community_responses(
        &self,
        item_id: &ItemId,
    ) -> Result<Vec<RelationshipSuggestion>, Self::Error> {
        let _call = self.begin("find_community_responses", Some(item_id)).await?;
        Ok(self
            .state()
            .candidates
            .get(&(SuggestionKind::CommunityResponse, item_id.clone()))
            .cloned()
            .unwrap_or_default())
    }

    async fn validate_collection_relationship(
        &self,
        source_id: &ItemId,
        target_id: &ItemId,
        relationship_type: RelationshipType,
    ) -> Result<RelationshipValidation, Self::Error> {
        let _call = self
            .begin("validate_collection_relationship", Some(source_id))
            .await?;
        let state = self.state();

        let key = (source_id.clone(), target_id.clone(), relationship_type);
        if let Some(validation) = state.validations.get(&key) {
            return Ok(validation.clone());
        }

        let mut validation = RelationshipValidation::default();
        for id in [source_id, target_id] {
            if !state.items.contains_key(id) {
                validation.valid = false;
                validation.issues.push(format!("Unknown item: {}", id));
            }
        }
        Ok(validation)
    }

    async fn create_custom_pathway(
        &self,
        pathway: &EducationalPathway,
    ) -> Result<EducationalPathway, Self::Error> {
        let _call = self.begin("create_custom_pathway", None).await?;
        self.state().pathways.push(pathway.clone());
        Ok(pathway.clone())
    }

    async fn get_recommended_pathways(
        &self,
        item_id: &ItemId,
    ) -> Result<Vec<EducationalPathway>, Self::Error> {
        let _call = self.begin("get_recommended_pathways", Some(item_id)).await?;
        Ok(self
            .state()
            .pathways
            .iter()
            .filter(|p| p.items.contains(item_id))
            .cloned()
            .collect())
    }

    async fn get_network_health(&self, item_id: &ItemId) -> Result<NetworkHealth, Self::Error> {
        let _call = self.begin("get_network_health", Some(item_id)).await?;
        let state = self.state();

        let touching: Vec<&Relationship> =
            state.relationships.iter().filter(|r| r.involves(item_id)).collect();
        if touching.is_empty() {
            return Ok(NetworkHealth {
                item_id: item_id.clone(),
                ..Default::default()
            });
        }

        let orphaned_items = touching
            .iter()
            .filter_map(|r| r.other_end(item_id))
            .collect::<HashSet<_>>()
            .into_iter()
            .filter(|neighbor| {
                state
                    .relationships
                    .iter()
                    .filter(|r| r.involves(neighbor))
                    .count()
                    == 1
            })
            .count();
        let validated = touching
            .iter()
            .filter(|r| r.validation_status == ValidationStatus::Validated)
            .count();

        Ok(NetworkHealth {
            item_id: item_id.clone(),
            orphaned_items,
            pending_validations: touching.len() - validated,
            health_score: validated as f64 / touching.len() as f64,
        })
    }

    async fn get_cultural_protocols(&self, cultural_origin: &str) -> Result<Vec<String>, Self::Error> {
        let _call = self.begin("get_cultural_protocols", None).await?;
        Ok(self
            .state()
            .protocols
            .get(cultural_origin)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_organization_config(&self) -> Result<SmartOrganizationConfig, Self::Error> {
        let _call = self.begin("get_organization_config", None).await?;
        Ok(self.state().config.clone())
    }

    async fn update_organization_config(
        &self,
        update: &OrganizationConfigUpdate,
    ) -> Result<SmartOrganizationConfig, Self::Error> {
        let _call = self.begin("update_organization_config", None).await?;
        let mut state = self.state();
        state.config.apply(update);
        Ok(state.config.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tapestry_domain::{SensitivityLevel, TagSource};

    fn create_test_item(id: &str) -> ContentItem {
        ContentItem::new(id, ItemType::Document).with_title(format!("Item {}", id))
    }

    #[tokio::test]
    async fn test_derived_analysis_annotates_categories() {
        let backend = InMemoryBackend::new();
        backend.add_item(
            create_test_item("doc-1").with_cultural(CulturalMetadata::new(SensitivityLevel::Guardian)),
        );
        backend.script_tag_suggestions(
            "doc-1",
            vec![TagSuggestion::new("weaving", 0.9, "content", TagSource::ContentAnalysis)],
        );
        backend.script_category_suggestions("doc-1", vec![RawCategorySuggestion::new("ritual", 0.7)]);

        let analysis = backend
            .analyze_item_organization(&"doc-1".into(), ItemType::Document)
            .await
            .unwrap();

        assert_eq!(analysis.suggested_tags.len(), 1);
        let category = &analysis.suggested_categories[0];
        assert_eq!(category.cultural_appropriateness, 0.6);
        assert!(category.requires_community_validation);
        assert!((analysis.overall_confidence - 0.8).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_unknown_item_analysis_fails() {
        let backend = InMemoryBackend::new();
        let result = backend
            .analyze_item_organization(&"missing".into(), ItemType::Document)
            .await;
        assert!(matches!(result, Err(BackendError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_failure_injection_counts_call() {
        let backend = InMemoryBackend::new();
        backend.add_item(create_test_item("doc-1"));
        backend.fail_operation("get_content_item");

        assert!(backend.get_content_item(&"doc-1".into()).await.is_err());
        assert_eq!(backend.call_count("get_content_item"), 1);

        backend.recover_operation("get_content_item");
        assert!(backend.get_content_item(&"doc-1".into()).await.is_ok());
    }

    #[tokio::test]
    async fn test_rules_scoped_by_collection() {
        use tapestry_domain::{ConditionOperator, RuleAction, RuleCondition, RuleValue};

        let condition = RuleCondition {
            field: "title".into(),
            operator: ConditionOperator::Contains,
            value: RuleValue::Text("star".into()),
        };
        let global = OrganizationRule::new("global", condition.clone(), RuleAction::AddTag("a".into()));
        let mut scoped = OrganizationRule::new("scoped", condition, RuleAction::AddTag("b".into()));
        scoped.collection_id = Some("col-1".into());

        let backend = InMemoryBackend::new();
        backend.add_rule(global);
        backend.add_rule(scoped);

        assert_eq!(backend.get_organization_rules(None).await.unwrap().len(), 2);
        assert_eq!(
            backend.get_organization_rules(Some(&"col-1".into())).await.unwrap().len(),
            2
        );
        assert_eq!(
            backend.get_organization_rules(Some(&"col-2".into())).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_network_health() {
        let backend = InMemoryBackend::new();
        let mut validated = Relationship::new("a".into(), "b".into(), RelationshipType::Sibling, 0.8, 0);
        validated.validation_status = ValidationStatus::Validated;
        backend.add_relationship(validated);
        backend.add_relationship(Relationship::new(
            "a".into(),
            "c".into(),
            RelationshipType::Child,
            0.9,
            0,
        ));
        backend.add_relationship(Relationship::new(
            "c".into(),
            "d".into(),
            RelationshipType::Child,
            0.9,
            0,
        ));

        let health = backend.get_network_health(&"a".into()).await.unwrap();
        assert_eq!(health.orphaned_items, 1);
        assert_eq!(health.pending_validations, 1);
        assert!((health.health_score - 0.5).abs() < 1e-9);
    }
}
