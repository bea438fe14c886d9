//! Relationship graph engine

use crate::filter::filter_relationship_suggestions;
use crate::network::{assemble, Explored, Node};
use crate::pathway::{custom_nodes, educational_pathways, pathway};
use crate::{GraphConfig, GraphError};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tapestry_cache::{Clock, SystemClock, TtlCache};
use tapestry_domain::scoring::{calculate_relationship_strength, clamp_unit};
use tapestry_domain::traits::OrganizationBackend;
use tapestry_domain::{
    ContentItem, CulturalCluster, EducationalPathway, IndirectRelationship, ItemId, NetworkHealth,
    Relationship, RelationshipContext, RelationshipId, RelationshipNetwork, RelationshipSuggestion,
    RelationshipType, RelationshipValidation, SensitivityLevel, ValidationStatus,
};
use tracing::{debug, error, info, warn};

/// Educational value added to a variant linking two different cultures
const CROSS_CULTURAL_BONUS: f64 = 0.2;

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Relationship graph over the backend's items
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use tapestry_backend::InMemoryBackend;
/// use tapestry_domain::{ContentItem, ItemType, RelationshipType};
/// use tapestry_graph::{GraphConfig, RelationshipGraph};
///
/// # #[tokio::main]
/// # async fn main() {
/// let backend = Arc::new(InMemoryBackend::new());
/// backend.add_item(ContentItem::new("a", ItemType::Collection));
/// backend.add_item(ContentItem::new("b", ItemType::Collection));
///
/// let graph = RelationshipGraph::new(backend, GraphConfig::default());
/// let created = graph
///     .create_relationship(&"a".into(), &"b".into(), RelationshipType::Sibling, None)
///     .await
///     .unwrap();
/// assert!(created.bidirectional);
/// assert!((created.strength - 0.9).abs() < 1e-9);
/// # }
/// ```
pub struct RelationshipGraph<B>
where
    B: OrganizationBackend,
{
    backend: Arc<B>,
    config: GraphConfig,
    relationships: TtlCache<ItemId, Vec<Relationship>>,
    networks: TtlCache<(ItemId, usize), Arc<Explored>>,
}

impl<B> RelationshipGraph<B>
where
    B: OrganizationBackend,
{
    /// Create a new graph engine using wall-clock time for cache expiry
    pub fn new(backend: Arc<B>, config: GraphConfig) -> Self {
        Self::with_clock(backend, config, Arc::new(SystemClock))
    }

    /// Create a new graph engine with an explicit cache clock
    pub fn with_clock(backend: Arc<B>, config: GraphConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            relationships: TtlCache::new(
                config.relationship_ttl(),
                config.cache_capacity,
                clock.clone(),
            ),
            networks: TtlCache::new(config.network_ttl(), config.cache_capacity, clock),
            backend,
            config,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Drop cached relationship lists for an item and every cached network
    /// that reached it
    pub fn invalidate(&self, item_id: &ItemId) {
        self.relationships.invalidate(item_id);
        let dropped = self.networks.invalidate_where(|(center, _), explored| {
            center == item_id || explored.nodes.iter().any(|node| &node.id == item_id)
        });
        debug!("Invalidated caches for {} ({} networks)", item_id, dropped);
    }

    /// Drop every cached entry
    pub fn clear_caches(&self) {
        self.relationships.clear();
        self.networks.clear();
    }

    async fn load_item(&self, item_id: &ItemId) -> Option<ContentItem> {
        match self.backend.get_content_item(item_id).await {
            Ok(item) => Some(item),
            Err(e) => {
                warn!("Could not load item {}: {}", item_id, e);
                None
            }
        }
    }

    // --- Validation and writes ---

    /// Validate a proposed relationship
    ///
    /// Starts from the backend's baseline. Self-relationships are invalid.
    /// Guarded or sacred material on either end recommends community
    /// approval (which never blocks creation). A cultural variant linking two
    /// different origins gains educational value.
    pub async fn validate_relationship(
        &self,
        source_id: &ItemId,
        target_id: &ItemId,
        relationship_type: RelationshipType,
    ) -> Result<RelationshipValidation, GraphError> {
        let mut validation = self
            .backend
            .validate_collection_relationship(source_id, target_id, relationship_type)
            .await
            .map_err(|e| {
                error!("Relationship validation failed for {} -> {}: {}", source_id, target_id, e);
                GraphError::Backend("validate relationship")
            })?;

        if source_id == target_id {
            validation.valid = false;
            validation
                .issues
                .push("An item cannot be related to itself".to_string());
            return Ok(validation);
        }

        let source = self.load_item(source_id).await;
        let target = self.load_item(target_id).await;

        let guarded = [&source, &target].iter().any(|item| {
            item.as_ref()
                .and_then(|i| i.cultural.as_ref())
                .is_some_and(|c| c.sensitivity_level >= SensitivityLevel::Guardian)
        });
        if guarded {
            validation.requires_community_approval = true;
            validation
                .suggestions
                .push("Invite community review of this relationship".to_string());
        }

        let source_origin = source.as_ref().and_then(|i| i.cultural_origin());
        let target_origin = target.as_ref().and_then(|i| i.cultural_origin());
        if relationship_type == RelationshipType::CulturalVariant {
            if let (Some(a), Some(b)) = (source_origin, target_origin) {
                if a != b {
                    validation.educational_value =
                        clamp_unit(validation.educational_value + CROSS_CULTURAL_BONUS);
                }
            }
        }
        validation.educational_value = clamp_unit(validation.educational_value);

        Ok(validation)
    }

    /// Validate, then persist a new relationship
    ///
    /// Strength is derived from the type and educational value. Relationships
    /// that need community approval are stored in `community_review` status.
    pub async fn create_relationship(
        &self,
        source_id: &ItemId,
        target_id: &ItemId,
        relationship_type: RelationshipType,
        context: Option<RelationshipContext>,
    ) -> Result<Relationship, GraphError> {
        let validation = self
            .validate_relationship(source_id, target_id, relationship_type)
            .await?;
        if !validation.valid {
            return Err(GraphError::InvalidRelationship(validation.issues.join("; ")));
        }

        let strength = calculate_relationship_strength(relationship_type, validation.educational_value);
        let mut relationship = Relationship::new(
            source_id.clone(),
            target_id.clone(),
            relationship_type,
            strength,
            now_secs(),
        );
        relationship.validation_status = status_for(&validation);
        if let Some(context) = context {
            relationship.created_by = context.created_by;
            relationship.cultural_context = context.cultural_context;
        }

        let created = self
            .backend
            .create_collection_relationship(&relationship)
            .await
            .map_err(|e| {
                error!("Failed to create relationship {} -> {}: {}", source_id, target_id, e);
                GraphError::Backend("create relationship")
            })?;

        self.invalidate(source_id);
        self.invalidate(target_id);
        info!(
            "Created {} relationship {} -> {} (strength {:.2})",
            relationship_type, source_id, target_id, strength
        );

        Ok(created)
    }

    /// Revalidate and persist changes to an existing relationship
    ///
    /// Strength, direction and review status are recomputed from the
    /// (possibly changed) type.
    pub async fn update_relationship(
        &self,
        mut relationship: Relationship,
    ) -> Result<Relationship, GraphError> {
        let validation = self
            .validate_relationship(
                &relationship.source_id,
                &relationship.target_id,
                relationship.relationship_type,
            )
            .await?;
        if !validation.valid {
            return Err(GraphError::InvalidRelationship(validation.issues.join("; ")));
        }

        relationship.strength =
            calculate_relationship_strength(relationship.relationship_type, validation.educational_value);
        relationship.bidirectional = relationship.relationship_type.is_bidirectional();
        relationship.validation_status = status_for(&validation);

        let updated = self
            .backend
            .update_collection_relationship(&relationship)
            .await
            .map_err(|e| {
                error!("Failed to update relationship {}: {}", relationship.id, e);
                GraphError::Backend("update relationship")
            })?;

        self.invalidate(&relationship.source_id);
        self.invalidate(&relationship.target_id);
        Ok(updated)
    }

    /// Delete a relationship
    ///
    /// The endpoints are not known from the id alone, so every cache is
    /// cleared.
    pub async fn delete_relationship(&self, relationship_id: &RelationshipId) -> Result<(), GraphError> {
        self.backend
            .delete_collection_relationship(relationship_id)
            .await
            .map_err(|e| {
                error!("Failed to delete relationship {}: {}", relationship_id, e);
                GraphError::Backend("delete relationship")
            })?;

        self.clear_caches();
        info!("Deleted relationship {}", relationship_id);
        Ok(())
    }

    /// Every relationship touching an item (cached)
    pub async fn get_relationships(&self, item_id: &ItemId) -> Result<Vec<Relationship>, GraphError> {
        if let Some(cached) = self.relationships.get(item_id) {
            debug!("Relationship cache hit for {}", item_id);
            return Ok(cached);
        }

        let relationships = self
            .backend
            .get_collection_relationships(item_id)
            .await
            .map_err(|e| {
                error!("Failed to load relationships for {}: {}", item_id, e);
                GraphError::Backend("load relationships")
            })?;

        self.relationships.insert(item_id.clone(), relationships.clone());
        Ok(relationships)
    }

    // --- Candidates ---

    /// Filtered relationship candidates for an item
    pub async fn suggest_relationships(
        &self,
        item_id: &ItemId,
    ) -> Result<Vec<RelationshipSuggestion>, GraphError> {
        let candidates = self
            .backend
            .suggest_collection_relationships(item_id)
            .await
            .map_err(|e| {
                error!("Relationship suggestion failed for {}: {}", item_id, e);
                GraphError::Backend("suggest relationships")
            })?;
        Ok(filter_relationship_suggestions(item_id, candidates))
    }

    /// Filtered similar items (`limit` defaults to the configured limit)
    pub async fn find_similar_collections(
        &self,
        item_id: &ItemId,
        limit: Option<usize>,
    ) -> Result<Vec<RelationshipSuggestion>, GraphError> {
        let limit = limit.unwrap_or(self.config.similar_limit);
        let candidates = self
            .backend
            .find_similar_collections(item_id, limit)
            .await
            .map_err(|e| {
                error!("Similarity search failed for {}: {}", item_id, e);
                GraphError::Backend("find similar collections")
            })?;
        let mut similar = filter_relationship_suggestions(item_id, candidates);
        similar.truncate(limit);
        Ok(similar)
    }

    /// Filtered cultural variants of an item
    pub async fn discover_cultural_variants(
        &self,
        item_id: &ItemId,
    ) -> Result<Vec<RelationshipSuggestion>, GraphError> {
        let candidates = self
            .backend
            .discover_cultural_variants(item_id)
            .await
            .map_err(|e| {
                error!("Cultural variant discovery failed for {}: {}", item_id, e);
                GraphError::Backend("discover cultural variants")
            })?;
        Ok(filter_relationship_suggestions(item_id, candidates))
    }

    /// Filtered community responses to an item
    pub async fn find_community_responses(
        &self,
        item_id: &ItemId,
    ) -> Result<Vec<RelationshipSuggestion>, GraphError> {
        let candidates = self
            .backend
            .find_community_responses(item_id)
            .await
            .map_err(|e| {
                error!("Community response lookup failed for {}: {}", item_id, e);
                GraphError::Backend("find community responses")
            })?;
        Ok(filter_relationship_suggestions(item_id, candidates))
    }

    // --- Network analysis ---

    async fn explore(&self, item_id: &ItemId, depth: usize) -> Result<Arc<Explored>, GraphError> {
        let key = (item_id.clone(), depth);
        if let Some(cached) = self.networks.get(&key) {
            debug!("Network cache hit for {} at depth {}", item_id, depth);
            return Ok(cached);
        }

        let mut nodes = vec![Node::new(item_id.clone(), 0, None)];
        let mut visited: HashSet<ItemId> = HashSet::from([item_id.clone()]);
        let mut seen_edges: HashSet<RelationshipId> = HashSet::new();
        let mut direct = Vec::new();
        let mut indirect = Vec::new();
        let mut frontier = vec![item_id.clone()];

        for hop in 1..=depth {
            let mut next = Vec::new();
            for node_id in &frontier {
                let relationships = self.get_relationships(node_id).await.map_err(|_| {
                    GraphError::Backend("analyze relationship network")
                })?;

                for relationship in relationships {
                    if !seen_edges.insert(relationship.id) {
                        continue;
                    }
                    if let Some(other) = relationship.other_end(node_id) {
                        if visited.insert(other.clone()) {
                            nodes.push(Node::new(
                                other.clone(),
                                hop,
                                Some((relationship.relationship_type, relationship.strength)),
                            ));
                            next.push(other.clone());
                        }
                    }
                    if hop == 1 {
                        direct.push(relationship);
                    } else {
                        indirect.push(IndirectRelationship {
                            relationship,
                            depth: hop,
                        });
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }

        for node in nodes.iter_mut() {
            if let Some(item) = self.load_item(&node.id).await {
                node.describe(&item);
            }
        }

        debug!(
            "Explored {} items and {} edges around {} (depth {})",
            nodes.len(),
            direct.len() + indirect.len(),
            item_id,
            depth
        );

        let explored = Arc::new(assemble(item_id.clone(), depth, nodes, direct, indirect));
        self.networks.insert(key, explored.clone());
        Ok(explored)
    }

    /// Bounded breadth-first view of the graph around an item (cached)
    ///
    /// `depth` defaults to the configured depth and is clamped to the
    /// configured maximum. A depth of 0 yields a network of the center alone.
    pub async fn analyze_relationship_network(
        &self,
        item_id: &ItemId,
        depth: Option<usize>,
    ) -> Result<RelationshipNetwork, GraphError> {
        let depth = self.config.clamp_depth(depth);
        if depth == 0 {
            return Ok(RelationshipNetwork::empty(item_id.clone(), 0));
        }
        Ok(self.explore(item_id, depth).await?.network.clone())
    }

    /// Cultural clusters in the network around an item
    pub async fn get_cultural_clusters(
        &self,
        item_id: &ItemId,
        depth: Option<usize>,
    ) -> Result<Vec<CulturalCluster>, GraphError> {
        Ok(self
            .analyze_relationship_network(item_id, depth)
            .await?
            .cultural_clusters)
    }

    /// Community-response edges in the network around an item
    pub async fn get_community_network(
        &self,
        item_id: &ItemId,
        depth: Option<usize>,
    ) -> Result<Vec<Relationship>, GraphError> {
        self.edges_of_types(item_id, depth, &[RelationshipType::CommunityResponse])
            .await
    }

    /// Parent, child and traditional-continuation edges around an item
    pub async fn get_traditional_hierarchy(
        &self,
        item_id: &ItemId,
        depth: Option<usize>,
    ) -> Result<Vec<Relationship>, GraphError> {
        self.edges_of_types(
            item_id,
            depth,
            &[
                RelationshipType::TraditionalContinuation,
                RelationshipType::Parent,
                RelationshipType::Child,
            ],
        )
        .await
    }

    async fn edges_of_types(
        &self,
        item_id: &ItemId,
        depth: Option<usize>,
        types: &[RelationshipType],
    ) -> Result<Vec<Relationship>, GraphError> {
        let network = self.analyze_relationship_network(item_id, depth).await?;
        Ok(network
            .direct
            .into_iter()
            .chain(network.indirect.into_iter().map(|i| i.relationship))
            .filter(|r| types.contains(&r.relationship_type))
            .collect())
    }

    // --- Pathways ---

    /// Learning pathways through the depth-3 network around an item
    ///
    /// One pathway covers the whole network; each cultural cluster with two
    /// or more items gets its own.
    pub async fn generate_educational_pathways(
        &self,
        item_id: &ItemId,
    ) -> Result<Vec<EducationalPathway>, GraphError> {
        let depth = self.config.clamp_depth(Some(3));
        let explored = if depth == 0 {
            let mut center = Node::new(item_id.clone(), 0, None);
            if let Some(item) = self.load_item(item_id).await {
                center.describe(&item);
            }
            Arc::new(assemble(item_id.clone(), 0, vec![center], Vec::new(), Vec::new()))
        } else {
            self.explore(item_id, depth).await.map_err(|_| {
                GraphError::Backend("generate educational pathways")
            })?
        };
        Ok(educational_pathways(&explored))
    }

    /// Persist a pathway over caller-chosen items, in the given order
    pub async fn create_custom_pathway(
        &self,
        title: &str,
        items: &[ItemId],
    ) -> Result<EducationalPathway, GraphError> {
        if items.is_empty() {
            return Err(GraphError::InvalidPathway("a pathway needs at least one item".to_string()));
        }
        if title.trim().is_empty() {
            return Err(GraphError::InvalidPathway("a pathway needs a title".to_string()));
        }

        let mut described = Vec::new();
        for item_id in items {
            let mut node = Node::new(item_id.clone(), 0, None);
            if let Some(item) = self.load_item(item_id).await {
                node.describe(&item);
            }
            described.push(node);
        }
        let nodes = custom_nodes(items, described);
        let refs: Vec<&Node> = nodes.iter().collect();
        let draft = pathway(title.to_string(), &refs);

        self.backend
            .create_custom_pathway(&draft)
            .await
            .map_err(|e| {
                error!("Failed to create pathway '{}': {}", title, e);
                GraphError::Backend("create pathway")
            })
    }

    /// Pathways the backend recommends from an item
    pub async fn get_recommended_pathways(
        &self,
        item_id: &ItemId,
    ) -> Result<Vec<EducationalPathway>, GraphError> {
        self.backend
            .get_recommended_pathways(item_id)
            .await
            .map_err(|e| {
                error!("Failed to load recommended pathways for {}: {}", item_id, e);
                GraphError::Backend("load recommended pathways")
            })
    }

    /// Backend health report for the graph around an item
    pub async fn get_network_health(&self, item_id: &ItemId) -> Result<NetworkHealth, GraphError> {
        self.backend.get_network_health(item_id).await.map_err(|e| {
            error!("Failed to load network health for {}: {}", item_id, e);
            GraphError::Backend("load network health")
        })
    }

    /// Protocols recorded for a cultural origin
    pub async fn get_cultural_protocols(&self, cultural_origin: &str) -> Result<Vec<String>, GraphError> {
        self.backend
            .get_cultural_protocols(cultural_origin)
            .await
            .map_err(|e| {
                error!("Failed to load protocols for {}: {}", cultural_origin, e);
                GraphError::Backend("load cultural protocols")
            })
    }
}

fn status_for(validation: &RelationshipValidation) -> ValidationStatus {
    if validation.requires_community_approval {
        ValidationStatus::CommunityReview
    } else {
        ValidationStatus::Validated
    }
}
