//! Network analysis results: clusters, statistics and learning pathways

use crate::{ItemId, Relationship};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An edge found beyond the first hop of a traversal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndirectRelationship {
    /// The edge
    pub relationship: Relationship,

    /// Hop distance from the center (>= 2)
    pub depth: usize,
}

/// Items sharing a cultural origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CulturalCluster {
    /// Shared origin
    pub cultural_origin: String,

    /// Members, in traversal order
    pub items: Vec<ItemId>,

    /// Representative member
    pub center_item: ItemId,

    /// Derived significance in [0.0, 1.0]
    pub cultural_significance: f64,
}

/// Aggregate metrics of a relationship network
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkStatistics {
    /// Distinct items reached (center included)
    pub total_nodes: usize,

    /// One-hop edges
    pub direct_relationships: usize,

    /// Edges two or more hops away
    pub indirect_relationships: usize,

    /// `min(1, distinct origins / 10)`
    pub cultural_diversity: f64,

    /// Share of direct edges that are community responses
    pub community_participation: f64,

    /// Mean strength over every edge in the network
    pub average_strength: f64,
}

/// Bounded-depth view of the graph around one item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipNetwork {
    /// Item the traversal started from
    pub center_id: ItemId,

    /// Maximum hop count explored
    pub depth: usize,

    /// One-hop edges
    pub direct: Vec<Relationship>,

    /// Edges two or more hops away
    pub indirect: Vec<IndirectRelationship>,

    /// Items grouped by cultural origin
    pub cultural_clusters: Vec<CulturalCluster>,

    /// Aggregate metrics
    pub statistics: NetworkStatistics,
}

impl RelationshipNetwork {
    /// Network containing only the center item
    pub fn empty(center_id: ItemId, depth: usize) -> Self {
        Self {
            center_id,
            depth,
            direct: Vec::new(),
            indirect: Vec::new(),
            cultural_clusters: Vec::new(),
            statistics: NetworkStatistics {
                total_nodes: 1,
                ..Default::default()
            },
        }
    }
}

/// Identifier of an educational pathway (UUIDv7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathwayId(uuid::Uuid);

impl PathwayId {
    /// Generate a new pathway id
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }
}

impl Default for PathwayId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PathwayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordered learning sequence over related items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationalPathway {
    /// Pathway identifier
    pub id: PathwayId,

    /// Display title
    pub title: String,

    /// Items in learning order
    pub items: Vec<ItemId>,

    /// Deduplicated "Learn about <origin>" goals
    pub cultural_learning_goals: Vec<String>,

    /// Deduplicated union of traditional protocols
    pub cultural_requirements: Vec<String>,
}

/// Backend-reported health of the graph around an item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkHealth {
    /// Item the report is about
    pub item_id: ItemId,

    /// Related items with no other connections
    #[serde(default)]
    pub orphaned_items: usize,

    /// Relationships awaiting community review
    #[serde(default)]
    pub pending_validations: usize,

    /// Overall score in [0.0, 1.0]
    #[serde(default)]
    pub health_score: f64,
}
