//! Network assembly: clusters and statistics from a finished traversal

use std::collections::{HashMap, HashSet};
use tapestry_domain::scoring::{cluster_significance, community_participation, mean, network_diversity};
use tapestry_domain::{
    ContentItem, CulturalCluster, IndirectRelationship, ItemId, NetworkStatistics, Relationship,
    RelationshipNetwork, RelationshipType,
};

/// An item reached by a traversal
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Node {
    pub id: ItemId,
    pub hop: usize,
    /// Type and strength of the edge the item was first reached through
    pub reached_by: Option<(RelationshipType, f64)>,
    pub title: String,
    pub origin: Option<String>,
    pub protocols: Vec<String>,
}

impl Node {
    pub fn new(id: ItemId, hop: usize, reached_by: Option<(RelationshipType, f64)>) -> Self {
        Self {
            id,
            hop,
            reached_by,
            title: String::new(),
            origin: None,
            protocols: Vec::new(),
        }
    }

    pub fn describe(&mut self, item: &ContentItem) {
        self.title = item.title.clone();
        self.origin = item.cultural_origin().map(str::to_string);
        self.protocols = item
            .cultural
            .as_ref()
            .map(|c| c.traditional_protocols.clone())
            .unwrap_or_default();
    }
}

/// A network analysis plus the per-item detail pathways need
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Explored {
    pub network: RelationshipNetwork,
    /// Every reached item in traversal order, center first
    pub nodes: Vec<Node>,
}

/// Build the network report for a traversal
pub(crate) fn assemble(
    center_id: ItemId,
    depth: usize,
    nodes: Vec<Node>,
    direct: Vec<Relationship>,
    indirect: Vec<IndirectRelationship>,
) -> Explored {
    let cultural_clusters = clusters(&nodes, &direct, &indirect);

    let distinct_origins = nodes
        .iter()
        .filter_map(|n| n.origin.as_deref())
        .collect::<HashSet<_>>()
        .len();
    let community_responses = direct
        .iter()
        .filter(|r| r.relationship_type == RelationshipType::CommunityResponse)
        .count();
    let average_strength = mean(
        direct
            .iter()
            .chain(indirect.iter().map(|i| &i.relationship))
            .map(|r| r.strength),
    );

    let statistics = NetworkStatistics {
        total_nodes: nodes.len().max(1),
        direct_relationships: direct.len(),
        indirect_relationships: indirect.len(),
        cultural_diversity: network_diversity(distinct_origins),
        community_participation: community_participation(community_responses, direct.len()),
        average_strength,
    };

    Explored {
        network: RelationshipNetwork {
            center_id,
            depth,
            direct,
            indirect,
            cultural_clusters,
            statistics,
        },
        nodes,
    }
}

/// Group reached items by cultural origin, in order of first appearance
///
/// The cluster center is the member with the most edges inside the network;
/// ties go to the member reached first.
fn clusters(
    nodes: &[Node],
    direct: &[Relationship],
    indirect: &[IndirectRelationship],
) -> Vec<CulturalCluster> {
    let mut degree: HashMap<&ItemId, usize> = HashMap::new();
    for relationship in direct.iter().chain(indirect.iter().map(|i| &i.relationship)) {
        *degree.entry(&relationship.source_id).or_insert(0) += 1;
        *degree.entry(&relationship.target_id).or_insert(0) += 1;
    }

    let mut origins: Vec<&str> = Vec::new();
    let mut members: HashMap<&str, Vec<&Node>> = HashMap::new();
    for node in nodes {
        if let Some(origin) = node.origin.as_deref() {
            let group = members.entry(origin).or_insert_with(|| {
                origins.push(origin);
                Vec::new()
            });
            group.push(node);
        }
    }

    let total_nodes = nodes.len();
    origins
        .into_iter()
        .filter_map(|origin| {
            let group = members.remove(origin)?;

            let mut center = group[0];
            for node in &group[1..] {
                let current = degree.get(&center.id).copied().unwrap_or(0);
                if degree.get(&node.id).copied().unwrap_or(0) > current {
                    center = node;
                }
            }

            let with_protocols = group.iter().filter(|n| !n.protocols.is_empty()).count();
            Some(CulturalCluster {
                cultural_origin: origin.to_string(),
                items: group.iter().map(|n| n.id.clone()).collect(),
                center_item: center.id.clone(),
                cultural_significance: cluster_significance(group.len(), total_nodes, with_protocols),
            })
        })
        .collect()
}
