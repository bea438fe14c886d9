//! Educational pathway construction

use crate::network::{Explored, Node};
use tapestry_domain::{EducationalPathway, ItemId, PathwayId, RelationshipType};

/// Position of an item in a learning sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LearningStage {
    /// Traditions and parent material the center builds on
    Foundations,
    /// The item the pathway is built around
    Center,
    /// Parallel views: siblings, cultural variants, translations
    Perspectives,
    /// Supplements and research that go further
    Deepening,
    /// Community responses, adaptations and derived material
    Responses,
}

impl LearningStage {
    /// Stage of an item reached through a relationship of this type
    pub fn for_relationship(relationship_type: RelationshipType) -> Self {
        match relationship_type {
            RelationshipType::TraditionalContinuation | RelationshipType::Parent => {
                LearningStage::Foundations
            }
            RelationshipType::Sibling
            | RelationshipType::CulturalVariant
            | RelationshipType::Translation => LearningStage::Perspectives,
            RelationshipType::EducationalSupplement | RelationshipType::ResearchExtension => {
                LearningStage::Deepening
            }
            RelationshipType::CommunityResponse
            | RelationshipType::ModernAdaptation
            | RelationshipType::Child => LearningStage::Responses,
        }
    }

    fn of(node: &Node) -> Self {
        match node.reached_by {
            Some((relationship_type, _)) => Self::for_relationship(relationship_type),
            None => LearningStage::Center,
        }
    }
}

/// Nodes in learning order: by stage, then hop distance, then strength (strongest first)
pub(crate) fn learning_order(nodes: &[Node]) -> Vec<&Node> {
    let mut ordered: Vec<&Node> = nodes.iter().collect();
    ordered.sort_by(|a, b| {
        let strength = |n: &Node| n.reached_by.map(|(_, s)| s).unwrap_or(1.0);
        LearningStage::of(a)
            .cmp(&LearningStage::of(b))
            .then(a.hop.cmp(&b.hop))
            .then(strength(*b).total_cmp(&strength(*a)))
    });
    ordered
}

/// Deduplicated "Learn about <origin>" goals in first-seen order
pub(crate) fn learning_goals<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> Vec<String> {
    let mut goals: Vec<String> = Vec::new();
    for node in nodes {
        if let Some(origin) = &node.origin {
            let goal = format!("Learn about {}", origin);
            if !goals.contains(&goal) {
                goals.push(goal);
            }
        }
    }
    goals
}

/// Deduplicated union of traditional protocols in first-seen order
pub(crate) fn cultural_requirements<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> Vec<String> {
    let mut requirements: Vec<String> = Vec::new();
    for protocol in nodes.into_iter().flat_map(|n| n.protocols.iter()) {
        if !requirements.contains(protocol) {
            requirements.push(protocol.clone());
        }
    }
    requirements
}

/// Build a pathway over nodes that are already in learning order
pub(crate) fn pathway(title: String, nodes: &[&Node]) -> EducationalPathway {
    EducationalPathway {
        id: PathwayId::new(),
        title,
        items: nodes.iter().map(|n| n.id.clone()).collect(),
        cultural_learning_goals: learning_goals(nodes.iter().copied()),
        cultural_requirements: cultural_requirements(nodes.iter().copied()),
    }
}

/// One comprehensive pathway, then one per cultural cluster with two or more items
pub(crate) fn educational_pathways(explored: &Explored) -> Vec<EducationalPathway> {
    let ordered = learning_order(&explored.nodes);

    let center_name = explored
        .nodes
        .first()
        .filter(|n| !n.title.is_empty())
        .map(|n| n.title.clone())
        .unwrap_or_else(|| explored.network.center_id.to_string());

    let mut pathways = vec![pathway(format!("Exploring {}", center_name), &ordered)];

    for cluster in &explored.network.cultural_clusters {
        if cluster.items.len() < 2 {
            continue;
        }
        let members: Vec<&Node> = ordered
            .iter()
            .copied()
            .filter(|n| cluster.items.contains(&n.id))
            .collect();
        pathways.push(pathway(
            format!("{} perspectives", cluster.cultural_origin),
            &members,
        ));
    }

    pathways
}

/// Nodes for a caller-chosen item list, keeping the caller's order
pub(crate) fn custom_nodes(items: &[ItemId], described: Vec<Node>) -> Vec<Node> {
    items
        .iter()
        .map(|id| {
            described
                .iter()
                .find(|n| &n.id == id)
                .cloned()
                .unwrap_or_else(|| Node::new(id.clone(), 0, None))
        })
        .collect()
}
