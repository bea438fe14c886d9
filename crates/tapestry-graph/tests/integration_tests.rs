//! Integration tests for the relationship graph against the in-memory backend

use std::sync::Arc;
use std::time::Duration;
use tapestry_backend::{InMemoryBackend, SuggestionKind};
use tapestry_cache::ManualClock;
use tapestry_domain::{
    ContentItem, CulturalMetadata, ItemId, ItemType, Relationship, RelationshipContext,
    RelationshipSuggestion, RelationshipType, SensitivityLevel, ValidationStatus,
};
use tapestry_graph::{GraphConfig, GraphError, RelationshipGraph};

fn create_test_graph() -> (RelationshipGraph<InMemoryBackend>, Arc<InMemoryBackend>, Arc<ManualClock>) {
    let backend = Arc::new(InMemoryBackend::new());
    let clock = Arc::new(ManualClock::new());
    let graph = RelationshipGraph::with_clock(backend.clone(), GraphConfig::default(), clock.clone());
    (graph, backend, clock)
}

fn item(id: &str, origin: Option<&str>, level: SensitivityLevel) -> ContentItem {
    let mut metadata = CulturalMetadata::new(level);
    if let Some(origin) = origin {
        metadata = metadata.with_origin(origin);
    }
    ContentItem::new(id, ItemType::Collection)
        .with_title(format!("Collection {}", id))
        .with_cultural(metadata)
}

fn link(backend: &InMemoryBackend, source: &str, target: &str, kind: RelationshipType) -> Relationship {
    let relationship = Relationship::new(source.into(), target.into(), kind, kind.base_strength(), 0);
    backend.add_relationship(relationship.clone());
    relationship
}

fn id(s: &str) -> ItemId {
    ItemId::new(s)
}

#[tokio::test]
async fn test_self_relationship_rejected() {
    let (graph, backend, _clock) = create_test_graph();
    backend.add_item(item("a", None, SensitivityLevel::Public));

    let result = graph
        .create_relationship(&id("a"), &id("a"), RelationshipType::Sibling, None)
        .await;

    assert!(matches!(result, Err(GraphError::InvalidRelationship(_))));
    assert_eq!(backend.call_count("create_collection_relationship"), 0);
}

#[tokio::test]
async fn test_guarded_material_goes_to_community_review() {
    let (graph, backend, _clock) = create_test_graph();
    backend.add_item(item("a", Some("Lakota"), SensitivityLevel::Guardian));
    backend.add_item(item("b", Some("Lakota"), SensitivityLevel::Public));

    let validation = graph
        .validate_relationship(&id("a"), &id("b"), RelationshipType::EducationalSupplement)
        .await
        .unwrap();
    assert!(validation.valid, "Approval is advisory and never blocks creation");
    assert!(validation.requires_community_approval);

    let created = graph
        .create_relationship(
            &id("a"),
            &id("b"),
            RelationshipType::EducationalSupplement,
            Some(RelationshipContext {
                created_by: Some("archivist".into()),
                cultural_context: Some("Winter count teaching set".into()),
            }),
        )
        .await
        .unwrap();

    assert_eq!(created.validation_status, ValidationStatus::CommunityReview);
    assert_eq!(created.created_by.as_deref(), Some("archivist"));
    assert!((created.strength - 0.85).abs() < 1e-9);
    assert_eq!(backend.relationships().len(), 1);
}

#[tokio::test]
async fn test_cross_cultural_variant_bonus() {
    let (graph, backend, _clock) = create_test_graph();
    backend.add_item(item("a", Some("Maori"), SensitivityLevel::Public));
    backend.add_item(item("b", Some("Hawaiian"), SensitivityLevel::Public));
    backend.add_item(item("c", Some("Maori"), SensitivityLevel::Public));

    let cross = graph
        .validate_relationship(&id("a"), &id("b"), RelationshipType::CulturalVariant)
        .await
        .unwrap();
    let same = graph
        .validate_relationship(&id("a"), &id("c"), RelationshipType::CulturalVariant)
        .await
        .unwrap();

    assert!((cross.educational_value - 0.7).abs() < 1e-9);
    assert!((same.educational_value - 0.5).abs() < 1e-9);

    let created = graph
        .create_relationship(&id("a"), &id("b"), RelationshipType::CulturalVariant, None)
        .await
        .unwrap();
    assert!(created.bidirectional);
    assert_eq!(created.validation_status, ValidationStatus::Validated);
    assert!((created.strength - 0.99).abs() < 1e-9);
}

#[tokio::test]
async fn test_unknown_endpoint_rejected_by_backend_baseline() {
    let (graph, backend, _clock) = create_test_graph();
    backend.add_item(item("a", None, SensitivityLevel::Public));

    let err = graph
        .create_relationship(&id("a"), &id("ghost"), RelationshipType::Child, None)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid relationship: Unknown item: ghost");
}

#[tokio::test]
async fn test_network_reports_each_edge_once() {
    let (graph, backend, _clock) = create_test_graph();
    for (name, origin) in [("a", "Maori"), ("b", "Hawaiian"), ("c", "Samoan"), ("d", "Maori")] {
        backend.add_item(item(name, Some(origin), SensitivityLevel::Public));
    }
    link(&backend, "a", "b", RelationshipType::Sibling);
    link(&backend, "b", "c", RelationshipType::Translation);
    link(&backend, "c", "a", RelationshipType::CommunityResponse);
    link(&backend, "c", "d", RelationshipType::Child);

    let network = graph.analyze_relationship_network(&id("a"), Some(2)).await.unwrap();

    assert_eq!(network.direct.len(), 2);
    assert_eq!(network.indirect.len(), 2);
    assert!(network.indirect.iter().all(|i| i.depth == 2));
    assert_eq!(network.statistics.total_nodes, 4);
    assert!((network.statistics.cultural_diversity - 0.3).abs() < 1e-9);
    assert!((network.statistics.community_participation - 0.5).abs() < 1e-9);

    let maori = network
        .cultural_clusters
        .iter()
        .find(|c| c.cultural_origin == "Maori")
        .unwrap();
    assert_eq!(maori.items, vec![id("a"), id("d")]);
}

#[tokio::test]
async fn test_depth_bounds() {
    let (graph, backend, _clock) = create_test_graph();
    link(&backend, "a", "b", RelationshipType::Sibling);

    let empty = graph.analyze_relationship_network(&id("a"), Some(0)).await.unwrap();
    assert!(empty.direct.is_empty());
    assert_eq!(empty.statistics.total_nodes, 1);
    assert_eq!(backend.total_calls(), 0);

    let clamped = graph.analyze_relationship_network(&id("a"), Some(50)).await.unwrap();
    assert_eq!(clamped.depth, 6);
}

#[tokio::test]
async fn test_network_cache_and_expiry() {
    let (graph, backend, clock) = create_test_graph();
    link(&backend, "a", "b", RelationshipType::Sibling);

    graph.analyze_relationship_network(&id("a"), None).await.unwrap();
    let first = backend.call_count("get_collection_relationships");

    graph.analyze_relationship_network(&id("a"), None).await.unwrap();
    assert_eq!(backend.call_count("get_collection_relationships"), first);

    clock.advance(Duration::from_secs(601));
    graph.analyze_relationship_network(&id("a"), None).await.unwrap();
    assert!(backend.call_count("get_collection_relationships") > first);
}

#[tokio::test]
async fn test_create_invalidates_endpoint_caches() {
    let (graph, backend, _clock) = create_test_graph();
    backend.add_item(item("a", None, SensitivityLevel::Public));
    backend.add_item(item("b", None, SensitivityLevel::Public));

    assert!(graph.get_relationships(&id("b")).await.unwrap().is_empty());
    let before = graph.analyze_relationship_network(&id("a"), None).await.unwrap();
    assert!(before.direct.is_empty());

    graph
        .create_relationship(&id("a"), &id("b"), RelationshipType::Parent, None)
        .await
        .unwrap();

    assert_eq!(graph.get_relationships(&id("b")).await.unwrap().len(), 1);
    let after = graph.analyze_relationship_network(&id("a"), None).await.unwrap();
    assert_eq!(after.direct.len(), 1);
}

#[tokio::test]
async fn test_create_invalidates_networks_that_reach_an_endpoint() {
    let (graph, backend, _clock) = create_test_graph();
    for name in ["x", "a", "c"] {
        backend.add_item(item(name, None, SensitivityLevel::Public));
    }
    link(&backend, "x", "a", RelationshipType::Sibling);

    let before = graph.analyze_relationship_network(&id("x"), None).await.unwrap();
    assert_eq!(before.direct.len(), 1);
    assert!(before.indirect.is_empty());
    let pathways = graph.generate_educational_pathways(&id("x")).await.unwrap();
    assert!(!pathways[0].items.contains(&id("c")));

    graph
        .create_relationship(&id("a"), &id("c"), RelationshipType::Sibling, None)
        .await
        .unwrap();

    let after = graph.analyze_relationship_network(&id("x"), None).await.unwrap();
    assert_eq!(after.direct.len(), 1);
    assert_eq!(after.indirect.len(), 1);
    assert_eq!(after.indirect[0].relationship.target_id, id("c"));

    let pathways = graph.generate_educational_pathways(&id("x")).await.unwrap();
    assert!(pathways[0].items.contains(&id("c")));
}

#[tokio::test]
async fn test_update_and_delete() {
    let (graph, backend, _clock) = create_test_graph();
    backend.add_item(item("a", None, SensitivityLevel::Public));
    backend.add_item(item("b", None, SensitivityLevel::Public));

    let mut created = graph
        .create_relationship(&id("a"), &id("b"), RelationshipType::Child, None)
        .await
        .unwrap();
    created.relationship_type = RelationshipType::Translation;

    let updated = graph.update_relationship(created).await.unwrap();
    assert!(updated.bidirectional);
    assert!((updated.strength - 0.9).abs() < 1e-9);
    assert_eq!(
        backend.relationships()[0].relationship_type,
        RelationshipType::Translation
    );

    graph.delete_relationship(&updated.id).await.unwrap();
    assert!(graph.get_relationships(&id("a")).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_candidate_queries_are_filtered() {
    let (graph, backend, _clock) = create_test_graph();
    backend.script_relationship_suggestions(
        SuggestionKind::CulturalVariant,
        "a",
        vec![
            RelationshipSuggestion::new("b", RelationshipType::CulturalVariant, 0.6, 0.6),
            RelationshipSuggestion::new("c", RelationshipType::CulturalVariant, 0.4, 0.9),
            RelationshipSuggestion::new("d", RelationshipType::CulturalVariant, 0.9, 0.95),
        ],
    );
    backend.script_relationship_suggestions(
        SuggestionKind::Similar,
        "a",
        (0..8)
            .map(|i| RelationshipSuggestion::new(format!("s{}", i), RelationshipType::Sibling, 0.9, 0.9))
            .collect(),
    );

    let variants = graph.discover_cultural_variants(&id("a")).await.unwrap();
    let targets: Vec<&str> = variants.iter().map(|v| v.target_id.as_str()).collect();
    assert_eq!(targets, vec!["d", "b"]);
    assert!(variants[1].requires_community_validation);

    let similar = graph.find_similar_collections(&id("a"), Some(3)).await.unwrap();
    assert_eq!(similar.len(), 3);
}

#[tokio::test]
async fn test_pathways_follow_learning_stages() {
    let (graph, backend, _clock) = create_test_graph();
    backend.add_item(
        item("center", Some("Yolngu"), SensitivityLevel::Community)
            .with_title("Songlines")
            .with_cultural(
                CulturalMetadata::new(SensitivityLevel::Community)
                    .with_origin("Yolngu")
                    .with_protocols(["Seek permission from custodians"]),
            ),
    );
    backend.add_item(item("elder", Some("Yolngu"), SensitivityLevel::Community));
    backend.add_item(item("variant", Some("Arrernte"), SensitivityLevel::Public));
    backend.add_item(item("reply", None, SensitivityLevel::Public));
    link(&backend, "elder", "center", RelationshipType::TraditionalContinuation);
    link(&backend, "center", "variant", RelationshipType::CulturalVariant);
    link(&backend, "reply", "center", RelationshipType::CommunityResponse);

    let pathways = graph.generate_educational_pathways(&id("center")).await.unwrap();

    assert_eq!(pathways.len(), 2);
    let comprehensive = &pathways[0];
    assert_eq!(comprehensive.title, "Exploring Songlines");
    assert_eq!(
        comprehensive.items,
        vec![id("elder"), id("center"), id("variant"), id("reply")]
    );
    assert_eq!(
        comprehensive.cultural_learning_goals,
        vec!["Learn about Yolngu", "Learn about Arrernte"]
    );
    assert_eq!(
        comprehensive.cultural_requirements,
        vec!["Seek permission from custodians"]
    );
    assert_eq!(pathways[1].title, "Yolngu perspectives");
}

#[tokio::test]
async fn test_custom_pathway_is_persisted() {
    let (graph, backend, _clock) = create_test_graph();
    backend.add_item(item("a", Some("Sami"), SensitivityLevel::Public));
    backend.add_item(item("b", Some("Inuit"), SensitivityLevel::Public));

    let pathway = graph
        .create_custom_pathway("Arctic music", &[id("b"), id("a")])
        .await
        .unwrap();
    assert_eq!(pathway.items, vec![id("b"), id("a")]);
    assert_eq!(
        pathway.cultural_learning_goals,
        vec!["Learn about Inuit", "Learn about Sami"]
    );

    let recommended = graph.get_recommended_pathways(&id("a")).await.unwrap();
    assert_eq!(recommended, vec![pathway]);

    assert!(matches!(
        graph.create_custom_pathway("Empty", &[]).await,
        Err(GraphError::InvalidPathway(_))
    ));
}

#[tokio::test]
async fn test_backend_failure_has_stable_message() {
    let (graph, backend, _clock) = create_test_graph();
    backend.fail_operation("get_collection_relationships");

    let err = graph.get_relationships(&id("a")).await.unwrap_err();
    assert_eq!(err.to_string(), "Unable to load relationships");

    let err = graph.analyze_relationship_network(&id("a"), None).await.unwrap_err();
    assert_eq!(err.to_string(), "Unable to analyze relationship network");
}

#[tokio::test]
async fn test_hierarchy_and_community_views() {
    let (graph, backend, _clock) = create_test_graph();
    link(&backend, "root", "a", RelationshipType::Parent);
    link(&backend, "a", "leaf", RelationshipType::Child);
    link(&backend, "reply", "a", RelationshipType::CommunityResponse);
    link(&backend, "a", "twin", RelationshipType::Sibling);

    let hierarchy = graph.get_traditional_hierarchy(&id("a"), Some(1)).await.unwrap();
    assert_eq!(hierarchy.len(), 2);

    let community = graph.get_community_network(&id("a"), Some(1)).await.unwrap();
    assert_eq!(community.len(), 1);
    assert_eq!(community[0].source_id, id("reply"));
}
