//! Integration tests for the orchestrator against the in-memory backend.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tapestry_backend::{InMemoryBackend, Mutation};
use tapestry_cache::ManualClock;
use tapestry_domain::{
    ConditionOperator, ContentItem, CulturalMetadata, ItemId, ItemType, OrganizationConfigUpdate,
    OrganizationFeedback, OrganizationRule, RawCategorySuggestion, RelationshipType, RuleAction,
    RuleCondition, RuleValue, SensitivityLevel, SmartOrganizationConfig, TagSource, TagSuggestion,
};
use tapestry_orchestrator::{ItemState, Orchestrator, OrchestratorConfig, OrchestratorError};

fn create_test_orchestrator() -> (Orchestrator<InMemoryBackend>, Arc<InMemoryBackend>, Arc<ManualClock>) {
    let backend = Arc::new(InMemoryBackend::new());
    let clock = Arc::new(ManualClock::new());
    let orchestrator =
        Orchestrator::with_clock(backend.clone(), OrchestratorConfig::default(), clock.clone());
    (orchestrator, backend, clock)
}

/// A Maori weaving document with scripted tags and categories
fn seed_weaving_item(backend: &InMemoryBackend, id: &str) {
    backend.add_item(
        ContentItem::new(id, ItemType::Document)
            .with_title("Ancestral weaving techniques")
            .with_cultural(CulturalMetadata::new(SensitivityLevel::Community).with_origin("Maori")),
    );
    backend.script_tag_suggestions(
        id,
        vec![
            TagSuggestion::new("weaving", 0.9, "Central topic", TagSource::ContentAnalysis),
            TagSuggestion::new("ancestral patterns", 0.85, "Named practice", TagSource::CulturalAnalysis),
            TagSuggestion::new("craft", 0.6, "Loosely related", TagSource::AiInference),
        ],
    );
    let mut textiles = RawCategorySuggestion::new("Textiles", 0.85);
    textiles.cultural_appropriateness = Some(0.9);
    backend.script_category_suggestions(
        id,
        vec![textiles, RawCategorySuggestion::new("Ceremonial Dress", 0.8)],
    );
}

fn text(value: &str) -> RuleValue {
    RuleValue::Text(value.to_string())
}

fn create_test_rule(id: &str, field: &str, operator: ConditionOperator, value: RuleValue, action: RuleAction) -> OrganizationRule {
    OrganizationRule::new(
        id,
        RuleCondition {
            field: field.to_string(),
            operator,
            value,
        },
        action,
    )
}

fn id(s: &str) -> ItemId {
    ItemId::new(s)
}

fn ids(count: usize) -> Vec<ItemId> {
    (0..count).map(|i| id(&format!("item-{:02}", i))).collect()
}

// --- Analysis ---

#[tokio::test]
async fn test_analysis_cached_within_ttl() {
    let (orchestrator, backend, clock) = create_test_orchestrator();
    seed_weaving_item(&backend, "doc-1");

    let first = orchestrator.analyze_item(&id("doc-1"), ItemType::Document).await.unwrap();
    let second = orchestrator.analyze_item(&id("doc-1"), ItemType::Document).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(backend.call_count("analyze_item_organization"), 1);

    clock.advance(Duration::from_secs(601));
    orchestrator.analyze_item(&id("doc-1"), ItemType::Document).await.unwrap();
    assert_eq!(backend.call_count("analyze_item_organization"), 2);

    let metrics = orchestrator.metrics();
    assert_eq!(metrics.cache_hits, 1);
    assert_eq!(metrics.cache_misses, 2);
    assert_eq!(metrics.total_analyses(), 2);
}

#[tokio::test]
async fn test_cache_key_includes_item_type() {
    let (orchestrator, backend, _clock) = create_test_orchestrator();
    seed_weaving_item(&backend, "doc-1");

    orchestrator.analyze_item(&id("doc-1"), ItemType::Document).await.unwrap();
    orchestrator.analyze_item(&id("doc-1"), ItemType::Collection).await.unwrap();
    assert_eq!(backend.call_count("analyze_item_organization"), 2);
}

#[tokio::test]
async fn test_reanalyze_bypasses_cache() {
    let (orchestrator, backend, _clock) = create_test_orchestrator();
    seed_weaving_item(&backend, "doc-1");

    orchestrator.analyze_item(&id("doc-1"), ItemType::Document).await.unwrap();
    orchestrator.reanalyze_item(&id("doc-1"), ItemType::Document).await.unwrap();
    orchestrator.analyze_item(&id("doc-1"), ItemType::Document).await.unwrap();

    assert_eq!(backend.call_count("analyze_item_organization"), 2);
}

#[tokio::test]
async fn test_analysis_enhancement() {
    let (orchestrator, backend, _clock) = create_test_orchestrator();
    seed_weaving_item(&backend, "doc-1");

    let analysis = orchestrator.analyze_item(&id("doc-1"), ItemType::Document).await.unwrap();

    let flagged: Vec<&str> = analysis
        .suggested_tags
        .iter()
        .filter(|t| t.traditional_knowledge)
        .map(|t| t.tag.as_str())
        .collect();
    assert_eq!(flagged, vec!["ancestral patterns"]);

    let textiles = &analysis.suggested_categories[0];
    assert_eq!(textiles.cultural_appropriateness, 0.9);
    assert!(textiles.requires_community_validation, "Community material is flagged for review");
    let dress = &analysis.suggested_categories[1];
    assert_eq!(dress.cultural_appropriateness, 0.6);

    // Tags average 0.7833, categories 0.825
    assert!((analysis.overall_confidence - (2.35 / 3.0 + 0.825) / 2.0).abs() < 1e-9);
    assert!(analysis.analyzed_at > 0);
}

#[tokio::test]
async fn test_backend_appropriateness_survives_enhancement() {
    let (orchestrator, backend, _clock) = create_test_orchestrator();
    let item = ContentItem::new("loom", ItemType::Document)
        .with_title("Loom maintenance")
        .with_cultural(CulturalMetadata::new(SensitivityLevel::Guardian));
    backend.add_item(item.clone());
    let mut textiles = RawCategorySuggestion::new("Textiles", 0.9);
    textiles.cultural_appropriateness = Some(0.95);
    backend.script_category_suggestions("loom", vec![textiles]);

    let suggested = orchestrator.generate_category_suggestions(&item, None).await.unwrap();
    let analysis = orchestrator.analyze_item(&id("loom"), ItemType::Document).await.unwrap();

    assert_eq!(suggested[0].cultural_appropriateness, 0.95);
    assert_eq!(analysis.suggested_categories[0].cultural_appropriateness, 0.95);
    assert!(analysis.suggested_categories[0].requires_community_validation);

    let outcome = orchestrator
        .apply_auto_organization(&id("loom"), ItemType::Document, Some(analysis))
        .await
        .unwrap();
    assert_eq!(outcome.applied_categories, vec!["Textiles"]);
}

#[tokio::test]
async fn test_sacred_material_keeps_every_suggestion() {
    let (orchestrator, backend, _clock) = create_test_orchestrator();
    backend.add_item(
        ContentItem::new("song", ItemType::Document)
            .with_cultural(CulturalMetadata::new(SensitivityLevel::Sacred)),
    );
    backend.script_tag_suggestions(
        "song",
        vec![
            TagSuggestion::new("ceremonial song", 0.4, "", TagSource::CulturalAnalysis),
            TagSuggestion::new("music", 0.9, "", TagSource::ContentAnalysis),
        ],
    );
    backend.script_category_suggestions("song", vec![RawCategorySuggestion::new("Sacred Music", 0.9)]);

    let analysis = orchestrator.analyze_item(&id("song"), ItemType::Document).await.unwrap();
    assert_eq!(analysis.suggested_tags.len(), 2);
    assert_eq!(analysis.suggested_categories.len(), 1);
    assert!(analysis.suggested_categories[0].requires_community_validation);
}

#[tokio::test]
async fn test_analysis_failure_records_state() {
    let (orchestrator, backend, _clock) = create_test_orchestrator();
    seed_weaving_item(&backend, "doc-1");
    backend.fail_item("doc-1");

    let err = orchestrator
        .analyze_item(&id("doc-1"), ItemType::Document)
        .await
        .unwrap_err();
    assert_eq!(err, OrchestratorError::Backend("analyze item for organization"));
    assert_eq!(err.to_string(), "Unable to analyze item for organization");

    let status = orchestrator.item_status(&id("doc-1"), ItemType::Document);
    assert_eq!(status.state, ItemState::Unanalyzed);
    assert_eq!(status.last_error.as_deref(), Some("Unable to analyze item for organization"));
    assert_eq!(orchestrator.metrics().analysis_failures, 1);
}

#[tokio::test]
async fn test_rule_matches_attached() {
    let (orchestrator, backend, _clock) = create_test_orchestrator();
    seed_weaving_item(&backend, "doc-1");
    backend.add_rule(create_test_rule(
        "weave",
        "title",
        ConditionOperator::Contains,
        text("WEAVING"),
        RuleAction::AddTag("fibre-arts".into()),
    ));

    let analysis = orchestrator.analyze_item(&id("doc-1"), ItemType::Document).await.unwrap();
    assert_eq!(analysis.rule_matches.len(), 1);
    assert_eq!(analysis.rule_matches[0].rule_id, "weave");
    assert_eq!(analysis.rule_matches[0].actions[0].confidence, 0.8);
}

#[tokio::test]
async fn test_rule_fetch_failure_degrades() {
    let (orchestrator, backend, _clock) = create_test_orchestrator();
    seed_weaving_item(&backend, "doc-1");
    backend.add_rule(create_test_rule(
        "weave",
        "title",
        ConditionOperator::Contains,
        text("weaving"),
        RuleAction::AddTag("fibre-arts".into()),
    ));
    backend.fail_operation("get_organization_rules");

    let analysis = orchestrator.analyze_item(&id("doc-1"), ItemType::Document).await.unwrap();
    assert!(analysis.rule_matches.is_empty());
    assert_eq!(analysis.suggested_tags.len(), 3);
}

// --- Organization ---

#[tokio::test]
async fn test_apply_auto_organization() {
    let (orchestrator, backend, _clock) = create_test_orchestrator();
    seed_weaving_item(&backend, "doc-1");
    backend.add_rule(create_test_rule(
        "weave",
        "title",
        ConditionOperator::Contains,
        text("weaving"),
        RuleAction::AddTag("fibre-arts".into()),
    ));
    backend.add_rule(create_test_rule(
        "archive",
        "type",
        ConditionOperator::Equals,
        text("document"),
        RuleAction::MoveToCollection("crafts-archive".into()),
    ));

    let outcome = orchestrator
        .apply_auto_organization(&id("doc-1"), ItemType::Document, None)
        .await
        .unwrap();

    assert_eq!(outcome.applied_tags, vec!["weaving", "ancestral patterns"]);
    assert_eq!(outcome.applied_categories, vec!["Textiles"]);
    assert!(outcome.cultural_metadata_applied);
    assert_eq!(outcome.executed_actions.len(), 2);
    assert!(outcome.skipped_actions.is_empty());
    assert!(!outcome.validation_requested);

    let mutations = backend.mutations();
    assert_eq!(mutations.len(), 5);
    assert!(matches!(&mutations[0], Mutation::TagsApplied { tags, .. } if tags.len() == 2));
    assert!(matches!(&mutations[1], Mutation::CategoriesApplied { categories, .. } if categories == &vec!["Textiles".to_string()]));
    assert!(matches!(&mutations[2], Mutation::CulturalMetadataApplied { metadata, .. } if metadata.cultural_origin.as_deref() == Some("Maori")));
    assert!(matches!(&mutations[3], Mutation::TagsApplied { tags, .. } if tags == &vec!["fibre-arts".to_string()]));
    assert_eq!(
        mutations[4],
        Mutation::MovedToCollection {
            item_id: id("doc-1"),
            collection_id: id("crafts-archive"),
        }
    );

    let item = backend.item(&id("doc-1")).unwrap();
    assert_eq!(item.tags, vec!["weaving", "ancestral patterns", "fibre-arts"]);
    assert_eq!(item.collection_id, Some(id("crafts-archive")));

    let status = orchestrator.item_status(&id("doc-1"), ItemType::Document);
    assert_eq!(status.state, ItemState::Organized);
    assert_eq!(orchestrator.metrics().total_organizations(), 1);
}

#[tokio::test]
async fn test_apply_failure_returns_to_analyzed() {
    let (orchestrator, backend, _clock) = create_test_orchestrator();
    seed_weaving_item(&backend, "doc-1");
    backend.fail_operation("apply_tags_to_item");

    let err = orchestrator
        .apply_auto_organization(&id("doc-1"), ItemType::Document, None)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Unable to apply tags");
    assert!(backend.mutations().is_empty());

    let status = orchestrator.item_status(&id("doc-1"), ItemType::Document);
    assert_eq!(status.state, ItemState::Analyzed);
    assert_eq!(status.last_error.as_deref(), Some("Unable to apply tags"));
    assert_eq!(orchestrator.metrics().organization_failures, 1);
}

#[tokio::test]
async fn test_validation_request_is_advisory() {
    let (orchestrator, backend, _clock) = create_test_orchestrator();
    seed_weaving_item(&backend, "doc-1");
    backend.set_config(SmartOrganizationConfig {
        require_cultural_validation: true,
        ..Default::default()
    });

    let outcome = orchestrator
        .apply_auto_organization(&id("doc-1"), ItemType::Document, None)
        .await
        .unwrap();
    assert!(outcome.validation_requested);
    assert!(backend.mutations().contains(&Mutation::ValidationRequested {
        item_id: id("doc-1"),
        reason: "Community review suggested for categories: Textiles, Ceremonial Dress".to_string(),
    }));

    backend.fail_operation("request_cultural_validation");
    let outcome = orchestrator
        .apply_auto_organization(&id("doc-1"), ItemType::Document, None)
        .await
        .unwrap();
    assert!(!outcome.validation_requested);
    assert_eq!(outcome.applied_categories, vec!["Textiles"]);
    assert_eq!(
        orchestrator.item_status(&id("doc-1"), ItemType::Document).state,
        ItemState::Organized
    );
}

#[tokio::test]
async fn test_apply_uses_supplied_analysis() {
    let (orchestrator, backend, _clock) = create_test_orchestrator();
    seed_weaving_item(&backend, "doc-1");
    let analysis = orchestrator.analyze_item(&id("doc-1"), ItemType::Document).await.unwrap();
    backend.reset_call_counts();

    orchestrator
        .apply_auto_organization(&id("doc-1"), ItemType::Document, Some(analysis))
        .await
        .unwrap();
    assert_eq!(backend.call_count("analyze_item_organization"), 0);
}

#[tokio::test]
async fn test_supplied_analysis_failure_returns_to_analyzed() {
    let (producer, backend, _clock) = create_test_orchestrator();
    seed_weaving_item(&backend, "doc-1");
    let analysis = producer.analyze_item(&id("doc-1"), ItemType::Document).await.unwrap();

    let orchestrator = Orchestrator::new(backend.clone(), OrchestratorConfig::default());
    assert_eq!(
        orchestrator.item_status(&id("doc-1"), ItemType::Document).state,
        ItemState::Unanalyzed
    );
    backend.fail_operation("apply_tags_to_item");

    orchestrator
        .apply_auto_organization(&id("doc-1"), ItemType::Document, Some(analysis))
        .await
        .unwrap_err();
    let status = orchestrator.item_status(&id("doc-1"), ItemType::Document);
    assert_eq!(status.state, ItemState::Analyzed);
    assert_eq!(status.last_error.as_deref(), Some("Unable to apply tags"));
}

// --- Settings ---

#[tokio::test]
async fn test_config_cached_and_invalidated() {
    let (orchestrator, backend, clock) = create_test_orchestrator();

    orchestrator.get_organization_config().await.unwrap();
    orchestrator.get_organization_config().await.unwrap();
    assert_eq!(backend.call_count("get_organization_config"), 1);

    clock.advance(Duration::from_secs(301));
    orchestrator.get_organization_config().await.unwrap();
    assert_eq!(backend.call_count("get_organization_config"), 2);

    let updated = orchestrator
        .update_organization_config(&OrganizationConfigUpdate {
            auto_tagging_threshold: Some(0.95),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(updated.auto_tagging_threshold, 0.95);

    let settings = orchestrator.get_organization_config().await.unwrap();
    assert_eq!(settings.auto_tagging_threshold, 0.95);
    assert_eq!(backend.call_count("get_organization_config"), 3);
}

#[tokio::test]
async fn test_invalid_config_rejected_locally() {
    let (orchestrator, backend, _clock) = create_test_orchestrator();

    let err = orchestrator
        .update_organization_config(&OrganizationConfigUpdate {
            auto_tagging_threshold: Some(-0.1),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, OrchestratorError::InvalidConfig(_)));
    assert_eq!(backend.total_calls(), 0);
}

// --- Rules ---

#[tokio::test]
async fn test_rule_validated_before_backend() {
    let (orchestrator, backend, _clock) = create_test_orchestrator();
    let condition_rule = |action| {
        create_test_rule("ctx", "title", ConditionOperator::Contains, text("chant"), action)
    };

    let err = orchestrator
        .create_organization_rule(&condition_rule(RuleAction::SetCulturalContext(
            "Restricted ceremony".into(),
        )))
        .await
        .unwrap_err();
    assert!(matches!(err, OrchestratorError::InvalidRule(_)));
    assert_eq!(backend.call_count("create_organization_rule"), 0);

    orchestrator
        .create_organization_rule(&condition_rule(RuleAction::SetCulturalContext(
            "Shared for Learning purposes".into(),
        )))
        .await
        .unwrap();
    assert_eq!(backend.rules().len(), 1);
}

#[tokio::test]
async fn test_rule_changes_drop_cached_analyses() {
    let (orchestrator, backend, _clock) = create_test_orchestrator();
    seed_weaving_item(&backend, "doc-1");

    let before = orchestrator.analyze_item(&id("doc-1"), ItemType::Document).await.unwrap();
    assert!(before.rule_matches.is_empty());

    orchestrator
        .create_organization_rule(&create_test_rule(
            "weave",
            "title",
            ConditionOperator::StartsWith,
            text("ancestral"),
            RuleAction::SetCategory("Heritage Crafts".into()),
        ))
        .await
        .unwrap();

    let after = orchestrator.analyze_item(&id("doc-1"), ItemType::Document).await.unwrap();
    assert_eq!(after.rule_matches.len(), 1);
    assert_eq!(backend.call_count("analyze_item_organization"), 2);

    orchestrator.delete_organization_rule("weave").await.unwrap();
    assert!(orchestrator.get_organization_rules(None).await.unwrap().is_empty());
}

// --- Batches ---

#[tokio::test]
async fn test_batch_analyze_chunks() {
    let backend = Arc::new(InMemoryBackend::new().with_latency(Duration::from_millis(5)));
    let orchestrator = Orchestrator::new(backend.clone(), OrchestratorConfig::default());
    let item_ids = ids(23);
    for item_id in &item_ids {
        backend.add_item(ContentItem::new(item_id.clone(), ItemType::Document));
    }

    let report = orchestrator.batch_analyze(&item_ids, ItemType::Document).await;

    assert_eq!(report.chunk_sizes, vec![10, 10, 3]);
    assert_eq!(report.items.len(), 23);
    assert_eq!(report.failure_count(), 0);
    assert_eq!(backend.peak_in_flight(), 10);
    assert_eq!(
        report.items.iter().map(|i| i.item_id.clone()).collect::<Vec<_>>(),
        item_ids
    );
}

#[tokio::test]
async fn test_batch_isolates_failures() {
    let (orchestrator, backend, _clock) = create_test_orchestrator();
    let item_ids = ids(4);
    for item_id in &item_ids {
        backend.add_item(ContentItem::new(item_id.clone(), ItemType::Document));
    }
    backend.fail_item("item-02");

    let report = orchestrator.batch_analyze(&item_ids, ItemType::Document).await;

    assert_eq!(report.succeeded().count(), 3);
    let failed: Vec<_> = report.failed().collect();
    assert_eq!(failed, vec![(&id("item-02"), "Unable to analyze item for organization")]);

    let metrics = orchestrator.metrics();
    assert_eq!(metrics.batch_count, 1);
    assert_eq!(metrics.batch_items, 4);
}

#[tokio::test]
async fn test_batch_apply_pauses_between_chunks() {
    let (orchestrator, backend, _clock) = create_test_orchestrator();
    let item_ids = ids(7);
    for item_id in &item_ids {
        backend.add_item(ContentItem::new(item_id.clone(), ItemType::Document));
        backend.script_tag_suggestions(
            item_id.clone(),
            vec![TagSuggestion::new("archive", 0.9, "", TagSource::ContentAnalysis)],
        );
    }
    let analyses = orchestrator.batch_analyze(&item_ids, ItemType::Document).await;

    let started = Instant::now();
    let report = orchestrator
        .batch_apply_organization(analyses.succeeded().cloned().collect())
        .await;

    assert!(started.elapsed() >= Duration::from_millis(100));
    assert_eq!(report.chunk_sizes, vec![5, 2]);
    assert_eq!(report.succeeded().filter(|o| o.applied_tags == vec!["archive"]).count(), 7);
    assert!(item_ids.iter().all(|item_id| {
        orchestrator.item_status(item_id, ItemType::Document).state == ItemState::Organized
    }));
}

#[tokio::test]
async fn test_empty_batch() {
    let (orchestrator, backend, _clock) = create_test_orchestrator();

    let report = orchestrator.batch_apply_organization(Vec::new()).await;
    assert!(report.chunk_sizes.is_empty());
    assert!(report.items.is_empty());
    assert_eq!(backend.total_calls(), 0);
}

// --- Pass-through ---

#[tokio::test]
async fn test_feedback_respects_learning_switch() {
    let (orchestrator, backend, _clock) = create_test_orchestrator();
    let feedback = OrganizationFeedback {
        item_id: id("doc-1"),
        item_type: ItemType::Document,
        accepted: vec!["weaving".into()],
        rejected: vec!["craft".into()],
        note: None,
    };

    orchestrator.record_feedback(&feedback).await;
    assert_eq!(backend.feedback().len(), 1);

    orchestrator
        .update_organization_config(&OrganizationConfigUpdate {
            learning_enabled: Some(false),
            ..Default::default()
        })
        .await
        .unwrap();
    orchestrator.record_feedback(&feedback).await;
    assert_eq!(backend.feedback().len(), 1);
}

#[tokio::test]
async fn test_cultural_context_never_fails() {
    let (orchestrator, backend, _clock) = create_test_orchestrator();
    backend.fail_operation("analyze_cultural_context");

    let context = orchestrator
        .analyze_cultural_context(&ContentItem::new("doc-1", ItemType::Document))
        .await;
    assert_eq!(context.sensitivity_level, SensitivityLevel::Public);
    assert_eq!(
        context.educational_context.as_deref(),
        Some("Cultural context analysis unavailable")
    );
}

#[tokio::test]
async fn test_graph_operations_pass_through() {
    let (orchestrator, backend, _clock) = create_test_orchestrator();
    backend.add_item(ContentItem::new("a", ItemType::Collection));
    backend.add_item(ContentItem::new("b", ItemType::Collection));

    let relationship = orchestrator
        .create_relationship(&id("a"), &id("b"), RelationshipType::Sibling, None)
        .await
        .unwrap();
    assert!(relationship.bidirectional);

    let network = orchestrator.analyze_relationship_network(&id("a"), None).await.unwrap();
    assert_eq!(network.direct.len(), 1);
    assert_eq!(network.statistics.total_nodes, 2);

    let err = orchestrator
        .create_relationship(&id("a"), &id("a"), RelationshipType::Sibling, None)
        .await
        .unwrap_err();
    assert!(matches!(err, OrchestratorError::Graph(_)));
}
