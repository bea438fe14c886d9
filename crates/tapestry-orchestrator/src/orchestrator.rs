//! The orchestrator facade

use crate::organize::{plan, OrganizationOutcome, OrganizationPlan};
use crate::state::{ItemStatus, StateTracker};
use crate::{OrchestratorConfig, OrchestratorError, OrchestratorMetrics};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};
use tapestry_cache::{Clock, SystemClock, TtlCache};
use tapestry_domain::scoring::overall_confidence;
use tapestry_domain::traits::OrganizationBackend;
use tapestry_domain::{
    ContentItem, CulturalMetadata, ItemId, ItemType, OrganizationAnalysis, OrganizationConfigUpdate,
    OrganizationRule, RuleAction, RuleMatch, SensitivityLevel, SmartOrganizationConfig,
};
use tapestry_graph::RelationshipGraph;
use tapestry_rules::RuleEngine;
use tapestry_suggest::{annotate_category, mark_traditional_knowledge, SuggestionEngine};
use tracing::{debug, error, info, warn};

type AnalysisKey = (ItemType, ItemId);

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Entry point for content organization
///
/// Owns the suggestion, rule and graph engines, the analysis and settings
/// caches, per-item lifecycle state and metrics. Share it by reference or
/// behind an `Arc`; every method takes `&self`.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use tapestry_backend::InMemoryBackend;
/// use tapestry_domain::{ContentItem, ItemType};
/// use tapestry_orchestrator::{ItemState, Orchestrator, OrchestratorConfig};
///
/// # #[tokio::main]
/// # async fn main() {
/// let backend = Arc::new(InMemoryBackend::new());
/// backend.add_item(ContentItem::new("doc-1", ItemType::Document).with_title("Harvest songs"));
///
/// let orchestrator = Orchestrator::new(backend, OrchestratorConfig::default());
/// let analysis = orchestrator.analyze_item(&"doc-1".into(), ItemType::Document).await.unwrap();
/// assert_eq!(analysis.item_id.as_str(), "doc-1");
///
/// let status = orchestrator.item_status(&"doc-1".into(), ItemType::Document);
/// assert_eq!(status.state, ItemState::Analyzed);
/// # }
/// ```
pub struct Orchestrator<B>
where
    B: OrganizationBackend,
{
    pub(crate) backend: Arc<B>,
    pub(crate) config: OrchestratorConfig,
    pub(crate) suggestions: SuggestionEngine<B>,
    pub(crate) rules: RuleEngine,
    pub(crate) graph: RelationshipGraph<B>,
    analyses: TtlCache<AnalysisKey, OrganizationAnalysis>,
    settings: TtlCache<(), SmartOrganizationConfig>,
    states: StateTracker,
    metrics: Mutex<OrchestratorMetrics>,
}

impl<B> Orchestrator<B>
where
    B: OrganizationBackend,
{
    /// Create a new orchestrator using wall-clock time for cache expiry
    pub fn new(backend: Arc<B>, config: OrchestratorConfig) -> Self {
        Self::with_clock(backend, config, Arc::new(SystemClock))
    }

    /// Create a new orchestrator with an explicit cache clock
    pub fn with_clock(backend: Arc<B>, config: OrchestratorConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            suggestions: SuggestionEngine::new(Arc::clone(&backend)),
            rules: RuleEngine::new(config.rules.clone()),
            graph: RelationshipGraph::with_clock(
                Arc::clone(&backend),
                config.graph.clone(),
                Arc::clone(&clock),
            ),
            analyses: TtlCache::new(config.analysis_ttl(), config.cache_capacity, Arc::clone(&clock)),
            settings: TtlCache::new(config.config_ttl(), 1, clock),
            states: StateTracker::default(),
            metrics: Mutex::new(OrchestratorMetrics::new()),
            backend,
            config,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// The rule engine used for matching and validation
    pub fn rule_engine(&self) -> &RuleEngine {
        &self.rules
    }

    /// Snapshot of the collected metrics
    pub fn metrics(&self) -> OrchestratorMetrics {
        self.metrics_mut().clone()
    }

    pub(crate) fn metrics_mut(&self) -> MutexGuard<'_, OrchestratorMetrics> {
        self.metrics.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Lifecycle state of an item
    pub fn item_status(&self, item_id: &ItemId, item_type: ItemType) -> ItemStatus {
        self.states.status(&(item_type, item_id.clone()))
    }

    /// Drop every cached analysis, the cached settings and the graph caches
    pub fn clear_caches(&self) {
        self.analyses.clear();
        self.settings.clear();
        self.graph.clear_caches();
        debug!("Cleared orchestrator caches");
    }

    /// Fetch an item from the backend
    pub async fn get_content_item(&self, item_id: &ItemId) -> Result<ContentItem, OrchestratorError> {
        self.backend.get_content_item(item_id).await.map_err(|e| {
            error!("Failed to load item {}: {}", item_id, e);
            OrchestratorError::Backend("load item")
        })
    }

    // --- Analysis ---

    /// Organization analysis for an item (cached)
    ///
    /// A cached analysis younger than the analysis TTL is returned without a
    /// backend call. Otherwise the backend analysis is enhanced with
    /// traditional-knowledge flags, category appropriateness, rule matches
    /// and an overall confidence, then cached.
    pub async fn analyze_item(
        &self,
        item_id: &ItemId,
        item_type: ItemType,
    ) -> Result<OrganizationAnalysis, OrchestratorError> {
        let key = (item_type, item_id.clone());
        if let Some(cached) = self.analyses.get(&key) {
            self.metrics_mut().record_cache_hit();
            debug!("Analysis cache hit for {} {}", item_type, item_id);
            return Ok(cached);
        }
        self.metrics_mut().record_cache_miss();
        self.run_analysis(key).await
    }

    /// Organization analysis for an item, ignoring any cached result
    pub async fn reanalyze_item(
        &self,
        item_id: &ItemId,
        item_type: ItemType,
    ) -> Result<OrganizationAnalysis, OrchestratorError> {
        let key = (item_type, item_id.clone());
        self.analyses.invalidate(&key);
        self.run_analysis(key).await
    }

    async fn run_analysis(&self, key: AnalysisKey) -> Result<OrganizationAnalysis, OrchestratorError> {
        let (item_type, item_id) = (key.0, &key.1);
        let previous = self.states.begin_analysis(&key);

        let analysis = match self.backend.analyze_item_organization(item_id, item_type).await {
            Ok(analysis) => analysis,
            Err(e) => {
                error!("Organization analysis failed for {} {}: {}", item_type, item_id, e);
                let err = OrchestratorError::Backend("analyze item for organization");
                self.states.analysis_failed(&key, previous, err.to_string());
                self.metrics_mut().record_analysis_failure();
                return Err(err);
            }
        };

        let item = match self.backend.get_content_item(item_id).await {
            Ok(item) => Some(item),
            Err(e) => {
                warn!("Could not load {} for rule matching: {}", item_id, e);
                None
            }
        };
        let rule_matches = match &item {
            Some(item) => self.match_rules(item).await,
            None => Vec::new(),
        };
        let sensitivity = analysis
            .cultural_context
            .as_ref()
            .or(item.as_ref().and_then(|i| i.cultural.as_ref()))
            .map(|c| c.sensitivity_level)
            .unwrap_or_default();

        let analysis = enhance(analysis, sensitivity, rule_matches, now_secs());

        self.analyses.insert(key.clone(), analysis.clone());
        self.states.analysis_succeeded(&key);
        self.metrics_mut().record_analysis(item_type);
        info!(
            "Analyzed {} {}: {} tags, {} categories, {} rule matches (confidence {:.2})",
            item_type,
            item_id,
            analysis.suggested_tags.len(),
            analysis.suggested_categories.len(),
            analysis.rule_matches.len(),
            analysis.overall_confidence
        );

        Ok(analysis)
    }

    /// Rule matches for an item; a failed rule fetch yields none
    async fn match_rules(&self, item: &ContentItem) -> Vec<RuleMatch> {
        match self
            .backend
            .get_organization_rules(item.collection_id.as_ref())
            .await
        {
            Ok(rules) => self.rules.apply_organization_rules(item, &rules),
            Err(e) => {
                warn!("Could not load organization rules for {}: {}", item.id, e);
                Vec::new()
            }
        }
    }

    // --- Organization ---

    /// Apply the organization an analysis warrants
    ///
    /// Uses `analysis` when given, otherwise the (possibly cached) analysis
    /// of the item. What is applied depends on the organization settings;
    /// rule actions run only above the rule engine's auto-execute threshold.
    /// A community review request is advisory: its failure is logged and
    /// never fails the call.
    pub async fn apply_auto_organization(
        &self,
        item_id: &ItemId,
        item_type: ItemType,
        analysis: Option<OrganizationAnalysis>,
    ) -> Result<OrganizationOutcome, OrchestratorError> {
        let key = (item_type, item_id.clone());
        let analysis = match analysis {
            Some(analysis) => {
                self.states.analysis_supplied(&key);
                analysis
            }
            None => self.analyze_item(item_id, item_type).await?,
        };
        let settings = self.get_organization_config().await?;
        let plan = plan(&analysis, &settings, &self.rules);

        self.states.begin_organizing(&key);

        match self.execute_plan(item_id, item_type, &analysis, plan).await {
            Ok(outcome) => {
                self.states.organizing_succeeded(&key);
                self.metrics_mut().record_organization(item_type);
                info!(
                    "Organized {} {}: {} tags, {} categories, {} rule actions",
                    item_type,
                    item_id,
                    outcome.applied_tags.len(),
                    outcome.applied_categories.len(),
                    outcome.executed_actions.len()
                );
                Ok(outcome)
            }
            Err(err) => {
                self.states.organizing_failed(&key, err.to_string());
                self.metrics_mut().record_organization_failure();
                Err(err)
            }
        }
    }

    async fn execute_plan(
        &self,
        item_id: &ItemId,
        item_type: ItemType,
        analysis: &OrganizationAnalysis,
        plan: OrganizationPlan,
    ) -> Result<OrganizationOutcome, OrchestratorError> {
        let mut outcome = OrganizationOutcome::new(item_id.clone(), item_type);

        if !plan.tags.is_empty() {
            self.backend
                .apply_tags_to_item(item_id, item_type, &plan.tags)
                .await
                .map_err(|e| {
                    error!("Failed to apply tags to {}: {}", item_id, e);
                    OrchestratorError::Backend("apply tags")
                })?;
            outcome.applied_tags = plan.tags;
        }

        if !plan.categories.is_empty() {
            self.backend
                .apply_categories_to_item(item_id, item_type, &plan.categories)
                .await
                .map_err(|e| {
                    error!("Failed to apply categories to {}: {}", item_id, e);
                    OrchestratorError::Backend("apply categories")
                })?;
            outcome.applied_categories = plan.categories;
        }

        if let Some(metadata) = &plan.cultural_metadata {
            self.backend
                .apply_cultural_metadata_to_item(item_id, item_type, metadata)
                .await
                .map_err(|e| {
                    error!("Failed to apply cultural metadata to {}: {}", item_id, e);
                    OrchestratorError::Backend("apply cultural metadata")
                })?;
            outcome.cultural_metadata_applied = true;
        }

        for action in plan.actions {
            self.execute_action(item_id, item_type, analysis, &action).await?;
            outcome.executed_actions.push(action);
        }
        outcome.skipped_actions = plan.skipped_actions;

        if let Some(reason) = plan.validation_reason {
            match self
                .backend
                .request_cultural_validation(item_id, item_type, &reason)
                .await
            {
                Ok(()) => outcome.validation_requested = true,
                Err(e) => warn!("Community review request for {} failed: {}", item_id, e),
            }
        }

        Ok(outcome)
    }

    async fn execute_action(
        &self,
        item_id: &ItemId,
        item_type: ItemType,
        analysis: &OrganizationAnalysis,
        action: &RuleAction,
    ) -> Result<(), OrchestratorError> {
        let result = match action {
            RuleAction::AddTag(tag) => {
                self.backend
                    .apply_tags_to_item(item_id, item_type, std::slice::from_ref(tag))
                    .await
            }
            RuleAction::SetCategory(category) => {
                self.backend
                    .apply_categories_to_item(item_id, item_type, std::slice::from_ref(category))
                    .await
            }
            RuleAction::MoveToCollection(collection) => {
                self.backend
                    .move_item_to_collection(item_id, &ItemId::new(collection.as_str()))
                    .await
            }
            RuleAction::SetCulturalContext(context) => {
                let metadata = analysis
                    .cultural_context
                    .clone()
                    .unwrap_or_else(|| CulturalMetadata::new(SensitivityLevel::Public))
                    .with_educational_context(context.as_str());
                self.backend
                    .apply_cultural_metadata_to_item(item_id, item_type, &metadata)
                    .await
            }
            RuleAction::RequestValidation(reason) => {
                self.backend
                    .request_cultural_validation(item_id, item_type, reason)
                    .await
            }
        };

        result.map_err(|e| {
            error!("Rule action {} failed for {}: {}", action.type_name(), item_id, e);
            OrchestratorError::Backend("execute rule action")
        })
    }

    // --- Settings ---

    /// Current organization settings (cached)
    pub async fn get_organization_config(&self) -> Result<SmartOrganizationConfig, OrchestratorError> {
        if let Some(cached) = self.settings.get(&()) {
            debug!("Organization config cache hit");
            return Ok(cached);
        }

        let settings = self.backend.get_organization_config().await.map_err(|e| {
            error!("Failed to load organization config: {}", e);
            OrchestratorError::Backend("load organization config")
        })?;
        self.settings.insert((), settings.clone());
        Ok(settings)
    }

    /// Validate, then persist a partial settings update
    ///
    /// Thresholds must lie in [0, 1] and a batch size must be positive. An
    /// invalid update is rejected before any backend call.
    pub async fn update_organization_config(
        &self,
        update: &OrganizationConfigUpdate,
    ) -> Result<SmartOrganizationConfig, OrchestratorError> {
        validate_update(update)?;

        self.settings.clear();
        let settings = self
            .backend
            .update_organization_config(update)
            .await
            .map_err(|e| {
                error!("Failed to update organization config: {}", e);
                OrchestratorError::Backend("update organization config")
            })?;

        info!("Updated organization config");
        Ok(settings)
    }

    // --- Rules ---

    /// Validate, then persist a new rule
    ///
    /// Cached analyses are dropped since their rule matches may change.
    pub async fn create_organization_rule(
        &self,
        rule: &OrganizationRule,
    ) -> Result<OrganizationRule, OrchestratorError> {
        self.check_rule(rule)?;
        let created = self
            .backend
            .create_organization_rule(rule)
            .await
            .map_err(|e| {
                error!("Failed to create rule {}: {}", rule.id, e);
                OrchestratorError::Backend("create organization rule")
            })?;
        self.analyses.clear();
        info!("Created organization rule {}", created.id);
        Ok(created)
    }

    /// Validate, then persist changes to a rule
    pub async fn update_organization_rule(
        &self,
        rule: &OrganizationRule,
    ) -> Result<OrganizationRule, OrchestratorError> {
        self.check_rule(rule)?;
        let updated = self
            .backend
            .update_organization_rule(rule)
            .await
            .map_err(|e| {
                error!("Failed to update rule {}: {}", rule.id, e);
                OrchestratorError::Backend("update organization rule")
            })?;
        self.analyses.clear();
        Ok(updated)
    }

    /// Delete a rule
    pub async fn delete_organization_rule(&self, rule_id: &str) -> Result<(), OrchestratorError> {
        self.backend
            .delete_organization_rule(rule_id)
            .await
            .map_err(|e| {
                error!("Failed to delete rule {}: {}", rule_id, e);
                OrchestratorError::Backend("delete organization rule")
            })?;
        self.analyses.clear();
        info!("Deleted organization rule {}", rule_id);
        Ok(())
    }

    /// Rules in effect, optionally for one collection
    pub async fn get_organization_rules(
        &self,
        collection_id: Option<&ItemId>,
    ) -> Result<Vec<OrganizationRule>, OrchestratorError> {
        self.backend
            .get_organization_rules(collection_id)
            .await
            .map_err(|e| {
                error!("Failed to load organization rules: {}", e);
                OrchestratorError::Backend("load organization rules")
            })
    }

    fn check_rule(&self, rule: &OrganizationRule) -> Result<(), OrchestratorError> {
        self.rules.validate_organization_rule(rule)?;
        for advisory in self.rules.review_rule(rule) {
            warn!("Rule {}: {}", rule.id, advisory);
        }
        Ok(())
    }
}

/// Add local judgement to a backend analysis
///
/// Tags naming traditional knowledge are flagged, categories keep their
/// backend appropriateness and gain the review flag where the item's
/// sensitivity calls for it, rule matches are attached and the overall
/// confidence is recomputed. No suggestion is ever removed.
fn enhance(
    mut analysis: OrganizationAnalysis,
    sensitivity: SensitivityLevel,
    rule_matches: Vec<RuleMatch>,
    now: u64,
) -> OrganizationAnalysis {
    mark_traditional_knowledge(&mut analysis.suggested_tags);
    analysis.suggested_categories = analysis
        .suggested_categories
        .into_iter()
        .map(|c| annotate_category(c, sensitivity))
        .collect();
    analysis.rule_matches = rule_matches;
    analysis.overall_confidence =
        overall_confidence(&analysis.suggested_tags, &analysis.suggested_categories);
    if analysis.analyzed_at == 0 {
        analysis.analyzed_at = now;
    }
    analysis
}

fn validate_update(update: &OrganizationConfigUpdate) -> Result<(), OrchestratorError> {
    let thresholds = [
        ("auto_tagging_threshold", update.auto_tagging_threshold),
        ("categorization_threshold", update.categorization_threshold),
    ];
    for (name, value) in thresholds {
        if let Some(value) = value {
            if !(0.0..=1.0).contains(&value) {
                return Err(OrchestratorError::InvalidConfig(format!(
                    "{} must be between 0.0 and 1.0, got {}",
                    name, value
                )));
            }
        }
    }
    if let Some(batch) = &update.batch_processing {
        if batch.batch_size == 0 {
            return Err(OrchestratorError::InvalidConfig(
                "batch_processing.batch_size must be at least 1".to_string(),
            ));
        }
    }
    Ok(())
}
