//! Suggestion engine backed by the organization backend

use crate::filter::{
    annotate_categories, filter_tag_suggestions, finalize_cultural_context, resolve_sensitivity,
    CULTURAL_CONTEXT_UNAVAILABLE,
};
use crate::SuggestError;
use std::sync::Arc;
use tapestry_domain::traits::OrganizationBackend;
use tapestry_domain::{
    CategorySuggestion, ContentItem, CulturalMetadata, OrganizationFeedback, SensitivityLevel,
    TagSuggestion,
};
use tracing::{debug, error, warn};

/// Produces culturally annotated tag and category suggestions
pub struct SuggestionEngine<B>
where
    B: OrganizationBackend,
{
    backend: Arc<B>,
}

impl<B> Clone for SuggestionEngine<B>
where
    B: OrganizationBackend,
{
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<B> SuggestionEngine<B>
where
    B: OrganizationBackend,
{
    /// Create a new SuggestionEngine over a shared backend
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Tag suggestions for an item, after the traditional-knowledge filter
    ///
    /// `metadata` defaults to the item's own cultural annotation.
    pub async fn generate_tag_suggestions(
        &self,
        content: &ContentItem,
        metadata: Option<&CulturalMetadata>,
    ) -> Result<Vec<TagSuggestion>, SuggestError> {
        let metadata = metadata.or(content.cultural.as_ref());
        let sensitivity = resolve_sensitivity(content, metadata);

        let raw = self
            .backend
            .generate_tag_suggestions(content, metadata)
            .await
            .map_err(|e| {
                error!("Tag suggestion failed for {}: {}", content.id, e);
                SuggestError::TagSuggestions
            })?;

        let raw_count = raw.len();
        let kept = filter_tag_suggestions(raw, sensitivity);
        debug!(
            "Kept {} of {} tag suggestions for {} at {} sensitivity",
            kept.len(),
            raw_count,
            content.id,
            sensitivity.as_str()
        );

        Ok(kept)
    }

    /// Category suggestions for an item with appropriateness and review flags
    pub async fn generate_category_suggestions(
        &self,
        content: &ContentItem,
        metadata: Option<&CulturalMetadata>,
    ) -> Result<Vec<CategorySuggestion>, SuggestError> {
        let metadata = metadata.or(content.cultural.as_ref());
        let sensitivity = resolve_sensitivity(content, metadata);

        let raw = self
            .backend
            .generate_category_suggestions(content, metadata)
            .await
            .map_err(|e| {
                error!("Category suggestion failed for {}: {}", content.id, e);
                SuggestError::CategorySuggestions
            })?;

        Ok(annotate_categories(raw, sensitivity))
    }

    /// Cultural context for an item; never fails
    ///
    /// A backend failure yields Public metadata explaining that analysis was
    /// unavailable. A successful result always carries an educational
    /// context.
    pub async fn analyze_cultural_context(&self, content: &ContentItem) -> CulturalMetadata {
        match self.backend.analyze_cultural_context(content).await {
            Ok(metadata) => finalize_cultural_context(metadata),
            Err(e) => {
                warn!("Cultural context analysis failed for {}: {}", content.id, e);
                CulturalMetadata::new(SensitivityLevel::Public)
                    .with_educational_context(CULTURAL_CONTEXT_UNAVAILABLE)
            }
        }
    }

    /// Forward a user correction to the backend's learning loop
    ///
    /// Failures are logged and otherwise ignored.
    pub async fn record_feedback(&self, feedback: &OrganizationFeedback) {
        if let Err(e) = self.backend.record_organization_feedback(feedback).await {
            warn!("Failed to record organization feedback for {}: {}", feedback.item_id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tapestry_backend::InMemoryBackend;
    use tapestry_domain::{ItemType, RawCategorySuggestion, TagSource};

    fn create_test_engine() -> (SuggestionEngine<InMemoryBackend>, Arc<InMemoryBackend>) {
        let backend = Arc::new(InMemoryBackend::new());
        (SuggestionEngine::new(backend.clone()), backend)
    }

    fn create_test_item(level: SensitivityLevel) -> ContentItem {
        ContentItem::new("doc-1", ItemType::Document)
            .with_title("Song cycle")
            .with_cultural(CulturalMetadata::new(level).with_origin("Yolngu"))
    }

    #[tokio::test]
    async fn test_item_sensitivity_used_by_default() {
        let (engine, backend) = create_test_engine();
        backend.script_tag_suggestions(
            "doc-1",
            vec![
                TagSuggestion::new("ancestral songlines", 0.85, "Cultural analysis", TagSource::CulturalAnalysis)
                    .traditional(),
            ],
        );

        let guarded = engine
            .generate_tag_suggestions(&create_test_item(SensitivityLevel::Guardian), None)
            .await
            .unwrap();
        assert_eq!(guarded.len(), 1);
        assert!(guarded[0].reason.ends_with("educational context provided)"));

        let public = engine
            .generate_tag_suggestions(&create_test_item(SensitivityLevel::Public), None)
            .await
            .unwrap();
        assert!(public.is_empty());
    }

    #[tokio::test]
    async fn test_sacred_items_keep_every_category() {
        let (engine, backend) = create_test_engine();
        backend.script_category_suggestions(
            "doc-1",
            vec![
                RawCategorySuggestion::new("ceremony", 0.9),
                RawCategorySuggestion::new("music", 0.7),
            ],
        );

        let categories = engine
            .generate_category_suggestions(&create_test_item(SensitivityLevel::Sacred), None)
            .await
            .unwrap();

        assert_eq!(categories.len(), 2, "Sensitivity never removes suggestions");
        assert!(categories.iter().all(|c| c.requires_community_validation));
    }

    #[tokio::test]
    async fn test_backend_failure_maps_to_stable_error() {
        let (engine, backend) = create_test_engine();
        backend.fail_operation("generate_tag_suggestions");

        let result = engine
            .generate_tag_suggestions(&create_test_item(SensitivityLevel::Public), None)
            .await;
        let error = result.unwrap_err();
        assert_eq!(error, SuggestError::TagSuggestions);
        assert_eq!(error.to_string(), "Unable to generate tag suggestions");
    }

    #[tokio::test]
    async fn test_cultural_context_degrades() {
        let (engine, backend) = create_test_engine();
        backend.fail_operation("analyze_cultural_context");

        let metadata = engine
            .analyze_cultural_context(&create_test_item(SensitivityLevel::Sacred))
            .await;
        assert_eq!(metadata.sensitivity_level, SensitivityLevel::Public);
        assert_eq!(
            metadata.educational_context.as_deref(),
            Some("Cultural context analysis unavailable")
        );
    }

    #[tokio::test]
    async fn test_cultural_context_gets_educational_default() {
        let (engine, _backend) = create_test_engine();

        let metadata = engine
            .analyze_cultural_context(&create_test_item(SensitivityLevel::Community))
            .await;
        assert_eq!(metadata.sensitivity_level, SensitivityLevel::Community);
        assert_eq!(metadata.cultural_origin.as_deref(), Some("Yolngu"));
        assert_eq!(
            metadata.educational_context.as_deref(),
            Some("Cultural context provided for educational purposes")
        );
    }

    #[tokio::test]
    async fn test_feedback_failure_is_swallowed() {
        let (engine, backend) = create_test_engine();
        let feedback = OrganizationFeedback {
            item_id: "doc-1".into(),
            item_type: ItemType::Document,
            accepted: vec!["music".into()],
            rejected: vec![],
            note: None,
        };

        engine.record_feedback(&feedback).await;
        assert_eq!(backend.feedback().len(), 1);

        backend.fail_operation("record_organization_feedback");
        engine.record_feedback(&feedback).await;
        assert_eq!(backend.feedback().len(), 1);
        assert_eq!(backend.call_count("record_organization_feedback"), 2);
    }
}
