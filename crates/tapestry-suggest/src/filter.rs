//! Pure suggestion filters and annotations

use tapestry_domain::scoring::{
    category_cultural_appropriateness, clamp_unit, is_traditional_knowledge,
    requires_community_validation,
};
use tapestry_domain::{
    CategorySuggestion, ContentItem, CulturalMetadata, RawCategorySuggestion, SensitivityLevel,
    TagSource, TagSuggestion,
};

/// Appended to the reason of traditional-knowledge tags kept for guarded material
pub const TRADITIONAL_KNOWLEDGE_NOTE: &str = " (Traditional knowledge - educational context provided)";

/// Educational context used when cultural analysis fails
pub const CULTURAL_CONTEXT_UNAVAILABLE: &str = "Cultural context analysis unavailable";

/// Educational context added when the backend supplies none
pub const DEFAULT_EDUCATIONAL_CONTEXT: &str = "Cultural context provided for educational purposes";

/// Confidence a traditional tag needs when the material is not guarded
const UNGUARDED_TRADITIONAL_CONFIDENCE: f64 = 0.9;

/// Sensitivity to judge suggestions by: explicit metadata, then the item's
/// own annotation, then Public
pub fn resolve_sensitivity(
    content: &ContentItem,
    metadata: Option<&CulturalMetadata>,
) -> SensitivityLevel {
    metadata
        .or(content.cultural.as_ref())
        .map(|m| m.sensitivity_level)
        .unwrap_or_default()
}

/// Apply the traditional-knowledge filter to raw tag suggestions
///
/// Only cultural-analysis tags flagged as traditional knowledge are
/// filtered. At Guardian sensitivity or above they are kept and their reason
/// notes the educational framing; below it they survive only with confidence
/// above 0.9. Confidence is clamped into [0, 1] for every tag.
pub fn filter_tag_suggestions(
    raw: Vec<TagSuggestion>,
    sensitivity: SensitivityLevel,
) -> Vec<TagSuggestion> {
    raw.into_iter()
        .filter_map(|mut suggestion| {
            suggestion.confidence = clamp_unit(suggestion.confidence);

            if suggestion.source != TagSource::CulturalAnalysis || !suggestion.traditional_knowledge {
                return Some(suggestion);
            }

            if sensitivity >= SensitivityLevel::Guardian {
                suggestion.reason.push_str(TRADITIONAL_KNOWLEDGE_NOTE);
                Some(suggestion)
            } else if suggestion.confidence > UNGUARDED_TRADITIONAL_CONFIDENCE {
                Some(suggestion)
            } else {
                None
            }
        })
        .collect()
}

/// Flag tags whose text names traditional knowledge
pub fn mark_traditional_knowledge(tags: &mut [TagSuggestion]) {
    for tag in tags.iter_mut() {
        if is_traditional_knowledge(&tag.tag) {
            tag.traditional_knowledge = true;
        }
    }
}

/// Give raw category suggestions an appropriateness score and review flag
///
/// A backend-supplied appropriateness is kept (clamped); otherwise it is
/// computed from the category name and sensitivity.
pub fn annotate_categories(
    raw: Vec<RawCategorySuggestion>,
    sensitivity: SensitivityLevel,
) -> Vec<CategorySuggestion> {
    raw.into_iter()
        .map(|suggestion| {
            let appropriateness = match suggestion.cultural_appropriateness {
                Some(score) => clamp_unit(score),
                None => category_cultural_appropriateness(&suggestion.category, sensitivity),
            };
            CategorySuggestion {
                requires_community_validation: requires_community_validation(
                    appropriateness,
                    sensitivity,
                ),
                category: suggestion.category,
                confidence: clamp_unit(suggestion.confidence),
                cultural_appropriateness: appropriateness,
                reason: suggestion.reason,
            }
        })
        .collect()
}

/// Re-check an already annotated category against the item's sensitivity
///
/// The existing appropriateness is kept (clamped). The review flag is only
/// ever added.
pub fn annotate_category(
    mut suggestion: CategorySuggestion,
    sensitivity: SensitivityLevel,
) -> CategorySuggestion {
    suggestion.cultural_appropriateness = clamp_unit(suggestion.cultural_appropriateness);
    suggestion.confidence = clamp_unit(suggestion.confidence);
    suggestion.requires_community_validation |=
        requires_community_validation(suggestion.cultural_appropriateness, sensitivity);
    suggestion
}

/// Make sure cultural context always carries an educational framing
pub fn finalize_cultural_context(mut metadata: CulturalMetadata) -> CulturalMetadata {
    let missing = metadata
        .educational_context
        .as_deref()
        .map(|c| c.trim().is_empty())
        .unwrap_or(true);
    if missing {
        metadata.educational_context = Some(DEFAULT_EDUCATIONAL_CONTEXT.to_string());
    }
    metadata
}
