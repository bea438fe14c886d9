//! Deciding what automatic organization applies to an analyzed item

use serde::{Deserialize, Serialize};
use tapestry_domain::{
    CulturalMetadata, ItemId, ItemType, OrganizationAnalysis, RuleAction, SmartOrganizationConfig,
    TagSource,
};
use tapestry_rules::RuleEngine;

/// Appropriateness a category needs to be applied automatically
const CATEGORY_APPROPRIATENESS: f64 = 0.8;

/// Overall confidence the analysis needs before its cultural context is applied
const CULTURAL_METADATA_CONFIDENCE: f64 = 0.7;

/// What automatic organization did to an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationOutcome {
    /// Organized item
    pub item_id: ItemId,

    /// Organized item's type
    pub item_type: ItemType,

    /// Tags written to the item
    pub applied_tags: Vec<String>,

    /// Categories written to the item
    pub applied_categories: Vec<String>,

    /// Whether the analysis' cultural context was attached
    pub cultural_metadata_applied: bool,

    /// Rule actions executed
    pub executed_actions: Vec<RuleAction>,

    /// Rule actions left for review (confidence too low)
    pub skipped_actions: Vec<RuleAction>,

    /// Whether community review was requested
    pub validation_requested: bool,
}

impl OrganizationOutcome {
    pub(crate) fn new(item_id: ItemId, item_type: ItemType) -> Self {
        Self {
            item_id,
            item_type,
            applied_tags: Vec::new(),
            applied_categories: Vec::new(),
            cultural_metadata_applied: false,
            executed_actions: Vec::new(),
            skipped_actions: Vec::new(),
            validation_requested: false,
        }
    }
}

/// Mutations an analysis warrants under the current settings
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct OrganizationPlan {
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    pub cultural_metadata: Option<CulturalMetadata>,
    pub actions: Vec<RuleAction>,
    pub skipped_actions: Vec<RuleAction>,
    /// Reason for an advisory community review, if one is warranted
    pub validation_reason: Option<String>,
}

pub(crate) fn plan(
    analysis: &OrganizationAnalysis,
    settings: &SmartOrganizationConfig,
    rules: &RuleEngine,
) -> OrganizationPlan {
    let mut plan = OrganizationPlan::default();

    if settings.auto_tagging {
        for suggestion in &analysis.suggested_tags {
            if suggestion.confidence < settings.auto_tagging_threshold {
                continue;
            }
            if suggestion.source == TagSource::CommunityInput && !settings.community_input {
                continue;
            }
            if !plan.tags.contains(&suggestion.tag) {
                plan.tags.push(suggestion.tag.clone());
            }
        }
    }

    if settings.smart_categorization {
        for suggestion in &analysis.suggested_categories {
            if suggestion.confidence >= settings.categorization_threshold
                && suggestion.cultural_appropriateness > CATEGORY_APPROPRIATENESS
                && !plan.categories.contains(&suggestion.category)
            {
                plan.categories.push(suggestion.category.clone());
            }
        }
    }

    if settings.cultural_analysis && analysis.overall_confidence > CULTURAL_METADATA_CONFIDENCE {
        plan.cultural_metadata = analysis.cultural_context.clone();
    }

    for action in analysis.rule_matches.iter().flat_map(|m| m.actions.iter()) {
        if rules.is_auto_executable(action) {
            plan.actions.push(action.action.clone());
        } else {
            plan.skipped_actions.push(action.action.clone());
        }
    }

    if settings.require_cultural_validation {
        let flagged: Vec<&str> = analysis
            .suggested_categories
            .iter()
            .filter(|c| c.requires_community_validation)
            .map(|c| c.category.as_str())
            .collect();
        if !flagged.is_empty() {
            plan.validation_reason = Some(format!(
                "Community review suggested for categories: {}",
                flagged.join(", ")
            ));
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use tapestry_domain::{
        CategorySuggestion, OrganizationAction, RuleMatch, SensitivityLevel, TagSuggestion,
    };

    fn category(name: &str, confidence: f64, appropriateness: f64, flagged: bool) -> CategorySuggestion {
        CategorySuggestion {
            category: name.to_string(),
            confidence,
            cultural_appropriateness: appropriateness,
            requires_community_validation: flagged,
            reason: String::new(),
        }
    }

    fn create_test_analysis() -> OrganizationAnalysis {
        let mut analysis = OrganizationAnalysis::empty("doc-1".into(), ItemType::Document);
        analysis.suggested_tags = vec![
            TagSuggestion::new("weaving", 0.9, "", TagSource::ContentAnalysis),
            TagSuggestion::new("textiles", 0.8, "", TagSource::AiInference),
            TagSuggestion::new("patterns", 0.79, "", TagSource::ContentAnalysis),
            TagSuggestion::new("weaving", 0.95, "", TagSource::CulturalAnalysis),
            TagSuggestion::new("kete", 0.85, "", TagSource::CommunityInput),
        ];
        analysis.suggested_categories = vec![
            category("Crafts", 0.9, 0.85, false),
            category("History", 0.6, 0.9, false),
            category("Ceremonial Practice", 0.9, 0.6, true),
        ];
        analysis.cultural_context = Some(CulturalMetadata::new(SensitivityLevel::Community).with_origin("Maori"));
        analysis.overall_confidence = 0.8;
        analysis.rule_matches = vec![RuleMatch {
            rule_id: "r1".into(),
            rule_name: "r1".into(),
            priority: 0,
            actions: vec![
                OrganizationAction {
                    action: RuleAction::AddTag("fibre-arts".into()),
                    confidence: 0.95,
                    rule_id: "r1".into(),
                },
                OrganizationAction {
                    action: RuleAction::MoveToCollection("archive".into()),
                    confidence: 0.7,
                    rule_id: "r1".into(),
                },
            ],
        }];
        analysis
    }

    #[test]
    fn test_default_settings() {
        let plan = plan(
            &create_test_analysis(),
            &SmartOrganizationConfig::default(),
            &RuleEngine::default_config(),
        );

        assert_eq!(plan.tags, vec!["weaving", "textiles", "kete"]);
        assert_eq!(plan.categories, vec!["Crafts"]);
        assert!(plan.cultural_metadata.is_some());
        assert_eq!(plan.actions, vec![RuleAction::AddTag("fibre-arts".into())]);
        assert_eq!(
            plan.skipped_actions,
            vec![RuleAction::MoveToCollection("archive".into())],
            "Exactly 0.7 is not above the auto-execute threshold"
        );
        assert!(plan.validation_reason.is_none());
    }

    #[test]
    fn test_switches_disable_each_step() {
        let settings = SmartOrganizationConfig {
            auto_tagging: false,
            smart_categorization: false,
            cultural_analysis: false,
            ..Default::default()
        };
        let plan = plan(&create_test_analysis(), &settings, &RuleEngine::default_config());

        assert!(plan.tags.is_empty());
        assert!(plan.categories.is_empty());
        assert!(plan.cultural_metadata.is_none());
        assert_eq!(plan.actions.len(), 1, "Rule actions are not gated by the switches");
    }

    #[test]
    fn test_community_input_switch() {
        let settings = SmartOrganizationConfig {
            community_input: false,
            ..Default::default()
        };
        let plan = plan(&create_test_analysis(), &settings, &RuleEngine::default_config());
        assert_eq!(plan.tags, vec!["weaving", "textiles"]);
    }

    #[test]
    fn test_low_overall_confidence_skips_cultural_metadata() {
        let mut analysis = create_test_analysis();
        analysis.overall_confidence = 0.7;
        let plan = plan(&analysis, &SmartOrganizationConfig::default(), &RuleEngine::default_config());
        assert!(plan.cultural_metadata.is_none());
    }

    #[test]
    fn test_validation_reason_lists_flagged_categories() {
        let settings = SmartOrganizationConfig {
            require_cultural_validation: true,
            ..Default::default()
        };
        let plan = plan(&create_test_analysis(), &settings, &RuleEngine::default_config());

        assert_eq!(
            plan.validation_reason.as_deref(),
            Some("Community review suggested for categories: Ceremonial Practice")
        );
        assert_eq!(plan.categories, vec!["Crafts"]);
    }

    #[test]
    fn test_strict_rules_skip_more_actions() {
        let plan = plan(
            &create_test_analysis(),
            &SmartOrganizationConfig::default(),
            &RuleEngine::new(tapestry_rules::RuleEngineConfig::strict()),
        );
        assert_eq!(plan.actions.len(), 1);
        assert_eq!(plan.skipped_actions.len(), 1);
    }
}
