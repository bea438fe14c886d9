//! Scoring primitives
//!
//! Pure functions computing confidence, cultural appropriateness, relationship
//! strength and network metrics. Every result lies in [0.0, 1.0].

use crate::{CategorySuggestion, RelationshipType, SensitivityLevel, TagSuggestion};

/// Weight of educational value in relationship strength
pub const EDUCATIONAL_STRENGTH_WEIGHT: f64 = 0.2;

/// Cultural appropriateness when nothing lowers it
pub const BASE_APPROPRIATENESS: f64 = 0.8;

/// Appropriateness for material at Sacred sensitivity
pub const SACRED_APPROPRIATENESS: f64 = 0.6;

/// Appropriateness for material at Guardian sensitivity
pub const GUARDIAN_APPROPRIATENESS: f64 = 0.7;

/// Ceiling for categories naming ceremonial concepts
pub const CEREMONIAL_CATEGORY_CAP: f64 = 0.6;

/// Appropriateness below which community validation is suggested
pub const COMMUNITY_VALIDATION_THRESHOLD: f64 = 0.8;

/// Distinct origins at which diversity saturates
pub const DIVERSITY_SATURATION: f64 = 10.0;

/// Category words that cap appropriateness
pub const CEREMONIAL_TERMS: [&str; 4] = ["sacred", "ceremonial", "ritual", "spiritual"];

/// Tag keywords that mark traditional knowledge
pub const TRADITIONAL_KEYWORDS: [&str; 17] = [
    "traditional",
    "sacred",
    "ceremonial",
    "ritual",
    "indigenous",
    "tribal",
    "ancestral",
    "spiritual",
    "medicine",
    "healing",
    "elder",
    "wisdom",
    "cultural",
    "heritage",
    "community",
    "oral",
    "storytelling",
];

/// Clamp a score into [0.0, 1.0]; NaN becomes 0.0
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Strength of a new relationship: `min(1, base(type) + educational_value × 0.2)`
pub fn calculate_relationship_strength(
    relationship_type: RelationshipType,
    educational_value: f64,
) -> f64 {
    clamp_unit(
        relationship_type.base_strength() + clamp_unit(educational_value) * EDUCATIONAL_STRENGTH_WEIGHT,
    )
}

/// Appropriateness of a category for material at the given sensitivity
///
/// Starts at 0.8, drops to 0.6 for Sacred and 0.7 for Guardian material, and
/// is capped at 0.6 when the category names a ceremonial concept.
pub fn category_cultural_appropriateness(category: &str, sensitivity: SensitivityLevel) -> f64 {
    let mut score = if sensitivity >= SensitivityLevel::Sacred {
        SACRED_APPROPRIATENESS
    } else if sensitivity >= SensitivityLevel::Guardian {
        GUARDIAN_APPROPRIATENESS
    } else {
        BASE_APPROPRIATENESS
    };

    let lowered = category.to_lowercase();
    if CEREMONIAL_TERMS.iter().any(|term| lowered.contains(term)) {
        score = score.min(CEREMONIAL_CATEGORY_CAP);
    }

    score
}

/// Whether community members should be invited to review a suggestion
///
/// Advisory only; nothing is hidden or blocked on this flag.
pub fn requires_community_validation(appropriateness: f64, sensitivity: SensitivityLevel) -> bool {
    appropriateness < COMMUNITY_VALIDATION_THRESHOLD || sensitivity >= SensitivityLevel::Community
}

/// Cultural diversity of a network: `min(1, distinct_origins / 10)`
pub fn network_diversity(distinct_origins: usize) -> f64 {
    clamp_unit(distinct_origins as f64 / DIVERSITY_SATURATION)
}

/// Share of direct relationships that are community responses
pub fn community_participation(community_responses: usize, direct_relationships: usize) -> f64 {
    clamp_unit(community_responses as f64 / direct_relationships.max(1) as f64)
}

/// Mean of a slice of scores, 0.0 when empty
pub fn mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Overall analysis confidence
///
/// The mean tag confidence averaged with the mean category confidence; an
/// empty list contributes 0.0.
pub fn overall_confidence(tags: &[TagSuggestion], categories: &[CategorySuggestion]) -> f64 {
    let tag_mean = mean(tags.iter().map(|t| t.confidence));
    let category_mean = mean(categories.iter().map(|c| c.confidence));
    clamp_unit((tag_mean + category_mean) / 2.0)
}

/// Whether a tag names traditional knowledge (keyword match)
pub fn is_traditional_knowledge(tag: &str) -> bool {
    let lowered = tag.to_lowercase();
    TRADITIONAL_KEYWORDS.iter().any(|keyword| lowered.contains(keyword))
}

/// Significance of a cultural cluster
///
/// `min(1, 0.6 × members / total_nodes + 0.4 × members_with_protocols / members)`
pub fn cluster_significance(members: usize, total_nodes: usize, members_with_protocols: usize) -> f64 {
    if members == 0 {
        return 0.0;
    }
    let share = members as f64 / total_nodes.max(members) as f64;
    let protocol_share = members_with_protocols.min(members) as f64 / members as f64;
    clamp_unit(0.6 * share + 0.4 * protocol_share)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TagSource;

    fn category(confidence: f64) -> CategorySuggestion {
        CategorySuggestion {
            category: "history".into(),
            confidence,
            cultural_appropriateness: 0.8,
            requires_community_validation: false,
            reason: String::new(),
        }
    }

    #[test]
    fn test_strength_capped() {
        let strength = calculate_relationship_strength(RelationshipType::TraditionalContinuation, 1.0);
        assert_eq!(strength, 1.0);
    }

    #[test]
    fn test_strength_without_bonus() {
        assert_eq!(calculate_relationship_strength(RelationshipType::Sibling, 0.0), 0.8);
    }

    #[test]
    fn test_strength_with_partial_bonus() {
        let strength = calculate_relationship_strength(RelationshipType::CommunityResponse, 0.5);
        assert!((strength - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_sacred_category_appropriateness() {
        let score = category_cultural_appropriateness("Sacred Songs", SensitivityLevel::Sacred);
        assert!(score <= 0.6);
        assert!(requires_community_validation(score, SensitivityLevel::Sacred));
    }

    #[test]
    fn test_appropriateness_levels() {
        assert_eq!(category_cultural_appropriateness("history", SensitivityLevel::Public), 0.8);
        assert_eq!(category_cultural_appropriateness("history", SensitivityLevel::Community), 0.8);
        assert_eq!(category_cultural_appropriateness("history", SensitivityLevel::Guardian), 0.7);
        assert_eq!(category_cultural_appropriateness("history", SensitivityLevel::Sacred), 0.6);
        assert_eq!(category_cultural_appropriateness("Ritual objects", SensitivityLevel::Public), 0.6);
    }

    #[test]
    fn test_community_validation_flag() {
        assert!(!requires_community_validation(0.8, SensitivityLevel::Public));
        assert!(requires_community_validation(0.79, SensitivityLevel::Public));
        assert!(requires_community_validation(0.9, SensitivityLevel::Community));
    }

    #[test]
    fn test_network_diversity() {
        assert!((network_diversity(3) - 0.3).abs() < 1e-9);
        assert_eq!(network_diversity(0), 0.0);
        assert_eq!(network_diversity(25), 1.0);
    }

    #[test]
    fn test_community_participation() {
        assert_eq!(community_participation(0, 0), 0.0);
        assert_eq!(community_participation(1, 4), 0.25);
    }

    #[test]
    fn test_overall_confidence() {
        let tags = vec![
            TagSuggestion::new("a", 0.9, "", TagSource::ContentAnalysis),
            TagSuggestion::new("b", 0.7, "", TagSource::ContentAnalysis),
        ];
        let categories = vec![category(0.6)];
        assert!((overall_confidence(&tags, &categories) - 0.7).abs() < 1e-9);
        assert!((overall_confidence(&tags, &[]) - 0.4).abs() < 1e-9);
        assert_eq!(overall_confidence(&[], &[]), 0.0);
    }

    #[test]
    fn test_traditional_keywords() {
        assert!(is_traditional_knowledge("Ancestral Songs"));
        assert!(is_traditional_knowledge("oral-history"));
        assert!(!is_traditional_knowledge("architecture"));
    }

    #[test]
    fn test_cluster_significance() {
        assert_eq!(cluster_significance(0, 10, 0), 0.0);
        assert!((cluster_significance(5, 10, 5) - 0.7).abs() < 1e-9);
        assert!((cluster_significance(2, 2, 0) - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_clamp_unit_nan() {
        assert_eq!(clamp_unit(f64::NAN), 0.0);
        assert_eq!(clamp_unit(-3.0), 0.0);
        assert_eq!(clamp_unit(3.0), 1.0);
    }
}
