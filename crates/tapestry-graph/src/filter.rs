//! Relationship candidate filtering

use std::collections::HashMap;
use tapestry_domain::scoring::clamp_unit;
use tapestry_domain::{ItemId, RelationshipSuggestion, RelationshipType};

/// Candidates this confident and appropriate are kept without review
const TRUSTED_THRESHOLD: f64 = 0.8;

/// Minimum confidence for any other candidate
const MIN_CONFIDENCE: f64 = 0.5;

/// Appropriateness below which a kept candidate is flagged for review
const REVIEW_APPROPRIATENESS: f64 = 0.7;

/// Filter, deduplicate and rank relationship candidates for `item_id`
///
/// A candidate with confidence and appropriateness both above 0.8 is kept;
/// any other candidate is kept only with confidence above 0.5, and is flagged
/// for community validation when its appropriateness is below 0.7. Links back
/// to `item_id` are dropped. For each `(target, type)` only the most
/// confident candidate survives. The result is sorted by confidence,
/// highest first.
pub fn filter_relationship_suggestions(
    item_id: &ItemId,
    candidates: Vec<RelationshipSuggestion>,
) -> Vec<RelationshipSuggestion> {
    let mut best: HashMap<(ItemId, RelationshipType), RelationshipSuggestion> = HashMap::new();
    let mut order: Vec<(ItemId, RelationshipType)> = Vec::new();

    for mut candidate in candidates {
        if &candidate.target_id == item_id {
            continue;
        }

        candidate.confidence = clamp_unit(candidate.confidence);
        candidate.cultural_appropriateness = clamp_unit(candidate.cultural_appropriateness);
        candidate.bidirectional = candidate.relationship_type.is_bidirectional();

        let trusted = candidate.confidence > TRUSTED_THRESHOLD
            && candidate.cultural_appropriateness > TRUSTED_THRESHOLD;
        if !trusted {
            if candidate.confidence <= MIN_CONFIDENCE {
                continue;
            }
            if candidate.cultural_appropriateness < REVIEW_APPROPRIATENESS {
                candidate.requires_community_validation = true;
            }
        }

        let key = (candidate.target_id.clone(), candidate.relationship_type);
        match best.get(&key) {
            Some(existing) if existing.confidence >= candidate.confidence => {}
            Some(_) => {
                best.insert(key, candidate);
            }
            None => {
                order.push(key.clone());
                best.insert(key, candidate);
            }
        }
    }

    let mut kept: Vec<RelationshipSuggestion> =
        order.into_iter().filter_map(|key| best.remove(&key)).collect();
    kept.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    kept
}
