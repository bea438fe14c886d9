//! Rule engine configuration

use serde::{Deserialize, Serialize};
use tapestry_domain::rule::AUTO_EXECUTE_THRESHOLD;
use tapestry_domain::ConditionOperator;

/// Confidence assigned to rule actions, per operator, and the auto-execution cutoff
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleEngineConfig {
    /// Actions above this confidence may run without review
    pub auto_execute_threshold: f64,

    /// Confidence of `equals` matches
    pub equals_confidence: f64,

    /// Confidence of `contains` matches
    pub contains_confidence: f64,

    /// Confidence of `starts_with` matches
    pub starts_with_confidence: f64,

    /// Confidence of `greater_than` / `less_than` matches
    pub comparison_confidence: f64,

    /// Confidence of `in_range` matches
    pub in_range_confidence: f64,
}

impl Default for RuleEngineConfig {
    fn default() -> Self {
        Self {
            auto_execute_threshold: AUTO_EXECUTE_THRESHOLD,
            equals_confidence: 0.95,
            contains_confidence: 0.8,
            starts_with_confidence: 0.85,
            comparison_confidence: 0.75,
            in_range_confidence: 0.85,
        }
    }
}

impl RuleEngineConfig {
    /// Only exact matches run automatically
    pub fn strict() -> Self {
        Self {
            auto_execute_threshold: 0.9,
            ..Self::default()
        }
    }

    /// Confidence of an action produced by a condition using `operator`
    pub fn confidence_for(&self, operator: ConditionOperator) -> f64 {
        match operator {
            ConditionOperator::Equals => self.equals_confidence,
            ConditionOperator::Contains => self.contains_confidence,
            ConditionOperator::StartsWith => self.starts_with_confidence,
            ConditionOperator::GreaterThan | ConditionOperator::LessThan => {
                self.comparison_confidence
            }
            ConditionOperator::InRange => self.in_range_confidence,
        }
    }
}
