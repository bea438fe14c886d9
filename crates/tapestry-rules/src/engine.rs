//! Rule evaluation

use crate::{RuleAdvisory, RuleEngineConfig, RuleError};
use tapestry_domain::{
    ConditionOperator, ContentItem, FieldValue, OrganizationAction, OrganizationRule, RuleAction,
    RuleCondition, RuleMatch, RuleValue,
};

/// One scalar taken from an item field or a rule value
#[derive(Debug, Clone, Copy)]
enum Operand<'a> {
    Text(&'a str),
    Number(f64),
}

impl Operand<'_> {
    fn number(&self) -> Option<f64> {
        match self {
            Operand::Number(n) => Some(*n),
            Operand::Text(t) => t.trim().parse().ok(),
        }
    }

    fn lowered(&self) -> String {
        match self {
            Operand::Text(t) => t.to_lowercase(),
            Operand::Number(n) => n.to_string(),
        }
    }
}

/// Scalars a rule value compares against (a list means "any of")
fn candidates(value: &RuleValue) -> Vec<Operand<'_>> {
    match value {
        RuleValue::Number(n) => vec![Operand::Number(*n)],
        RuleValue::Text(t) => vec![Operand::Text(t)],
        RuleValue::List(values) => values.iter().map(|v| Operand::Text(v)).collect(),
        RuleValue::Range { .. } => Vec::new(),
    }
}

fn operands_equal(left: Operand<'_>, right: Operand<'_>) -> bool {
    match (left.number(), right.number()) {
        (Some(a), Some(b)) => a == b,
        _ => left.lowered() == right.lowered(),
    }
}

fn matches_operand(operand: Operand<'_>, operator: ConditionOperator, value: &RuleValue) -> bool {
    match operator {
        ConditionOperator::Equals => candidates(value)
            .into_iter()
            .any(|c| operands_equal(operand, c)),
        ConditionOperator::Contains => {
            let haystack = operand.lowered();
            candidates(value)
                .into_iter()
                .any(|c| haystack.contains(&c.lowered()))
        }
        ConditionOperator::StartsWith => {
            let haystack = operand.lowered();
            candidates(value)
                .into_iter()
                .any(|c| haystack.starts_with(&c.lowered()))
        }
        ConditionOperator::GreaterThan | ConditionOperator::LessThan => {
            let Some(actual) = operand.number() else {
                return false;
            };
            candidates(value).into_iter().filter_map(|c| c.number()).any(|expected| {
                if operator == ConditionOperator::GreaterThan {
                    actual > expected
                } else {
                    actual < expected
                }
            })
        }
        ConditionOperator::InRange => match (value, operand.number()) {
            (RuleValue::Range { min, max }, Some(actual)) => actual >= *min && actual <= *max,
            _ => false,
        },
    }
}

/// Evaluates organization rules against items
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    config: RuleEngineConfig,
}

impl RuleEngine {
    /// Create a new RuleEngine with the given configuration
    pub fn new(config: RuleEngineConfig) -> Self {
        Self { config }
    }

    /// Create a RuleEngine with default configuration
    pub fn default_config() -> Self {
        Self::new(RuleEngineConfig::default())
    }

    /// Active configuration
    pub fn config(&self) -> &RuleEngineConfig {
        &self.config
    }

    /// Evaluate every enabled rule against an item
    ///
    /// Rules are visited in priority order (highest first); rules with equal
    /// priority keep the order they were given in. Each matching rule yields
    /// one [`RuleMatch`] carrying its action with an operator-derived
    /// confidence.
    pub fn apply_organization_rules(
        &self,
        item: &ContentItem,
        rules: &[OrganizationRule],
    ) -> Vec<RuleMatch> {
        let mut ordered: Vec<&OrganizationRule> = rules.iter().filter(|r| r.enabled).collect();
        // sort_by is stable
        ordered.sort_by(|a, b| b.priority.cmp(&a.priority));

        ordered
            .into_iter()
            .filter(|rule| self.evaluate(item, &rule.condition))
            .map(|rule| RuleMatch {
                rule_id: rule.id.clone(),
                rule_name: rule.name.clone(),
                priority: rule.priority,
                actions: vec![OrganizationAction {
                    action: rule.action.clone(),
                    confidence: self.config.confidence_for(rule.condition.operator),
                    rule_id: rule.id.clone(),
                }],
            })
            .collect()
    }

    /// Whether a single condition holds for an item
    ///
    /// A missing field never matches. List fields match when any element
    /// matches; `contains` against a list field means case-insensitive
    /// membership rather than substring search.
    pub fn evaluate(&self, item: &ContentItem, condition: &RuleCondition) -> bool {
        let Some(field) = item.field(&condition.field) else {
            return false;
        };

        match &field {
            FieldValue::List(elements) => elements.iter().any(|element| {
                let element = Operand::Text(element);
                if condition.operator == ConditionOperator::Contains {
                    candidates(&condition.value)
                        .into_iter()
                        .any(|c| element.lowered() == c.lowered())
                } else {
                    matches_operand(element, condition.operator, &condition.value)
                }
            }),
            FieldValue::Text(text) => {
                matches_operand(Operand::Text(text), condition.operator, &condition.value)
            }
            FieldValue::Number(n) => {
                matches_operand(Operand::Number(*n), condition.operator, &condition.value)
            }
        }
    }

    /// Whether an action may be executed without review
    pub fn is_auto_executable(&self, action: &OrganizationAction) -> bool {
        action.confidence > self.config.auto_execute_threshold
    }

    /// Reject rules that must never be persisted
    ///
    /// A `set_cultural_context` action must describe educational use: its
    /// text has to mention "educational" or "learning".
    pub fn validate_organization_rule(&self, rule: &OrganizationRule) -> Result<(), RuleError> {
        match &rule.action {
            RuleAction::SetCulturalContext(value) => {
                let lowered = value.to_lowercase();
                if lowered.contains("educational") || lowered.contains("learning") {
                    Ok(())
                } else {
                    Err(RuleError::InvalidCulturalContext {
                        rule_id: rule.id.clone(),
                        value: value.clone(),
                    })
                }
            }
            RuleAction::AddTag(_)
            | RuleAction::SetCategory(_)
            | RuleAction::MoveToCollection(_)
            | RuleAction::RequestValidation(_) => Ok(()),
        }
    }

    /// Advisory findings for a rule that is valid but probably mistaken
    pub fn review_rule(&self, rule: &OrganizationRule) -> Vec<RuleAdvisory> {
        crate::review::review(rule)
    }
}
