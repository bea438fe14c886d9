//! Advisory review of rules

use std::fmt;
use tapestry_domain::content::BUILT_IN_FIELDS;
use tapestry_domain::{OrganizationRule, RuleValue};

/// A finding about a rule that is valid but likely mistaken
///
/// Advisories never block persistence.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleAdvisory {
    /// Condition names no field
    EmptyFieldName,

    /// Action carries no value
    EmptyActionValue,

    /// `in_range` used without a range value; the rule can never match
    MissingRange,

    /// Range lower bound exceeds its upper bound; the rule can never match
    InvertedRange {
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },

    /// Numeric operator with an operand that is not a number
    NonNumericOperand {
        /// Operator name
        operator: String,
    },

    /// Field is not built in and will only resolve through item attributes
    UnknownField(String),
}

impl fmt::Display for RuleAdvisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleAdvisory::EmptyFieldName => write!(f, "Condition has an empty field name"),
            RuleAdvisory::EmptyActionValue => write!(f, "Action has an empty value"),
            RuleAdvisory::MissingRange => {
                write!(f, "in_range needs a {{min, max}} value and will never match")
            }
            RuleAdvisory::InvertedRange { min, max } => {
                write!(f, "Range minimum {} exceeds maximum {}", min, max)
            }
            RuleAdvisory::NonNumericOperand { operator } => {
                write!(f, "{} compares numbers but the value is not numeric", operator)
            }
            RuleAdvisory::UnknownField(field) => {
                write!(f, "Field '{}' is not built in; it must be an item attribute", field)
            }
        }
    }
}

pub(crate) fn review(rule: &OrganizationRule) -> Vec<RuleAdvisory> {
    let mut advisories = Vec::new();
    let condition = &rule.condition;

    if condition.field.trim().is_empty() {
        advisories.push(RuleAdvisory::EmptyFieldName);
    } else if !BUILT_IN_FIELDS.contains(&condition.field.as_str()) {
        advisories.push(RuleAdvisory::UnknownField(condition.field.clone()));
    }

    if rule.action.value().trim().is_empty() {
        advisories.push(RuleAdvisory::EmptyActionValue);
    }

    match (&condition.value, condition.operator.is_numeric()) {
        (RuleValue::Range { min, max }, true) if min > max => {
            advisories.push(RuleAdvisory::InvertedRange {
                min: *min,
                max: *max,
            });
        }
        (RuleValue::Range { .. }, true) => {}
        (_, true) if condition.operator == tapestry_domain::ConditionOperator::InRange => {
            advisories.push(RuleAdvisory::MissingRange);
        }
        (RuleValue::Number(_), true) => {}
        (RuleValue::Text(t), true) if t.trim().parse::<f64>().is_ok() => {}
        (_, true) => advisories.push(RuleAdvisory::NonNumericOperand {
            operator: condition.operator.as_str().to_string(),
        }),
        (_, false) => {}
    }

    advisories
}
