//! Organization rules - declarative condition → action pairs

use crate::ItemId;
use serde::{Deserialize, Serialize};

/// Comparison applied by a rule condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    /// Exact (case-insensitive) match
    Equals,
    /// Substring or list membership
    Contains,
    /// Prefix match
    StartsWith,
    /// Numeric greater-than
    GreaterThan,
    /// Numeric less-than
    LessThan,
    /// Inclusive numeric range
    InRange,
}

impl ConditionOperator {
    /// Get the operator name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionOperator::Equals => "equals",
            ConditionOperator::Contains => "contains",
            ConditionOperator::StartsWith => "starts_with",
            ConditionOperator::GreaterThan => "greater_than",
            ConditionOperator::LessThan => "less_than",
            ConditionOperator::InRange => "in_range",
        }
    }

    /// Whether the operator compares numbers
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ConditionOperator::GreaterThan | ConditionOperator::LessThan | ConditionOperator::InRange
        )
    }
}

/// Right-hand side of a rule condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    /// Numeric operand
    Number(f64),
    /// Text operand
    Text(String),
    /// Inclusive range operand
    Range {
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },
    /// Any-of operand
    List(Vec<String>),
}

/// Condition evaluated against one item field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleCondition {
    /// Field name (see `ContentItem::field`)
    pub field: String,

    /// Comparison operator
    pub operator: ConditionOperator,

    /// Operand
    pub value: RuleValue,
}

/// Action a rule performs on match
///
/// Dispatch over this enum is exhaustive everywhere it is executed, so adding
/// a variant fails compilation until every executor handles it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum RuleAction {
    /// Add a tag to the item
    AddTag(String),
    /// Set a category on the item
    SetCategory(String),
    /// Move the item into a collection
    MoveToCollection(String),
    /// Attach an educational cultural-context note
    SetCulturalContext(String),
    /// Ask the community to review the item
    RequestValidation(String),
}

impl RuleAction {
    /// Get the action type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            RuleAction::AddTag(_) => "add_tag",
            RuleAction::SetCategory(_) => "set_category",
            RuleAction::MoveToCollection(_) => "move_to_collection",
            RuleAction::SetCulturalContext(_) => "set_cultural_context",
            RuleAction::RequestValidation(_) => "request_validation",
        }
    }

    /// The action's payload
    pub fn value(&self) -> &str {
        match self {
            RuleAction::AddTag(v)
            | RuleAction::SetCategory(v)
            | RuleAction::MoveToCollection(v)
            | RuleAction::SetCulturalContext(v)
            | RuleAction::RequestValidation(v) => v,
        }
    }
}

/// A declarative organization rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationRule {
    /// Rule identifier
    pub id: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Collection the rule is scoped to (None = global)
    #[serde(default)]
    pub collection_id: Option<ItemId>,

    /// Condition to evaluate
    pub condition: RuleCondition,

    /// Action to perform on match
    pub action: RuleAction,

    /// Disabled rules are never evaluated
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Higher priority rules are evaluated first
    #[serde(default)]
    pub priority: i32,
}

fn default_enabled() -> bool {
    true
}

impl OrganizationRule {
    /// Create an enabled rule with priority 0
    pub fn new(id: impl Into<String>, condition: RuleCondition, action: RuleAction) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            collection_id: None,
            condition,
            action,
            enabled: true,
            priority: 0,
        }
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Disable the rule
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// An action produced by a matching rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationAction {
    /// The action to perform
    pub action: RuleAction,

    /// Confidence in [0.0, 1.0]
    pub confidence: f64,

    /// Rule that produced the action
    pub rule_id: String,
}

/// Confidence above which a rule action may be executed without review
pub const AUTO_EXECUTE_THRESHOLD: f64 = 0.7;

impl OrganizationAction {
    /// Whether the orchestrator may execute this action automatically
    pub fn auto_executable(&self) -> bool {
        self.confidence > AUTO_EXECUTE_THRESHOLD
    }
}

/// A rule that matched an item, with the actions it produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleMatch {
    /// Matching rule
    pub rule_id: String,

    /// Matching rule's name
    pub rule_name: String,

    /// Matching rule's priority
    pub priority: i32,

    /// Produced actions
    pub actions: Vec<OrganizationAction>,
}
