//! Tapestry Rules
//!
//! Evaluates declarative organization rules against content items.
//!
//! The rule engine provides:
//! - Condition matching (equals, contains, starts_with, greater_than,
//!   less_than, in_range) with case-insensitive text and any-element list
//!   semantics
//! - Priority ordering (stable: equal priorities keep their given order)
//! - Operator-derived action confidence and the auto-execution cutoff
//! - Local validation of rules before they are persisted
//! - Advisory review of rules that are valid but likely mistaken
//!
//! The engine is pure: it never talks to the backend.
//!
//! # Examples
//!
//! ```
//! use tapestry_domain::{
//!     ConditionOperator, ContentItem, ItemType, OrganizationRule, RuleAction, RuleCondition,
//!     RuleValue,
//! };
//! use tapestry_rules::RuleEngine;
//!
//! let engine = RuleEngine::default_config();
//! let rule = OrganizationRule::new(
//!     "stars",
//!     RuleCondition {
//!         field: "title".into(),
//!         operator: ConditionOperator::Contains,
//!         value: RuleValue::Text("star".into()),
//!     },
//!     RuleAction::AddTag("astronomy".into()),
//! );
//! let item = ContentItem::new("doc-1", ItemType::Document).with_title("Star Compass");
//!
//! let matches = engine.apply_organization_rules(&item, &[rule]);
//! assert_eq!(matches.len(), 1);
//! assert_eq!(matches[0].actions[0].confidence, 0.8);
//! ```

#![warn(missing_docs)]

mod config;
mod engine;
mod error;
mod review;

pub use config::RuleEngineConfig;
pub use engine::RuleEngine;
pub use error::RuleError;
pub use review::RuleAdvisory;
