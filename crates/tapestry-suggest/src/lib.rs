//! Tapestry Suggest
//!
//! Turns raw backend suggestions into culturally annotated tag and category
//! proposals.
//!
//! - Tags from cultural analysis that name traditional knowledge are kept
//!   only when the material's sensitivity warrants it or the backend is very
//!   confident
//! - Categories get a cultural appropriateness score and an advisory
//!   community-validation flag
//! - Cultural context analysis never fails: it degrades to a public,
//!   educational default
//!
//! Sensitivity is informational. Nothing here hides or withholds content.

#![warn(missing_docs)]

mod engine;
mod error;
mod filter;

pub use engine::SuggestionEngine;
pub use error::SuggestError;
pub use filter::{
    annotate_categories, annotate_category, filter_tag_suggestions, finalize_cultural_context,
    mark_traditional_knowledge, resolve_sensitivity, CULTURAL_CONTEXT_UNAVAILABLE,
    DEFAULT_EDUCATIONAL_CONTEXT, TRADITIONAL_KNOWLEDGE_NOTE,
};
