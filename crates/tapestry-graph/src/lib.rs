//! Tapestry Graph
//!
//! Typed relationships between content items and the analyses built on them.
//!
//! The graph engine provides:
//! - Relationship validation (self-links rejected, guarded material flagged for
//!   community approval, cross-cultural variants rewarded) and creation with a
//!   derived strength
//! - Filtering of backend relationship candidates
//! - Bounded breadth-first network analysis with cultural clusters and
//!   statistics
//! - Educational pathways ordered by learning stage
//!
//! Relationship lists and network analyses are cached with a time-to-live;
//! writes invalidate the cached entries of both endpoints and every cached
//! network that reached either of them.

#![warn(missing_docs)]

mod config;
mod error;
mod filter;
mod graph;
mod network;
mod pathway;

pub use config::GraphConfig;
pub use error::GraphError;
pub use filter::filter_relationship_suggestions;
pub use graph::RelationshipGraph;
pub use pathway::LearningStage;
