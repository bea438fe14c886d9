//! Tapestry Orchestrator
//!
//! Single entry point for content organization: analysis, automatic
//! organization, settings, rules, batch processing and the relationship
//! graph.
//!
//! # Overview
//!
//! The orchestrator is responsible for:
//! - **Analysis**: backend analysis enhanced with traditional-knowledge flags,
//!   category appropriateness, rule matches and an overall confidence
//! - **Caching**: analyses (10 minutes) and settings (5 minutes) behind TTL
//!   caches with a capacity bound
//! - **Organization**: applying tags, categories, cultural context and rule
//!   actions that clear the configured thresholds
//! - **Batching**: chunked, concurrent analysis and organization with
//!   per-item failure isolation
//! - **Lifecycle**: per-item state from `unanalyzed` to `organized`
//! - **Metrics**: cache effectiveness, throughput and failures
//!
//! Cultural sensitivity is informational throughout. Nothing here filters,
//! hides or refuses content because of it.
//!
//! ## Item Lifecycle
//!
//! | State | Entered by | Left by |
//! |-------|------------|---------|
//! | **Unanalyzed** | First sight of the item | `analyze_item` |
//! | **Analyzing** | Backend analysis started | Success or failure |
//! | **Analyzed** | Analysis stored, or failed organization | `apply_auto_organization` |
//! | **Organizing** | Mutations started | Success or failure |
//! | **Organized** | All mutations applied | Re-analysis |
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use tapestry_backend::InMemoryBackend;
//! use tapestry_domain::{ContentItem, ItemId, ItemType, TagSource, TagSuggestion};
//! use tapestry_orchestrator::{Orchestrator, OrchestratorConfig};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let backend = Arc::new(InMemoryBackend::new());
//! for id in ["a", "b", "c"] {
//!     backend.add_item(ContentItem::new(id, ItemType::Document));
//!     backend.script_tag_suggestions(
//!         id,
//!         vec![TagSuggestion::new("weaving", 0.9, "Mentioned often", TagSource::ContentAnalysis)],
//!     );
//! }
//!
//! let orchestrator = Orchestrator::new(backend.clone(), OrchestratorConfig::default());
//! let ids: Vec<ItemId> = ["a", "b", "c"].into_iter().map(ItemId::new).collect();
//!
//! let analyses = orchestrator.batch_analyze(&ids, ItemType::Document).await;
//! let outcomes = orchestrator
//!     .batch_apply_organization(analyses.succeeded().cloned().collect())
//!     .await;
//!
//! assert_eq!(outcomes.failure_count(), 0);
//! assert!(backend.item(&"a".into()).unwrap().tags.contains(&"weaving".to_string()));
//! println!("{}", orchestrator.metrics().summary());
//! # }
//! ```
//!
//! # Configuration
//!
//! The orchestrator can be configured via TOML; every key is optional:
//!
//! ```toml
//! analysis_ttl_secs = 600
//! config_ttl_secs = 300
//! cache_capacity = 1024
//! analyze_chunk_size = 10
//! apply_chunk_size = 5
//! inter_chunk_delay_ms = 100
//!
//! [graph]
//! relationship_ttl_secs = 300
//! network_ttl_secs = 600
//! default_depth = 3
//! max_depth = 6
//!
//! [rules]
//! auto_execute_threshold = 0.7
//! ```

#![warn(missing_docs)]

mod batch;
mod config;
mod error;
mod metrics;
mod orchestrator;
mod organize;
mod passthrough;
mod state;

pub use batch::{BatchItem, BatchReport};
pub use config::{ConfigError, OrchestratorConfig};
pub use error::OrchestratorError;
pub use metrics::OrchestratorMetrics;
pub use orchestrator::Orchestrator;
pub use organize::OrganizationOutcome;
pub use state::{ItemState, ItemStatus};
