//! Tapestry Backend
//!
//! In-memory implementation of the [`OrganizationBackend`] trait from
//! `tapestry-domain`.
//!
//! The real content analysis, storage and transport live outside this
//! workspace. `InMemoryBackend` stands in for them: it stores items,
//! relationships, rules, pathways and configuration, returns scripted
//! analysis results, and records every mutation the engine issues.
//!
//! It also provides the hooks the engine's tests rely on:
//! - per-operation call counting
//! - optional per-call latency and an in-flight high-water mark
//! - failure injection per operation or per item
//!
//! # Examples
//!
//! ```
//! use tapestry_backend::InMemoryBackend;
//! use tapestry_domain::{ContentItem, ItemType};
//! use tapestry_domain::traits::OrganizationBackend;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let backend = InMemoryBackend::new();
//! backend.add_item(ContentItem::new("doc-1", ItemType::Document).with_title("Star lore"));
//!
//! let item = backend.get_content_item(&"doc-1".into()).await.unwrap();
//! assert_eq!(item.title, "Star lore");
//! assert_eq!(backend.call_count("get_content_item"), 1);
//! # }
//! ```
//!
//! [`OrganizationBackend`]: tapestry_domain::traits::OrganizationBackend

#![warn(missing_docs)]

mod error;
mod fixture;
mod memory;

pub use error::BackendError;
pub use fixture::BackendFixture;
pub use memory::{InMemoryBackend, Mutation, SuggestionKind};
