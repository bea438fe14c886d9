//! Tapestry Cache
//!
//! Time-to-live caches shared by the graph engine and the orchestrator.
//!
//! Entries are `(value, stored_at)` pairs, valid while `now - stored_at < ttl`.
//! Each cache also carries a capacity bound: inserting into a full cache first
//! drops expired entries, then evicts the oldest-stored entry.
//!
//! Time comes from a [`Clock`], so tests can drive expiry with a
//! [`ManualClock`] instead of sleeping.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tapestry_cache::{ManualClock, TtlCache};
//!
//! let clock = Arc::new(ManualClock::new());
//! let cache = TtlCache::new(Duration::from_secs(60), 16, clock.clone());
//!
//! cache.insert("item-1", 42);
//! assert_eq!(cache.get(&"item-1"), Some(42));
//!
//! clock.advance(Duration::from_secs(61));
//! assert_eq!(cache.get(&"item-1"), None);
//! ```

#![warn(missing_docs)]

mod clock;
mod ttl;

pub use clock::{Clock, ManualClock, SystemClock};
pub use ttl::TtlCache;
