//! Graph engine configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Cache lifetimes and traversal bounds for the relationship graph
///
/// # Examples
///
/// ```
/// use tapestry_graph::GraphConfig;
///
/// let config = GraphConfig::default();
/// assert_eq!(config.clamp_depth(Some(10)), 6);
/// assert_eq!(config.clamp_depth(None), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Lifetime of cached relationship lists (in seconds)
    /// Default: 300 (5 minutes)
    pub relationship_ttl_secs: u64,

    /// Lifetime of cached network analyses (in seconds)
    /// Default: 600 (10 minutes)
    pub network_ttl_secs: u64,

    /// Maximum entries per cache
    pub cache_capacity: usize,

    /// Hops explored when no depth is given
    pub default_depth: usize,

    /// Deepest traversal allowed; larger requests are clamped
    pub max_depth: usize,

    /// Candidates returned by similarity search when no limit is given
    pub similar_limit: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            relationship_ttl_secs: 300,
            network_ttl_secs: 600,
            cache_capacity: 1024,
            default_depth: 3,
            max_depth: 6,
            similar_limit: 10,
        }
    }
}

impl GraphConfig {
    /// Get relationship list TTL as Duration
    pub fn relationship_ttl(&self) -> Duration {
        Duration::from_secs(self.relationship_ttl_secs)
    }

    /// Get network TTL as Duration
    pub fn network_ttl(&self) -> Duration {
        Duration::from_secs(self.network_ttl_secs)
    }

    /// Depth to traverse for a request
    pub fn clamp_depth(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.default_depth).min(self.max_depth)
    }
}
