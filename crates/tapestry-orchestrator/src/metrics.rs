//! Metrics collection for orchestrator operations

use std::collections::HashMap;
use tapestry_domain::ItemType;

/// Counters collected by an orchestrator
///
/// Tracks cache effectiveness, analyses and organizations per item type,
/// failures, and batch runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrchestratorMetrics {
    /// Analysis cache hits
    pub cache_hits: usize,

    /// Analysis cache misses
    pub cache_misses: usize,

    /// Completed analyses per item type
    pub analyses: HashMap<ItemType, usize>,

    /// Completed organizations per item type
    pub organizations: HashMap<ItemType, usize>,

    /// Failed analyses
    pub analysis_failures: usize,

    /// Failed organizations
    pub organization_failures: usize,

    /// Batch runs completed
    pub batch_count: usize,

    /// Items submitted across all batches
    pub batch_items: usize,
}

impl OrchestratorMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an analysis served from cache
    pub fn record_cache_hit(&mut self) {
        self.cache_hits += 1;
    }

    /// Record an analysis that had to go to the backend
    pub fn record_cache_miss(&mut self) {
        self.cache_misses += 1;
    }

    /// Record a completed analysis
    pub fn record_analysis(&mut self, item_type: ItemType) {
        *self.analyses.entry(item_type).or_insert(0) += 1;
    }

    /// Record a failed analysis
    pub fn record_analysis_failure(&mut self) {
        self.analysis_failures += 1;
    }

    /// Record a completed organization
    pub fn record_organization(&mut self, item_type: ItemType) {
        *self.organizations.entry(item_type).or_insert(0) += 1;
    }

    /// Record a failed organization
    pub fn record_organization_failure(&mut self) {
        self.organization_failures += 1;
    }

    /// Record a finished batch of `items` items
    pub fn record_batch(&mut self, items: usize) {
        self.batch_count += 1;
        self.batch_items += items;
    }

    /// Get total analyses across all item types
    pub fn total_analyses(&self) -> usize {
        self.analyses.values().sum()
    }

    /// Get total organizations across all item types
    pub fn total_organizations(&self) -> usize {
        self.organizations.values().sum()
    }

    /// Get total failures of any kind
    pub fn total_failures(&self) -> usize {
        self.analysis_failures + self.organization_failures
    }

    /// Fraction of analysis lookups served from cache
    pub fn cache_hit_rate(&self) -> f64 {
        let lookups = self.cache_hits + self.cache_misses;
        if lookups == 0 {
            0.0
        } else {
            self.cache_hits as f64 / lookups as f64
        }
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Orchestrator Metrics Summary".to_string(),
            "============================".to_string(),
            format!(
                "Cache: {} hits, {} misses ({:.0}% hit rate)",
                self.cache_hits,
                self.cache_misses,
                self.cache_hit_rate() * 100.0
            ),
            format!("Batches: {} ({} items)", self.batch_count, self.batch_items),
            String::new(),
        ];

        if !self.analyses.is_empty() {
            lines.push("Analyses by item type:".to_string());
            let mut types: Vec<_> = self.analyses.iter().collect();
            types.sort();
            for (item_type, count) in types {
                lines.push(format!("  {}: {}", item_type, count));
            }
            lines.push(format!("  Total: {}", self.total_analyses()));
            lines.push(String::new());
        }

        if !self.organizations.is_empty() {
            lines.push("Organizations by item type:".to_string());
            let mut types: Vec<_> = self.organizations.iter().collect();
            types.sort();
            for (item_type, count) in types {
                lines.push(format!("  {}: {}", item_type, count));
            }
            lines.push(format!("  Total: {}", self.total_organizations()));
            lines.push(String::new());
        }

        lines.push(format!(
            "Failures: {} analysis, {} organization",
            self.analysis_failures, self.organization_failures
        ));

        lines.join("\n")
    }
}
