//! Chunked batch processing
//!
//! Items within a chunk run concurrently; a chunk starts only after the
//! previous one has fully settled. A failing item is recorded in the report
//! and never aborts its siblings.

use crate::{Orchestrator, OrchestratorError, OrganizationOutcome};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tapestry_domain::traits::OrganizationBackend;
use tapestry_domain::{ItemId, ItemType, OrganizationAnalysis};
use tracing::{debug, info};

/// Result for one item of a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItem<T> {
    /// Processed item
    pub item_id: ItemId,

    /// Result, when the item succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<T>,

    /// Error message, when the item failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Per-item results of a batch, in submission order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport<T> {
    /// Size of each chunk, in processing order
    pub chunk_sizes: Vec<usize>,

    /// One entry per submitted item
    pub items: Vec<BatchItem<T>>,
}

impl<T> BatchReport<T> {
    fn new() -> Self {
        Self {
            chunk_sizes: Vec::new(),
            items: Vec::new(),
        }
    }

    fn record(&mut self, item_id: ItemId, result: Result<T, OrchestratorError>) {
        let (value, error) = match result {
            Ok(value) => (Some(value), None),
            Err(e) => (None, Some(e.to_string())),
        };
        self.items.push(BatchItem {
            item_id,
            value,
            error,
        });
    }

    /// Successful results
    pub fn succeeded(&self) -> impl Iterator<Item = &T> {
        self.items.iter().filter_map(|i| i.value.as_ref())
    }

    /// Items that failed, with their error messages
    pub fn failed(&self) -> impl Iterator<Item = (&ItemId, &str)> {
        self.items
            .iter()
            .filter_map(|i| i.error.as_deref().map(|e| (&i.item_id, e)))
    }

    /// Number of failed items
    pub fn failure_count(&self) -> usize {
        self.failed().count()
    }
}

impl<B> Orchestrator<B>
where
    B: OrganizationBackend,
{
    /// Analyze many items in chunks
    ///
    /// Chunks hold `analyze_chunk_size` items; cached analyses are reused.
    pub async fn batch_analyze(
        &self,
        item_ids: &[ItemId],
        item_type: ItemType,
    ) -> BatchReport<OrganizationAnalysis> {
        let mut report = BatchReport::new();

        for chunk in item_ids.chunks(self.config.analyze_chunk_size.max(1)) {
            debug!("Analyzing chunk of {} {}s", chunk.len(), item_type);
            let results = join_all(chunk.iter().map(|id| self.analyze_item(id, item_type))).await;
            report.chunk_sizes.push(chunk.len());
            for (item_id, result) in chunk.iter().zip(results) {
                report.record(item_id.clone(), result);
            }
        }

        self.metrics_mut().record_batch(item_ids.len());
        info!(
            "Batch analysis finished: {} items in {} chunks, {} failed",
            item_ids.len(),
            report.chunk_sizes.len(),
            report.failure_count()
        );
        report
    }

    /// Apply organization for many analyses in chunks
    ///
    /// Chunks hold `apply_chunk_size` items and are separated by
    /// `inter_chunk_delay`; there is no pause after the last chunk.
    pub async fn batch_apply_organization(
        &self,
        analyses: Vec<OrganizationAnalysis>,
    ) -> BatchReport<OrganizationOutcome> {
        let mut report = BatchReport::new();
        let chunk_size = self.config.apply_chunk_size.max(1);
        let chunk_count = analyses.len().div_ceil(chunk_size);

        for (index, chunk) in analyses.chunks(chunk_size).enumerate() {
            debug!("Organizing chunk {} of {}", index + 1, chunk_count);
            let results = join_all(chunk.iter().map(|analysis| {
                self.apply_auto_organization(
                    &analysis.item_id,
                    analysis.item_type,
                    Some(analysis.clone()),
                )
            }))
            .await;
            report.chunk_sizes.push(chunk.len());
            for (analysis, result) in chunk.iter().zip(results) {
                report.record(analysis.item_id.clone(), result);
            }

            if index + 1 < chunk_count {
                tokio::time::sleep(self.config.inter_chunk_delay()).await;
            }
        }

        self.metrics_mut().record_batch(analyses.len());
        info!(
            "Batch organization finished: {} items in {} chunks, {} failed",
            analyses.len(),
            report.chunk_sizes.len(),
            report.failure_count()
        );
        report
    }
}
