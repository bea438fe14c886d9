//! Per-item organization lifecycle

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tapestry_domain::{ItemId, ItemType};

/// Where an item is in the analyze → organize lifecycle
///
/// ```text
/// Unanalyzed → Analyzing → Analyzed → Organizing → Organized
/// ```
///
/// A failed analysis returns the item to the state it was in before; a
/// failed organization returns it to `Analyzed`. Re-analysis is allowed from
/// any state. Organizing with a caller-supplied analysis records an
/// unanalyzed item as `Analyzed` before it enters `Organizing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemState {
    /// Never analyzed by this orchestrator
    #[default]
    Unanalyzed,
    /// Analysis in progress
    Analyzing,
    /// Analysis available
    Analyzed,
    /// Organization in progress
    Organizing,
    /// Organization applied
    Organized,
}

/// Current state of an item and the error that last moved it backwards
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStatus {
    /// Lifecycle state
    pub state: ItemState,

    /// Message of the most recent failure, cleared by the next success
    pub last_error: Option<String>,
}

type StateKey = (ItemType, ItemId);

#[derive(Debug, Default)]
pub(crate) struct StateTracker {
    items: Mutex<HashMap<StateKey, ItemStatus>>,
}

impl StateTracker {
    fn items(&self) -> MutexGuard<'_, HashMap<StateKey, ItemStatus>> {
        self.items.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set(&self, key: &StateKey, state: ItemState, last_error: Option<String>) {
        self.items().insert(key.clone(), ItemStatus { state, last_error });
    }

    pub fn status(&self, key: &StateKey) -> ItemStatus {
        self.items().get(key).cloned().unwrap_or_default()
    }

    /// Enter `Analyzing`, returning the state to fall back to on failure
    pub fn begin_analysis(&self, key: &StateKey) -> ItemState {
        let mut items = self.items();
        let entry = items.entry(key.clone()).or_default();
        std::mem::replace(&mut entry.state, ItemState::Analyzing)
    }

    pub fn analysis_succeeded(&self, key: &StateKey) {
        self.set(key, ItemState::Analyzed, None);
    }

    pub fn analysis_failed(&self, key: &StateKey, previous: ItemState, error: String) {
        // An interrupted analysis never counts as a resting state
        let state = match previous {
            ItemState::Analyzing => ItemState::Unanalyzed,
            ItemState::Organizing => ItemState::Analyzed,
            other => other,
        };
        self.set(key, state, Some(error));
    }

    /// Treat a caller-supplied analysis as a completed one
    pub fn analysis_supplied(&self, key: &StateKey) {
        let mut items = self.items();
        let entry = items.entry(key.clone()).or_default();
        if entry.state == ItemState::Unanalyzed {
            entry.state = ItemState::Analyzed;
        }
    }

    pub fn begin_organizing(&self, key: &StateKey) {
        let mut items = self.items();
        items.entry(key.clone()).or_default().state = ItemState::Organizing;
    }

    pub fn organizing_succeeded(&self, key: &StateKey) {
        self.set(key, ItemState::Organized, None);
    }

    pub fn organizing_failed(&self, key: &StateKey, error: String) {
        self.set(key, ItemState::Analyzed, Some(error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(id: &str) -> StateKey {
        (ItemType::Document, ItemId::new(id))
    }

    #[test]
    fn test_unknown_item_is_unanalyzed() {
        let tracker = StateTracker::default();
        assert_eq!(tracker.status(&key("a")), ItemStatus::default());
        assert_eq!(tracker.status(&key("a")).state, ItemState::Unanalyzed);
    }

    #[test]
    fn test_happy_path() {
        let tracker = StateTracker::default();
        let k = key("a");

        tracker.begin_analysis(&k);
        assert_eq!(tracker.status(&k).state, ItemState::Analyzing);
        tracker.analysis_succeeded(&k);
        tracker.begin_organizing(&k);
        assert_eq!(tracker.status(&k).state, ItemState::Organizing);
        tracker.organizing_succeeded(&k);

        assert_eq!(tracker.status(&k).state, ItemState::Organized);
        assert!(tracker.status(&k).last_error.is_none());
    }

    #[test]
    fn test_failed_reanalysis_returns_to_previous_state() {
        let tracker = StateTracker::default();
        let k = key("a");
        tracker.begin_analysis(&k);
        tracker.analysis_succeeded(&k);
        tracker.begin_organizing(&k);
        tracker.organizing_succeeded(&k);

        let previous = tracker.begin_analysis(&k);
        tracker.analysis_failed(&k, previous, "Unable to analyze item for organization".into());

        let status = tracker.status(&k);
        assert_eq!(status.state, ItemState::Organized);
        assert_eq!(
            status.last_error.as_deref(),
            Some("Unable to analyze item for organization")
        );
    }

    #[test]
    fn test_failed_organization_returns_to_analyzed() {
        let tracker = StateTracker::default();
        let k = key("a");
        tracker.begin_analysis(&k);
        tracker.analysis_succeeded(&k);
        tracker.begin_organizing(&k);
        tracker.organizing_failed(&k, "Unable to apply tags".into());

        let status = tracker.status(&k);
        assert_eq!(status.state, ItemState::Analyzed);
        assert!(status.last_error.is_some());

        tracker.begin_organizing(&k);
        tracker.organizing_succeeded(&k);
        assert!(tracker.status(&k).last_error.is_none());
    }

    #[test]
    fn test_supplied_analysis_marks_unanalyzed_item() {
        let tracker = StateTracker::default();
        let k = key("a");

        tracker.analysis_supplied(&k);
        assert_eq!(tracker.status(&k).state, ItemState::Analyzed);

        tracker.begin_organizing(&k);
        tracker.organizing_succeeded(&k);
        tracker.analysis_supplied(&k);
        assert_eq!(tracker.status(&k).state, ItemState::Organized);
    }

    #[test]
    fn test_overlapping_analysis_failure_settles() {
        let tracker = StateTracker::default();
        let k = key("a");
        tracker.begin_analysis(&k);
        let previous = tracker.begin_analysis(&k);
        tracker.analysis_failed(&k, previous, "boom".into());

        assert_eq!(tracker.status(&k).state, ItemState::Unanalyzed);
    }

    #[test]
    fn test_items_are_keyed_by_type() {
        let tracker = StateTracker::default();
        let document = (ItemType::Document, ItemId::new("x"));
        let collection = (ItemType::Collection, ItemId::new("x"));

        tracker.begin_analysis(&document);
        tracker.analysis_succeeded(&document);

        assert_eq!(tracker.status(&document).state, ItemState::Analyzed);
        assert_eq!(tracker.status(&collection).state, ItemState::Unanalyzed);
    }
}
