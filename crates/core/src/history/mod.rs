//! Bounded, most-recent-first history of completed runs.
//!
//! History is volatile: it lives in the owning session and is gone when the
//! session is torn down.

use crate::engine::template::extract_client_name;
use chrono::Utc;
use sk_protocol::result_models::{HistoryItem, ProcessingResult};
use std::collections::VecDeque;
use uuid::Uuid;

/// Maximum number of items a store keeps unless configured otherwise.
pub const HISTORY_CAPACITY: usize = 50;

/// FIFO-by-insertion bounded cache of history items.
///
/// Reading an item never changes its position.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    items: VecDeque<HistoryItem>,
    capacity: usize,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    /// A store holding at most `capacity` items (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Prepend `item`, evicting the oldest item once over capacity.
    ///
    /// Returns the evicted item, if any.
    pub fn insert_front(&mut self, item: HistoryItem) -> Option<HistoryItem> {
        self.items.push_front(item);
        if self.items.len() > self.capacity {
            self.items.pop_back()
        } else {
            None
        }
    }

    /// All items, most recent first.
    pub fn all(&self) -> Vec<HistoryItem> {
        self.items.iter().cloned().collect()
    }

    /// The `n` most recent items.
    pub fn recent(&self, n: usize) -> Vec<HistoryItem> {
        self.items.iter().take(n).cloned().collect()
    }

    pub fn by_id(&self, id: Uuid) -> Option<&HistoryItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn front(&self) -> Option<&HistoryItem> {
        self.items.front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every item. Only for session teardown.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Build the history item for a successful run of `filename`.
pub fn item_from_result(filename: impl Into<String>, result: ProcessingResult) -> HistoryItem {
    HistoryItem {
        id: Uuid::new_v4(),
        timestamp: Utc::now(),
        filename: filename.into(),
        client_name: extract_client_name(&result.final_summary),
        summary: result.final_summary.clone(),
        full_result: result,
    }
}
