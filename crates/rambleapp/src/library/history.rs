//! Search history: most-recent-first, exact-match unique, bounded.

use super::{lock, LibraryStore, HISTORY_KEY};
use crate::store::StorageBackend;
use std::collections::HashSet;

impl<B: StorageBackend> LibraryStore<B> {
    /// Stored history, coerced: duplicates dropped (first wins) and truncated
    /// to the limit.
    pub fn history(&self) -> Vec<String> {
        let mut entries: Vec<String> = self.store.read_list(HISTORY_KEY);
        let mut seen = HashSet::new();
        entries.retain(|q| seen.insert(q.clone()));
        entries.truncate(self.history_limit);
        entries
    }

    /// The first `limit` entries, as shown in the recent-search chips.
    pub fn recent_searches(&self, limit: usize) -> Vec<String> {
        let mut entries = self.history();
        entries.truncate(limit);
        entries
    }

    /// Move `query` (trimmed) to the front of the history.
    /// Queries that trim to nothing are ignored.
    pub fn record_search(&self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }
        let _guard = lock(&self.history_lock);
        let mut entries = self.history();
        entries.retain(|q| q != query);
        entries.insert(0, query.to_string());
        entries.truncate(self.history_limit);
        self.store.write(HISTORY_KEY, &entries);
    }

    pub fn delete_history_entry(&self, query: &str) {
        let _guard = lock(&self.history_lock);
        let mut entries = self.history();
        let before = entries.len();
        entries.retain(|q| q != query);
        if entries.len() != before {
            self.store.write(HISTORY_KEY, &entries);
        }
    }

    pub fn clear_history(&self) {
        let _guard = lock(&self.history_lock);
        self.store.remove(HISTORY_KEY);
    }
}
