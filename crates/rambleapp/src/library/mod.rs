//! # Local Library
//!
//! [`LibraryStore`] owns everything the user keeps between visits: the search
//! history, the favorites set, named collections and the theme preference.
//! It is the only writer to their storage keys.
//!
//! Each collection has its own rules:
//!
//! | Collection | Order | Uniqueness | Bound |
//! |------------|-------|------------|-------|
//! | History | most recent first | exact string | `history_limit` (default 10) |
//! | Favorites | insertion | image id | none |
//! | Collections | creation | collection id; image id within one collection | none |
//!
//! ## Read-Modify-Write
//!
//! The substrate only stores whole values, so every mutation loads the full
//! list, edits it and writes it back. Each list has its own mutex around that
//! cycle; with a thread-safe backend the store can be shared across threads
//! without breaking the uniqueness rules.
//!
//! Stored data is coerced on every load (see the per-collection modules), so
//! hand-edited or corrupt values heal on the next write.

mod collections;
mod favorites;
mod history;

use crate::model::Theme;
use crate::store::{PersistentStore, StorageBackend};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::warn;

pub const HISTORY_KEY: &str = "keywordHistory";
pub const FAVORITES_KEY: &str = "favorites";
pub const COLLECTIONS_KEY: &str = "collections";
pub const THEME_KEY: &str = "theme";

pub const DEFAULT_HISTORY_LIMIT: usize = 10;

pub struct LibraryStore<B: StorageBackend> {
    store: PersistentStore<B>,
    history_limit: usize,
    history_lock: Mutex<()>,
    favorites_lock: Mutex<()>,
    collections_lock: Mutex<()>,
}

impl<B: StorageBackend> LibraryStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            store: PersistentStore::with_backend(backend),
            history_limit: DEFAULT_HISTORY_LIMIT,
            history_lock: Mutex::new(()),
            favorites_lock: Mutex::new(()),
            collections_lock: Mutex::new(()),
        }
    }

    /// Cap for the history list. A limit of zero is treated as one.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit.max(1);
        self
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    pub fn store(&self) -> &PersistentStore<B> {
        &self.store
    }

    pub fn theme(&self) -> Theme {
        let raw: Option<String> = match self.store.backend.get(THEME_KEY) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "failed to read theme");
                None
            }
        };
        raw.and_then(|value| value.parse().ok()).unwrap_or_default()
    }

    pub fn set_theme(&self, theme: Theme) -> bool {
        self.store.write(THEME_KEY, &theme)
    }
}

fn lock(mutex: &Mutex<()>) -> MutexGuard<'_, ()> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
