use super::backend::StorageBackend;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, warn};

/// Typed, failure-absorbing view over a [`StorageBackend`].
///
/// Reads never fail: a missing key, a substrate error, or unparseable text
/// all come back as the empty default. Writes report success as a `bool`
/// and log the cause on failure.
pub struct PersistentStore<B: StorageBackend> {
    pub(crate) backend: B,
}

impl<B: StorageBackend> PersistentStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn read_raw(&self, key: &str) -> Option<String> {
        match self.backend.get(key) {
            Ok(raw) => raw,
            Err(e) => {
                error!(key, error = %e, "failed to read from storage");
                None
            }
        }
    }

    /// Read a whole value, falling back to `T::default()`.
    pub fn read<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let Some(raw) = self.read_raw(key) else {
            return T::default();
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "stored value is corrupt, using default");
                T::default()
            }
        }
    }

    /// Read a JSON array element by element.
    ///
    /// Elements that do not decode as `T` are dropped; anything that is not
    /// an array at all reads as empty.
    pub fn read_list<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let Some(raw) = self.read_raw(key) else {
            return Vec::new();
        };
        let items = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(items)) => items,
            Ok(Value::Null) => return Vec::new(),
            Ok(_) => {
                warn!(key, "stored value is not a list, using empty list");
                return Vec::new();
            }
            Err(e) => {
                warn!(key, error = %e, "stored list is corrupt, using empty list");
                return Vec::new();
            }
        };

        let total = items.len();
        let decoded: Vec<T> = items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect();
        if decoded.len() < total {
            warn!(
                key,
                discarded = total - decoded.len(),
                "discarded malformed entries from stored list"
            );
        }
        decoded
    }

    /// Serialize and store `value`. Returns `false` if it was not persisted.
    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        let encoded = match serde_json::to_string(value) {
            Ok(encoded) => encoded,
            Err(e) => {
                error!(key, error = %e, "failed to encode value for storage");
                return false;
            }
        };
        match self.backend.set(key, &encoded) {
            Ok(()) => true,
            Err(e) => {
                error!(key, error = %e, "failed to write to storage");
                false
            }
        }
    }

    pub fn remove(&self, key: &str) {
        if let Err(e) = self.backend.remove(key) {
            error!(key, error = %e, "failed to remove from storage");
        }
    }
}
