use crate::error::Result;

/// Abstract interface for the raw key-value substrate.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while PersistentStore handles decoding and failure absorption.
pub trait StorageBackend {
    /// Read the raw value stored under `key`.
    /// Returns Ok(None) if nothing is stored there.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the whole value stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}
