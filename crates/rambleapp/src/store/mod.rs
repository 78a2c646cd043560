//! # Storage Layer
//!
//! The engine persists everything through a plain key-value substrate: whole
//! JSON values stored and fetched by string key, nothing more. There is no
//! atomicity across keys and no partial update of a value.
//!
//! ## Two Layers
//!
//! 1. **Substrate** ([`backend::StorageBackend`]): raw `get`/`set`/`remove` of
//!    strings. Errors are real errors here.
//! 2. **Adapter** ([`persistent::PersistentStore`]): typed reads and writes on
//!    top of a backend. This is where failures stop: a read that fails or finds
//!    garbage returns the empty default, a write that fails is logged and
//!    reported as `false`.
//!
//! Corrupt local state must never take the app down, so nothing above the
//! adapter ever sees a storage error.
//!
//! ## Keys
//!
//! | Key | Value |
//! |-----|-------|
//! | `keywordHistory` | `["latest query", "older query", ...]` |
//! | `favorites` | `[Image, ...]` |
//! | `collections` | `[Collection, ...]` |
//! | `theme` | `"light"` or `"dark"` |
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: one `<key>.json` file per key under a root
//!   directory, written atomically.
//! - [`mem_backend::MemBackend`]: in-memory map for tests and ephemeral hosts.

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;
pub mod persistent;

pub use backend::StorageBackend;
pub use persistent::PersistentStore;
