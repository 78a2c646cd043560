//! # rambleapp Architecture
//!
//! rambleapp is the **engine behind a mood-driven image browser**: the user
//! describes a feeling, the engine turns it into image search keywords, pages
//! through results for infinite scroll, and keeps favorites, collections and
//! search history on the device. There is no backend and no UI in here; any
//! front end drives it through [`api::RambleApi`].
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade wiring resolve → record → search             │
//! │  - Surfaces only validation errors                          │
//! └─────────────────────────────────────────────────────────────┘
//!            │                    │                    │
//!            ▼                    ▼                    ▼
//! ┌──────────────────┐ ┌──────────────────┐ ┌──────────────────┐
//! │ keywords.rs      │ │ search/          │ │ library/         │
//! │ best-effort      │ │ paginated,       │ │ history,         │
//! │ keyword rewrite  │ │ epoch-cancelled  │ │ favorites,       │
//! │                  │ │ session          │ │ collections      │
//! └──────────────────┘ └──────────────────┘ └──────────────────┘
//!            │                    │                    │
//!            ▼                    ▼                    ▼
//! ┌──────────────────────────────────────┐ ┌──────────────────┐
//! │ providers/ (HTTP: chat model,        │ │ store/           │
//! │ photo search) behind traits          │ │ key-value        │
//! └──────────────────────────────────────┘ └──────────────────┘
//! ```
//!
//! ## Key Principle: Nothing Here Is Fatal
//!
//! - Corrupt or unreadable stored data reads as empty.
//! - A failed keyword rewrite searches the raw input instead.
//! - A failed page fetch parks the session in `Errored` until retried.
//! - Only explicit user mistakes (blank collection name, unknown collection,
//!   blank query) come back as [`error::ValidationError`].
//!
//! ## Logging
//!
//! The crate logs through `tracing` and never installs a subscriber; that is
//! the embedding application's call.
//!
//! ## Module Overview
//!
//! - [`api`]: The facade, entry point for the UI
//! - [`search`]: Search session state machine and async driver
//! - [`keywords`]: Keyword rewriting and cleaning
//! - [`library`]: History, favorites, collections, theme
//! - [`store`]: Storage substrate and typed adapter
//! - [`providers`]: HTTP clients for the search and rewrite services
//! - [`model`]: Core data types (`Image`, `Collection`, `Theme`)
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod config;
pub mod error;
pub mod keywords;
pub mod library;
pub mod model;
pub mod providers;
pub mod search;
pub mod store;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
