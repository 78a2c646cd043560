//! # Configuration
//!
//! Settings are managed by [`confique`], which handles layered loading from
//! environment variables, an optional TOML file, and compiled defaults.
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `RAMBLE_PAGE_SIZE`, `RAMBLE_SEARCH_ACCESS_KEY`, etc.
//! 2. **Config file**: `ramble.toml` passed to [`RambleConfig::load`].
//! 3. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `history_limit` | `10` | Maximum search history entries kept |
//! | `page_size` | `20` | Images requested per page |
//! | `request_timeout_secs` | `15` | Timeout for provider HTTP calls |
//! | `data_dir` | platform data dir | Where the library files live |
//! | `search_base_url` | `https://api.unsplash.com` | Image search endpoint |
//! | `search_access_key` | unset | Image search access key (required to search) |
//! | `rewrite_base_url` | `https://openrouter.ai/api/v1` | Keyword rewrite endpoint |
//! | `rewrite_api_key` | unset | Enables keyword rewriting when set |
//! | `rewrite_model` | `openai/gpt-3.5-turbo` | Chat model used for rewriting |

use crate::error::Result;
use crate::providers::openrouter::{DEFAULT_MODEL, DEFAULT_REFERER, DEFAULT_TITLE};
use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RambleConfig {
    /// Maximum number of search history entries kept
    #[config(default = 10, env = "RAMBLE_HISTORY_LIMIT")]
    pub history_limit: usize,

    /// Number of images requested per page
    #[config(default = 20, env = "RAMBLE_PAGE_SIZE")]
    pub page_size: u32,

    /// Timeout applied to every provider request
    #[config(default = 15, env = "RAMBLE_REQUEST_TIMEOUT_SECS")]
    pub request_timeout_secs: u64,

    /// Directory holding the library files. Defaults to the platform data dir.
    #[config(env = "RAMBLE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[config(default = "https://api.unsplash.com", env = "RAMBLE_SEARCH_BASE_URL")]
    pub search_base_url: String,

    #[config(env = "RAMBLE_SEARCH_ACCESS_KEY")]
    pub search_access_key: Option<String>,

    #[config(default = "https://openrouter.ai/api/v1", env = "RAMBLE_REWRITE_BASE_URL")]
    pub rewrite_base_url: String,

    /// Keyword rewriting is skipped entirely when this is unset
    #[config(env = "RAMBLE_REWRITE_API_KEY")]
    pub rewrite_api_key: Option<String>,

    #[config(default = "openai/gpt-3.5-turbo", env = "RAMBLE_REWRITE_MODEL")]
    pub rewrite_model: String,

    #[config(default = "http://localhost:5173", env = "RAMBLE_REWRITE_REFERER")]
    pub rewrite_referer: String,

    #[config(default = "Visual Ramble Keyword Enhancer", env = "RAMBLE_REWRITE_TITLE")]
    pub rewrite_title: String,
}

impl Default for RambleConfig {
    fn default() -> Self {
        Self {
            history_limit: 10,
            page_size: 20,
            request_timeout_secs: 15,
            data_dir: None,
            search_base_url: "https://api.unsplash.com".to_string(),
            search_access_key: None,
            rewrite_base_url: "https://openrouter.ai/api/v1".to_string(),
            rewrite_api_key: None,
            rewrite_model: DEFAULT_MODEL.to_string(),
            rewrite_referer: DEFAULT_REFERER.to_string(),
            rewrite_title: DEFAULT_TITLE.to_string(),
        }
    }
}

impl RambleConfig {
    /// Load from the environment, then `file` (if given and present), then defaults.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(path) = file {
            builder = builder.file(path);
        }
        Ok(builder.load()?)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Page size, never zero.
    pub fn page_size(&self) -> u32 {
        self.page_size.max(1)
    }

    /// The configured data dir, or the platform one.
    pub fn data_dir(&self) -> Option<PathBuf> {
        self.data_dir.clone().or_else(|| {
            ProjectDirs::from("", "", "ramble").map(|dirs| dirs.data_dir().to_path_buf())
        })
    }
}
