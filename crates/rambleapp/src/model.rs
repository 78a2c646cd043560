//! # Domain Model
//!
//! Core data types shared by the library store and the search session:
//! [`Image`], [`Collection`], and the [`Theme`] preference.
//!
//! ## Images Are Opaque
//!
//! Images come from the search provider and are never edited by the engine.
//! Identity is the provider's `id`; favorites and collections only ever test
//! membership by that id. A full copy of the image is stored alongside so the
//! library can render saved images without a network round trip.
//!
//! ## Collections
//!
//! ```text
//! Collection
//! ├── id          ms timestamp at creation, strictly increasing
//! ├── name        trimmed, never empty
//! ├── images      insertion order, unique by image id
//! └── createdAt   RFC 3339 timestamp
//! ```
//!
//! ## Stored Field Names
//!
//! Stored JSON uses camelCase (`altDescription`, `sourceLink`, `createdAt`).
//! The snake_case spellings found in raw provider objects and older saves
//! are accepted on read. A collection saved without a creation time gets the
//! Unix epoch rather than being dropped.
//!
//! The same image may live in any number of collections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type ImageId = String;
pub type CollectionId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrls {
    pub small: String,
    pub regular: String,
    pub full: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: ImageId,
    pub urls: ImageUrls,
    #[serde(default, alias = "alt_description")]
    pub alt_description: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default, alias = "source_link")]
    pub source_link: Option<String>,
}

impl Image {
    /// Suggested file name and source URL for saving this image locally.
    /// Every variant downloads the full-resolution asset.
    pub fn download(&self, kind: DownloadKind) -> (String, &str) {
        let name = match kind {
            DownloadKind::Original => format!("image-{}.jpg", self.id),
            DownloadKind::Desktop => format!("wallpaper-desktop-{}.jpg", self.id),
            DownloadKind::Mobile => format!("wallpaper-mobile-{}.jpg", self.id),
        };
        (name, &self.urls.full)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadKind {
    Original,
    Desktop,
    Mobile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: CollectionId,
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default, alias = "created_at")]
    pub created_at: DateTime<Utc>,
}

impl Collection {
    pub fn contains(&self, image_id: &str) -> bool {
        self.images.iter().any(|img| img.id == image_id)
    }

    /// Drops repeated image ids, keeping the first occurrence.
    pub(crate) fn dedup_images(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.images.retain(|img| seen.insert(img.id.clone()));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_matches('"') {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{}'", other)),
        }
    }
}
