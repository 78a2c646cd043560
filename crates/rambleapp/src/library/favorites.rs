//! Favorites: a set of images keyed by id, listed in insertion order.

use super::{lock, LibraryStore, FAVORITES_KEY};
use crate::model::Image;
use crate::store::StorageBackend;
use std::collections::HashSet;

impl<B: StorageBackend> LibraryStore<B> {
    pub fn favorites(&self) -> Vec<Image> {
        let mut images: Vec<Image> = self.store.read_list(FAVORITES_KEY);
        let mut seen = HashSet::new();
        images.retain(|img| seen.insert(img.id.clone()));
        images
    }

    pub fn favorite_count(&self) -> usize {
        self.favorites().len()
    }

    pub fn is_favorite(&self, image_id: &str) -> bool {
        self.favorites().iter().any(|img| img.id == image_id)
    }

    /// Flip membership of `image`. Returns whether it is now a favorite.
    pub fn toggle_favorite(&self, image: &Image) -> bool {
        let _guard = lock(&self.favorites_lock);
        let mut images = self.favorites();
        let now_favorite = if images.iter().any(|img| img.id == image.id) {
            images.retain(|img| img.id != image.id);
            false
        } else {
            images.push(image.clone());
            true
        };
        self.store.write(FAVORITES_KEY, &images);
        now_favorite
    }

    /// Returns whether anything was removed.
    pub fn remove_favorite(&self, image_id: &str) -> bool {
        let _guard = lock(&self.favorites_lock);
        let mut images = self.favorites();
        let before = images.len();
        images.retain(|img| img.id != image_id);
        if images.len() == before {
            return false;
        }
        self.store.write(FAVORITES_KEY, &images);
        true
    }
}
