//! Named collections of saved images.

use super::{lock, LibraryStore, COLLECTIONS_KEY};
use crate::error::{Result, ValidationError};
use crate::model::{Collection, CollectionId, Image};
use crate::store::StorageBackend;
use chrono::Utc;
use std::collections::HashSet;
use tracing::debug;

impl<B: StorageBackend> LibraryStore<B> {
    /// All collections in creation order.
    ///
    /// Stored data is coerced: a repeated collection id keeps only its first
    /// entry and repeated image ids inside a collection are dropped.
    pub fn list_collections(&self) -> Vec<Collection> {
        let mut collections: Vec<Collection> = self.store.read_list(COLLECTIONS_KEY);
        let mut seen = HashSet::new();
        collections.retain(|c| seen.insert(c.id));
        for collection in &mut collections {
            collection.dedup_images();
        }
        collections
    }

    pub fn collection(&self, id: CollectionId) -> Option<Collection> {
        self.list_collections().into_iter().find(|c| c.id == id)
    }

    pub fn create_collection(&self, name: &str, image: Option<&Image>) -> Result<Collection> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyCollectionName.into());
        }

        let _guard = lock(&self.collections_lock);
        let mut collections = self.list_collections();

        let now = Utc::now();
        let next_free = collections.iter().map(|c| c.id + 1).max().unwrap_or(0);
        let collection = Collection {
            id: now.timestamp_millis().max(next_free),
            name: name.to_string(),
            images: image.into_iter().cloned().collect(),
            created_at: now,
        };
        collections.push(collection.clone());
        self.store.write(COLLECTIONS_KEY, &collections);
        debug!(id = collection.id, name = %collection.name, "created collection");
        Ok(collection)
    }

    /// Append `image` to a collection. Returns `false` if it was already there.
    pub fn add_image_to_collection(&self, id: CollectionId, image: &Image) -> Result<bool> {
        let _guard = lock(&self.collections_lock);
        let mut collections = self.list_collections();
        let collection = collections
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(ValidationError::CollectionNotFound(id))?;

        if collection.contains(&image.id) {
            return Ok(false);
        }
        collection.images.push(image.clone());
        self.store.write(COLLECTIONS_KEY, &collections);
        Ok(true)
    }

    /// Returns `false` if the image was not in the collection.
    pub fn remove_image_from_collection(&self, id: CollectionId, image_id: &str) -> Result<bool> {
        let _guard = lock(&self.collections_lock);
        let mut collections = self.list_collections();
        let collection = collections
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(ValidationError::CollectionNotFound(id))?;

        let before = collection.images.len();
        collection.images.retain(|img| img.id != image_id);
        if collection.images.len() == before {
            return Ok(false);
        }
        self.store.write(COLLECTIONS_KEY, &collections);
        Ok(true)
    }

    /// Idempotent: deleting an unknown id is a no-op.
    pub fn delete_collection(&self, id: CollectionId) {
        let _guard = lock(&self.collections_lock);
        let mut collections = self.list_collections();
        let before = collections.len();
        collections.retain(|c| c.id != id);
        if collections.len() != before {
            self.store.write(COLLECTIONS_KEY, &collections);
        }
    }
}
