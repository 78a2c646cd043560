#![allow(dead_code)]

use async_trait::async_trait;
use rambleapp::error::ProviderError;
use rambleapp::model::{Image, ImageUrls};
use rambleapp::search::ImageSearchProvider;
use std::collections::HashMap;
use std::sync::Mutex;

pub fn image(id: &str) -> Image {
    Image {
        id: id.to_string(),
        urls: ImageUrls {
            small: format!("https://images.example/{}/s", id),
            regular: format!("https://images.example/{}/r", id),
            full: format!("https://images.example/{}/f", id),
        },
        alt_description: None,
        author: Some("someone".to_string()),
        source_link: None,
    }
}

/// Provider serving `(query, page) -> count` images, or a failure.
#[derive(Default)]
pub struct PagedProvider {
    pages: Mutex<HashMap<(String, u32), Option<usize>>>,
    calls: Mutex<Vec<(String, u32)>>,
}

impl PagedProvider {
    pub fn with_page(self, query: &str, page: u32, count: usize) -> Self {
        self.pages
            .lock()
            .unwrap()
            .insert((query.to_string(), page), Some(count));
        self
    }

    pub fn with_failure(self, query: &str, page: u32) -> Self {
        self.pages
            .lock()
            .unwrap()
            .insert((query.to_string(), page), None);
        self
    }

    pub fn heal(&self, query: &str, page: u32, count: usize) {
        self.pages
            .lock()
            .unwrap()
            .insert((query.to_string(), page), Some(count));
    }

    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageSearchProvider for PagedProvider {
    async fn search(
        &self,
        query: &str,
        page: u32,
        _per_page: u32,
    ) -> Result<Vec<Image>, ProviderError> {
        self.calls.lock().unwrap().push((query.to_string(), page));

        let entry = self
            .pages
            .lock()
            .unwrap()
            .get(&(query.to_string(), page))
            .copied();
        match entry {
            Some(Some(count)) => Ok((0..count)
                .map(|n| image(&format!("{}-{}-{}", query, page, n)))
                .collect()),
            Some(None) => Err(ProviderError::Status {
                status: 503,
                body: "unavailable".to_string(),
            }),
            None => Ok(Vec::new()),
        }
    }
}
