use crate::config::RambleConfig;
use crate::error::{ProviderError, RambleError, Result};
use crate::model::{Image, ImageUrls};
use crate::search::ImageSearchProvider;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    id: String,
    urls: ImageUrls,
    alt_description: Option<String>,
    user: Option<PhotoUser>,
    links: Option<PhotoLinks>,
}

#[derive(Debug, Deserialize)]
struct PhotoUser {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PhotoLinks {
    html: Option<String>,
}

impl From<Photo> for Image {
    fn from(photo: Photo) -> Self {
        Image {
            id: photo.id,
            urls: photo.urls,
            alt_description: photo.alt_description,
            author: photo.user.and_then(|u| u.name),
            source_link: photo.links.and_then(|l| l.html),
        }
    }
}

/// Decode a `/search/photos` response body into images, in provider order.
pub fn parse_search_response(body: &str) -> std::result::Result<Vec<Image>, ProviderError> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Malformed(e.to_string()))?;
    Ok(response.results.into_iter().map(Image::from).collect())
}

#[derive(Clone)]
pub struct UnsplashClient {
    client: Client,
    access_key: String,
    base_url: String,
}

impl UnsplashClient {
    pub fn new(
        access_key: String,
        base_url: String,
        timeout: Duration,
    ) -> std::result::Result<Self, ProviderError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            access_key,
            base_url,
        })
    }

    pub fn from_config(config: &RambleConfig) -> Result<Self> {
        let access_key = config
            .search_access_key
            .clone()
            .ok_or(RambleError::MissingSetting("search_access_key"))?;
        Ok(Self::new(
            access_key,
            config.search_base_url.clone(),
            config.request_timeout(),
        )?)
    }
}

#[async_trait]
impl ImageSearchProvider for UnsplashClient {
    async fn search(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> std::result::Result<Vec<Image>, ProviderError> {
        let url = format!("{}/search/photos", self.base_url.trim_end_matches('/'));
        let page = page.to_string();
        let per_page = per_page.to_string();
        let params = [
            ("query", query),
            ("page", page.as_str()),
            ("per_page", per_page.as_str()),
            ("client_id", self.access_key.as_str()),
        ];

        info!(query, page = %page, "image search request");
        let response = self
            .client
            .get(&url)
            .query(&params)
            .header("Accept-Version", "v1")
            .send()
            .await?;

        let status = response.status();
        debug!("Response status: {}", status);
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(super::status_error(status, body));
        }

        let body = response.text().await?;
        let images = parse_search_response(&body)?;
        debug!(count = images.len(), "image search returned results");
        Ok(images)
    }
}
