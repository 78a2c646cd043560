use crate::error::ProviderError;
use crate::library::LibraryStore;
use crate::model::{Image, ImageUrls};
use crate::search::ImageSearchProvider;
use crate::store::fs_backend::FsBackend;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::sync::Notify;

pub struct TestEnv {
    // We keep _temp_dir to ensure the directory is not dropped until the test is done
    pub _temp_dir: TempDir,
    pub library: LibraryStore<FsBackend>,
    pub root: PathBuf,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        let library = LibraryStore::with_backend(FsBackend::new(root.clone()));
        Self {
            _temp_dir: temp_dir,
            library,
            root,
        }
    }

    /// A second store over the same directory, as after an app restart.
    pub fn reopen(&self) -> LibraryStore<FsBackend> {
        LibraryStore::with_backend(FsBackend::new(self.root.clone()))
    }
}

pub fn sample_image(id: &str) -> Image {
    Image {
        id: id.to_string(),
        urls: ImageUrls {
            small: format!("https://images.example/{}/small", id),
            regular: format!("https://images.example/{}/regular", id),
            full: format!("https://images.example/{}/full", id),
        },
        alt_description: Some(format!("photo {}", id)),
        author: None,
        source_link: None,
    }
}

/// `count` distinct images for `page` of `query`, with ids `{query}-{page}-{n}`.
pub fn sample_images(query: &str, page: u32, count: usize) -> Vec<Image> {
    (0..count)
        .map(|n| sample_image(&format!("{}-{}-{}", query, page, n)))
        .collect()
}

#[derive(Clone, Copy)]
enum Script {
    Images(usize),
    Fail,
}

/// Image search provider answering from a script of `(query, page)` entries.
///
/// Unscripted pages come back empty. A gated query blocks until its gate is
/// notified, which lets tests interleave a slow fetch with newer submissions.
#[derive(Default)]
pub struct ScriptedProvider {
    pages: Mutex<HashMap<(String, u32), Script>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    calls: Mutex<Vec<(String, u32, u32)>>,
    started: Arc<Notify>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, query: &str, page: u32, count: usize) -> Self {
        self.set_page(query, page, count);
        self
    }

    pub fn failing(self, query: &str, page: u32) -> Self {
        self.pages
            .lock()
            .unwrap()
            .insert((query.to_string(), page), Script::Fail);
        self
    }

    pub fn set_page(&self, query: &str, page: u32, count: usize) {
        self.pages
            .lock()
            .unwrap()
            .insert((query.to_string(), page), Script::Images(count));
    }

    /// Make every search for `query` wait until the returned gate is notified.
    pub fn gate(&self, query: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(query.to_string(), gate.clone());
        gate
    }

    /// Notified each time a search call begins.
    pub fn started(&self) -> Arc<Notify> {
        self.started.clone()
    }

    /// Every `(query, page, per_page)` the provider was asked for.
    pub fn calls(&self) -> Vec<(String, u32, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageSearchProvider for ScriptedProvider {
    async fn search(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Image>, ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push((query.to_string(), page, per_page));
        self.started.notify_one();

        let gate = self.gates.lock().unwrap().get(query).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let script = self
            .pages
            .lock()
            .unwrap()
            .get(&(query.to_string(), page))
            .copied();
        match script {
            Some(Script::Images(count)) => Ok(sample_images(query, page, count)),
            Some(Script::Fail) => Err(ProviderError::Status {
                status: 500,
                body: "scripted failure".to_string(),
            }),
            None => Ok(Vec::new()),
        }
    }
}
