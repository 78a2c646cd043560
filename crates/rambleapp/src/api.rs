//! # API Facade
//!
//! [`RambleApi`] is a **thin facade** wiring the components into the search
//! flow a UI drives:
//!
//! ```text
//! input ─► record in History ─► claim session ─► KeywordResolver ─► submit ─► page 1
//!                                                  scroll end ─► load_more ─► page N
//! ```
//!
//! The session is claimed before the keyword rewrite runs. If the user
//! searches again while a rewrite is pending, the older search comes back
//! [`FetchOutcome::Stale`] and never reaches the screen or the provider.
//!
//! Library actions (favorites, collections, history, theme) are reached
//! through [`RambleApi::library`]; the facade adds nothing to them.
//!
//! ## Failure Surface
//!
//! Only validation failures come back as errors. Keyword rewrite failures
//! degrade to the raw input, provider failures show up as
//! [`FetchOutcome::Failed`] with the session `Errored`, and storage failures
//! are logged inside the library.
//!
//! ## Generic Over Backend and Provider
//!
//! - Production: `RambleApi<FsBackend, UnsplashClient>` via [`RambleApi::open`]
//! - Testing: `RambleApi<MemBackend, _>` with a scripted provider

use crate::config::RambleConfig;
use crate::error::{RambleError, Result, ValidationError};
use crate::keywords::{KeywordResolver, ResolvedQuery};
use crate::library::LibraryStore;
use crate::providers::{OpenRouterClient, UnsplashClient};
use crate::search::{FetchOutcome, ImageSearchProvider, SearchSession, SessionSnapshot};
use crate::store::fs_backend::FsBackend;
use crate::store::StorageBackend;
use tracing::info;

/// Result of submitting a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub resolved: ResolvedQuery,
    pub fetch: FetchOutcome,
}

pub struct RambleApi<B: StorageBackend, P: ImageSearchProvider> {
    library: LibraryStore<B>,
    resolver: KeywordResolver,
    session: SearchSession<P>,
}

impl<B: StorageBackend, P: ImageSearchProvider> RambleApi<B, P> {
    pub fn new(library: LibraryStore<B>, resolver: KeywordResolver, session: SearchSession<P>) -> Self {
        Self {
            library,
            resolver,
            session,
        }
    }

    pub fn library(&self) -> &LibraryStore<B> {
        &self.library
    }

    pub fn resolver(&self) -> &KeywordResolver {
        &self.resolver
    }

    /// Resolve `input` into a query, remember it, and load the first page.
    pub async fn search(&self, input: &str) -> Result<SearchOutcome> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ValidationError::EmptyQuery.into());
        }

        self.library.record_search(input);
        let pending = self.session.begin_search();
        let resolved = self.resolver.resolve(input).await;
        info!(query = %resolved.query, "submitting search");
        let fetch = pending.submit(resolved.query.clone()).await;
        Ok(SearchOutcome { resolved, fetch })
    }

    pub async fn load_more(&self) -> FetchOutcome {
        self.session.load_more().await
    }

    pub async fn retry(&self) -> FetchOutcome {
        self.session.retry().await
    }

    /// Leave the results view.
    pub fn reset(&self) {
        self.session.reset()
    }

    pub fn session(&self) -> SessionSnapshot {
        self.session.snapshot()
    }
}

impl RambleApi<FsBackend, UnsplashClient> {
    /// Build the production stack described by `config`.
    pub fn open(config: &RambleConfig) -> Result<Self> {
        let data_dir = config
            .data_dir()
            .ok_or(RambleError::MissingSetting("data_dir"))?;
        let library = LibraryStore::with_backend(FsBackend::new(data_dir))
            .with_history_limit(config.history_limit);

        let resolver = match OpenRouterClient::from_config(config)? {
            Some(client) => KeywordResolver::with_provider(client),
            None => KeywordResolver::passthrough(),
        };

        let search = UnsplashClient::from_config(config)?;
        let session = SearchSession::new(search, config.page_size());

        Ok(Self::new(library, resolver, session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::keywords::RewriteProvider;
    use crate::search::SessionStatus;
    use crate::store::mem_backend::MemBackend;
    use crate::test_utils::ScriptedProvider;
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio::sync::Notify;

    struct FixedRewrite(&'static str);

    #[async_trait]
    impl RewriteProvider for FixedRewrite {
        async fn rewrite(&self, _prompt: &str) -> std::result::Result<String, ProviderError> {
            Ok(self.0.to_string())
        }
    }

    /// Rewrites every input to `"{input}-kw"`, holding inputs that start with
    /// `hold` until the gate is notified.
    struct HeldRewrite {
        hold: &'static str,
        gate: Arc<Notify>,
        started: Arc<Notify>,
    }

    #[async_trait]
    impl RewriteProvider for HeldRewrite {
        async fn rewrite(&self, prompt: &str) -> std::result::Result<String, ProviderError> {
            let input = prompt.rsplit(": ").next().unwrap_or(prompt);
            if input.starts_with(self.hold) {
                self.started.notify_one();
                self.gate.notified().await;
            }
            Ok(format!("{}-kw", input))
        }
    }

    fn api(
        resolver: KeywordResolver,
        provider: ScriptedProvider,
    ) -> RambleApi<MemBackend, ScriptedProvider> {
        RambleApi::new(
            LibraryStore::with_backend(MemBackend::new()),
            resolver,
            SearchSession::new(provider, 20),
        )
    }

    #[tokio::test]
    async fn search_records_input_and_submits_keywords() {
        let provider = ScriptedProvider::new().page("cabin, snow, fireplace", 1, 20);
        let api = api(
            KeywordResolver::with_provider(FixedRewrite("1. cabin\n2. snow\n3. fireplace")),
            provider,
        );

        let outcome = api.search("  a snowy cabin with a fire  ").await.unwrap();
        assert_eq!(outcome.resolved.query, "cabin, snow, fireplace");
        assert!(matches!(outcome.fetch, FetchOutcome::Applied { received: 20, .. }));
        assert_eq!(api.library().history(), vec!["a snowy cabin with a fire"]);

        let snap = api.session();
        assert_eq!(snap.query, "cabin, snow, fireplace");
        assert_eq!(snap.status, SessionStatus::Settled);
    }

    #[tokio::test]
    async fn blank_search_is_rejected() {
        let api = api(KeywordResolver::passthrough(), ScriptedProvider::new());
        let err = api.search("   ").await.unwrap_err();
        assert!(matches!(
            err,
            RambleError::Validation(ValidationError::EmptyQuery)
        ));
        assert!(api.library().history().is_empty());
        assert_eq!(api.session().status, SessionStatus::Idle);
    }

    #[tokio::test]
    async fn load_more_and_reset_pass_through() {
        let provider = ScriptedProvider::new()
            .page("dunes", 1, 20)
            .page("dunes", 2, 3);
        let api = api(KeywordResolver::passthrough(), provider);
        api.search("dunes").await.unwrap();
        assert!(matches!(
            api.load_more().await,
            FetchOutcome::Applied { page: 2, received: 3, has_more: false }
        ));
        assert_eq!(api.retry().await, FetchOutcome::Skipped);
        api.reset();
        assert!(api.session().images.is_empty());
    }

    #[tokio::test]
    async fn slow_rewrite_cannot_overwrite_newer_search() {
        let gate = Arc::new(Notify::new());
        let started = Arc::new(Notify::new());
        let resolver = KeywordResolver::with_provider(HeldRewrite {
            hold: "first",
            gate: gate.clone(),
            started: started.clone(),
        });
        let provider = ScriptedProvider::new()
            .page("first-kw", 1, 20)
            .page("second-kw", 1, 4);
        let api = api(resolver, provider);

        let (first, second) = tokio::join!(api.search("first"), async {
            started.notified().await;
            let outcome = api.search("second").await;
            gate.notify_one();
            outcome
        });

        assert_eq!(first.unwrap().fetch, FetchOutcome::Stale);
        assert!(matches!(
            second.unwrap().fetch,
            FetchOutcome::Applied { received: 4, .. }
        ));

        let snap = api.session();
        assert_eq!(snap.query, "second-kw");
        assert_eq!(snap.images.len(), 4);
        assert_eq!(api.library().history(), vec!["second", "first"]);
        // The superseded query never reached the search provider
        let queries: Vec<_> = api
            .session
            .provider()
            .calls()
            .into_iter()
            .map(|(q, _, _)| q)
            .collect();
        assert_eq!(queries, vec!["second-kw"]);
    }

    #[test]
    fn open_requires_search_key() {
        let dir = tempfile::tempdir().unwrap();
        let config = RambleConfig {
            data_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        assert!(matches!(
            RambleApi::open(&config).err().unwrap(),
            RambleError::MissingSetting("search_access_key")
        ));

        let config = RambleConfig {
            search_access_key: Some("key".into()),
            rewrite_api_key: Some("sk".into()),
            history_limit: 4,
            ..config
        };
        let api = RambleApi::open(&config).unwrap();
        assert!(api.resolver().has_provider());
        assert_eq!(api.library().history_limit(), 4);
    }
}
