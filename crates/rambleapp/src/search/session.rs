use super::state::{FetchOutcome, PageRequest, SessionSnapshot, SessionState};
use super::ImageSearchProvider;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Async driver pairing a [`SessionState`] with an image search provider.
///
/// All methods take `&self`, so a new `submit` can run while an older fetch
/// is still awaiting the provider; the older result then comes back `Stale`.
///
/// The state lock is never held across a provider call. Dropping a fetch
/// future before it completes releases its ticket (see
/// [`SessionState::abandon`]), so an interrupted `load_more` does not leave
/// the session stuck in `Fetching`.
pub struct SearchSession<P: ImageSearchProvider> {
    provider: P,
    state: Mutex<SessionState>,
}

impl<P: ImageSearchProvider> SearchSession<P> {
    pub fn new(provider: P, page_size: u32) -> Self {
        Self {
            provider,
            state: Mutex::new(SessionState::new(page_size)),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a new session for `query` and fetch its first page.
    pub async fn submit(&self, query: impl Into<String>) -> FetchOutcome {
        let request = self.lock().begin_submit(query.into());
        self.run(request).await
    }

    /// Start a new session now and supply its query later.
    ///
    /// Anything in flight is superseded immediately, so work done while the
    /// query is being worked out (a keyword rewrite) cannot let an older
    /// search overwrite this one.
    pub fn begin_search(&self) -> PendingSearch<'_, P> {
        let ticket = self.lock().begin_resolve();
        PendingSearch {
            session: self,
            ticket: Some(ticket),
        }
    }

    /// Fetch the next page, if there is one and nothing is in flight.
    pub async fn load_more(&self) -> FetchOutcome {
        let request = self.lock().begin_load_more();
        match request {
            Some(request) => self.run(request).await,
            None => FetchOutcome::Skipped,
        }
    }

    /// Re-issue the page that last failed.
    pub async fn retry(&self) -> FetchOutcome {
        let request = self.lock().begin_retry();
        match request {
            Some(request) => self.run(request).await,
            None => FetchOutcome::Skipped,
        }
    }

    pub fn reset(&self) {
        self.lock().reset();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock().snapshot()
    }

    async fn run(&self, request: PageRequest) -> FetchOutcome {
        let page_size = self.lock().page_size();
        let guard = TicketGuard {
            state: &self.state,
            ticket: Some(request.clone()),
        };
        let result = self
            .provider
            .search(&request.query, request.page, page_size)
            .await;
        guard.disarm();
        self.lock().complete(&request, result)
    }
}

/// A session started by [`SearchSession::begin_search`] whose query is still
/// being resolved. Dropping it without submitting returns the session to
/// `Idle`, unless a newer search has already taken over.
pub struct PendingSearch<'a, P: ImageSearchProvider> {
    session: &'a SearchSession<P>,
    ticket: Option<PageRequest>,
}

impl<P: ImageSearchProvider> PendingSearch<'_, P> {
    pub fn epoch(&self) -> Option<u64> {
        self.ticket.as_ref().map(|t| t.epoch)
    }

    /// Fetch the first page for `query`, or `Stale` if superseded.
    pub async fn submit(mut self, query: impl Into<String>) -> FetchOutcome {
        let Some(ticket) = self.ticket.take() else {
            return FetchOutcome::Stale;
        };
        let request = self.session.lock().submit_resolved(&ticket, query.into());
        match request {
            Some(request) => self.session.run(request).await,
            None => FetchOutcome::Stale,
        }
    }
}

impl<P: ImageSearchProvider> Drop for PendingSearch<'_, P> {
    fn drop(&mut self) {
        if let Some(ticket) = self.ticket.take() {
            self.session.lock().abandon(&ticket);
        }
    }
}

/// Releases an in-flight ticket if the fetch future is dropped mid-await.
struct TicketGuard<'a> {
    state: &'a Mutex<SessionState>,
    ticket: Option<PageRequest>,
}

impl TicketGuard<'_> {
    fn disarm(mut self) {
        self.ticket = None;
    }
}

impl Drop for TicketGuard<'_> {
    fn drop(&mut self) {
        if let Some(ticket) = self.ticket.take() {
            self.state
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .abandon(&ticket);
        }
    }
}
