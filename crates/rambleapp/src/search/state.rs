use crate::error::ProviderError;
use crate::model::Image;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Fetching,
    Settled,
    Errored,
}

/// Ticket for one page fetch, valid only while its epoch is current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub epoch: u64,
    pub query: String,
    pub page: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page was merged into the session.
    Applied {
        page: u32,
        received: usize,
        has_more: bool,
    },
    /// The session moved on before this fetch finished; its result was dropped.
    Stale,
    /// Nothing to fetch: no more pages, a fetch already in flight, or no session.
    Skipped,
    /// The provider failed; the session is now `Errored`.
    Failed { page: u32, reason: String },
}

/// Read-only copy of the session for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub epoch: u64,
    pub query: String,
    pub page: u32,
    pub images: Vec<Image>,
    pub has_more: bool,
    pub status: SessionStatus,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    epoch: u64,
    query: String,
    page: u32,
    images: Vec<Image>,
    has_more: bool,
    status: SessionStatus,
    page_size: u32,
    in_flight: Option<u32>,
    failed_page: Option<u32>,
    last_error: Option<String>,
}

impl SessionState {
    pub fn new(page_size: u32) -> Self {
        Self {
            epoch: 0,
            query: String::new(),
            page: 1,
            images: Vec::new(),
            has_more: false,
            status: SessionStatus::Idle,
            page_size: page_size.max(1),
            in_flight: None,
            failed_page: None,
            last_error: None,
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Start a fresh session whose query is not known yet, superseding
    /// anything in flight. The returned ticket reserves page 1 and is
    /// redeemed with [`SessionState::submit_resolved`] once the query is.
    pub fn begin_resolve(&mut self) -> PageRequest {
        self.epoch += 1;
        self.query.clear();
        self.page = 1;
        self.images.clear();
        self.has_more = false;
        self.failed_page = None;
        self.last_error = None;
        self.start_fetch(1)
    }

    /// Attach `query` to a ticket from [`SessionState::begin_resolve`].
    /// Returns `None` if a newer session started in the meantime.
    pub fn submit_resolved(&mut self, ticket: &PageRequest, query: String) -> Option<PageRequest> {
        if ticket.epoch != self.epoch || self.in_flight != Some(ticket.page) {
            debug!(
                stale_epoch = ticket.epoch,
                current_epoch = self.epoch,
                query = %query,
                "search superseded while resolving"
            );
            return None;
        }
        self.query = query;
        debug!(epoch = self.epoch, query = %self.query, "new search session");
        Some(self.start_fetch(ticket.page))
    }

    /// Start a fresh session for `query`, superseding anything in flight.
    pub fn begin_submit(&mut self, query: String) -> PageRequest {
        self.epoch += 1;
        self.query = query;
        self.page = 1;
        self.images.clear();
        self.has_more = false;
        self.failed_page = None;
        self.last_error = None;
        debug!(epoch = self.epoch, query = %self.query, "new search session");
        self.start_fetch(1)
    }

    /// Ticket for the next page, or `None` when loading more is not allowed.
    pub fn begin_load_more(&mut self) -> Option<PageRequest> {
        if self.status == SessionStatus::Idle || self.in_flight.is_some() || !self.has_more {
            return None;
        }
        Some(self.start_fetch(self.page + 1))
    }

    /// Ticket re-issuing the page that failed, if the session is `Errored`.
    pub fn begin_retry(&mut self) -> Option<PageRequest> {
        if self.status != SessionStatus::Errored || self.in_flight.is_some() {
            return None;
        }
        let page = self.failed_page?;
        Some(self.start_fetch(page))
    }

    /// Return to `Idle`, dropping results and invalidating in-flight tickets.
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.query.clear();
        self.page = 1;
        self.images.clear();
        self.has_more = false;
        self.status = SessionStatus::Idle;
        self.in_flight = None;
        self.failed_page = None;
        self.last_error = None;
    }

    fn start_fetch(&mut self, page: u32) -> PageRequest {
        self.in_flight = Some(page);
        self.status = SessionStatus::Fetching;
        PageRequest {
            epoch: self.epoch,
            query: self.query.clone(),
            page,
        }
    }

    /// Apply the result of `request`, unless the session has moved on.
    pub fn complete(
        &mut self,
        request: &PageRequest,
        result: Result<Vec<Image>, ProviderError>,
    ) -> FetchOutcome {
        if request.epoch != self.epoch {
            debug!(
                stale_epoch = request.epoch,
                current_epoch = self.epoch,
                query = %request.query,
                "dropping result of superseded search"
            );
            return FetchOutcome::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(images) => {
                let received = images.len();
                self.has_more = received == self.page_size as usize;
                if received > 0 {
                    self.page = request.page;
                    self.images.extend(images);
                }
                self.status = SessionStatus::Settled;
                self.failed_page = None;
                self.last_error = None;
                debug!(
                    page = request.page,
                    received,
                    has_more = self.has_more,
                    "page applied"
                );
                FetchOutcome::Applied {
                    page: request.page,
                    received,
                    has_more: self.has_more,
                }
            }
            Err(e) => {
                let reason = e.to_string();
                warn!(page = request.page, error = %reason, "image search failed");
                self.has_more = false;
                self.status = SessionStatus::Errored;
                self.failed_page = Some(request.page);
                self.last_error = Some(reason.clone());
                FetchOutcome::Failed {
                    page: request.page,
                    reason,
                }
            }
        }
    }

    /// Release a ticket whose fetch was dropped before it completed.
    ///
    /// An interrupted `load_more` leaves the session `Settled` so scrolling
    /// can ask again. An interrupted first page or retry leaves it `Errored`
    /// with that page up for `retry`. A ticket dropped before its query was
    /// resolved returns the session to `Idle`.
    pub fn abandon(&mut self, request: &PageRequest) {
        if request.epoch != self.epoch || self.in_flight != Some(request.page) {
            return;
        }
        self.in_flight = None;
        debug!(page = request.page, "fetch abandoned before completing");

        if self.query.is_empty() {
            self.status = SessionStatus::Idle;
        } else if self.failed_page.is_some() || request.page == 1 {
            self.status = SessionStatus::Errored;
            self.has_more = false;
            self.failed_page = Some(request.page);
            self.last_error = Some("fetch was interrupted".to_string());
        } else {
            self.status = SessionStatus::Settled;
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            epoch: self.epoch,
            query: self.query.clone(),
            page: self.page,
            images: self.images.clone(),
            has_more: self.has_more,
            status: self.status,
            last_error: self.last_error.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_images;

    fn settled_with(state: &mut SessionState, query: &str, count: usize) -> PageRequest {
        let req = state.begin_submit(query.to_string());
        state.complete(&req, Ok(sample_images(query, 1, count)));
        req
    }

    #[test]
    fn starts_idle() {
        let mut state = SessionState::new(20);
        assert_eq!(state.status(), SessionStatus::Idle);
        assert!(state.begin_load_more().is_none());
        assert!(state.begin_retry().is_none());
    }

    #[test]
    fn submit_resets_and_requests_first_page() {
        let mut state = SessionState::new(20);
        settled_with(&mut state, "old", 20);

        let req = state.begin_submit("cozy cabin".into());
        assert_eq!(req.page, 1);
        assert_eq!(req.query, "cozy cabin");
        assert_eq!(state.status(), SessionStatus::Fetching);
        assert!(state.images().is_empty());
        assert!(!state.has_more());
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn full_page_keeps_paginating() {
        let mut state = SessionState::new(20);
        settled_with(&mut state, "q", 20);
        assert!(state.has_more());
        assert_eq!(state.status(), SessionStatus::Settled);

        let next = state.begin_load_more().unwrap();
        assert_eq!(next.page, 2);
        // Page only advances once the fetch lands
        assert_eq!(state.page(), 1);

        let outcome = state.complete(&next, Ok(sample_images("q", 2, 5)));
        assert_eq!(
            outcome,
            FetchOutcome::Applied {
                page: 2,
                received: 5,
                has_more: false
            }
        );
        assert_eq!(state.page(), 2);
        assert_eq!(state.images().len(), 25);
        assert!(state.begin_load_more().is_none());
    }

    #[test]
    fn one_fetch_in_flight() {
        let mut state = SessionState::new(20);
        settled_with(&mut state, "q", 20);
        assert!(state.begin_load_more().is_some());
        assert!(state.begin_load_more().is_none());
        assert!(state.is_fetching());
    }

    #[test]
    fn empty_trailing_page_ends_without_error() {
        let mut state = SessionState::new(3);
        settled_with(&mut state, "q", 3);
        let next = state.begin_load_more().unwrap();
        let outcome = state.complete(&next, Ok(Vec::new()));
        assert_eq!(
            outcome,
            FetchOutcome::Applied {
                page: 2,
                received: 0,
                has_more: false
            }
        );
        assert_eq!(state.status(), SessionStatus::Settled);
        assert_eq!(state.images().len(), 3);
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn stale_ticket_is_dropped() {
        let mut state = SessionState::new(20);
        let old = state.begin_submit("a".into());
        let new = state.begin_submit("b".into());

        assert_eq!(
            state.complete(&new, Ok(sample_images("b", 1, 2))),
            FetchOutcome::Applied {
                page: 1,
                received: 2,
                has_more: false
            }
        );
        assert_eq!(state.complete(&old, Ok(sample_images("a", 1, 20))), FetchOutcome::Stale);
        assert_eq!(state.query(), "b");
        assert!(state.images().iter().all(|img| img.id.starts_with("b-")));
    }

    #[test]
    fn stale_ticket_does_not_clear_current_fetch() {
        let mut state = SessionState::new(20);
        let old = state.begin_submit("a".into());
        let _current = state.begin_submit("b".into());
        state.complete(&old, Err(ProviderError::Malformed("late".into())));
        assert!(state.is_fetching());
        assert_eq!(state.status(), SessionStatus::Fetching);
        assert!(state.last_error().is_none());
    }

    #[test]
    fn failure_stops_pagination_and_allows_retry() {
        let mut state = SessionState::new(20);
        settled_with(&mut state, "q", 20);
        let next = state.begin_load_more().unwrap();
        let outcome = state.complete(
            &next,
            Err(ProviderError::Status {
                status: 503,
                body: "busy".into(),
            }),
        );
        assert!(matches!(outcome, FetchOutcome::Failed { page: 2, .. }));
        assert_eq!(state.status(), SessionStatus::Errored);
        assert!(!state.has_more());
        assert!(state.begin_load_more().is_none());
        assert_eq!(state.images().len(), 20);

        let retry = state.begin_retry().unwrap();
        assert_eq!(retry.page, 2);
        state.complete(&retry, Ok(sample_images("q", 2, 20)));
        assert_eq!(state.page(), 2);
        assert_eq!(state.images().len(), 40);
        assert!(state.has_more());
        assert!(state.begin_retry().is_none());
    }

    #[test]
    fn resolving_ticket_goes_stale_on_newer_submit() {
        let mut state = SessionState::new(20);
        let first = state.begin_resolve();
        assert_eq!(state.status(), SessionStatus::Fetching);
        assert!(state.query().is_empty());

        let second = state.begin_resolve();
        let page = state.submit_resolved(&second, "new".into()).unwrap();
        state.complete(&page, Ok(sample_images("new", 1, 5)));

        assert!(state.submit_resolved(&first, "old".into()).is_none());
        assert_eq!(state.query(), "new");
        assert_eq!(state.images().len(), 5);
    }

    #[test]
    fn abandoned_load_more_can_be_asked_again() {
        let mut state = SessionState::new(20);
        settled_with(&mut state, "q", 20);
        let next = state.begin_load_more().unwrap();
        state.abandon(&next);

        assert_eq!(state.status(), SessionStatus::Settled);
        assert!(state.has_more());
        assert!(!state.is_fetching());
        assert_eq!(state.begin_load_more().unwrap().page, 2);
    }

    #[test]
    fn abandoned_first_page_is_retryable() {
        let mut state = SessionState::new(20);
        let req = state.begin_submit("q".into());
        state.abandon(&req);
        assert_eq!(state.status(), SessionStatus::Errored);
        assert_eq!(state.begin_retry().unwrap().page, 1);
    }

    #[test]
    fn abandoned_resolve_returns_to_idle() {
        let mut state = SessionState::new(20);
        let ticket = state.begin_resolve();
        state.abandon(&ticket);
        assert_eq!(state.status(), SessionStatus::Idle);
        assert!(state.submit_resolved(&ticket, "late".into()).is_none());
    }

    #[test]
    fn abandoning_stale_ticket_is_ignored() {
        let mut state = SessionState::new(20);
        let old = state.begin_submit("a".into());
        let _current = state.begin_submit("b".into());
        state.abandon(&old);
        assert!(state.is_fetching());
        assert_eq!(state.status(), SessionStatus::Fetching);
    }

    #[test]
    fn reset_invalidates_in_flight() {
        let mut state = SessionState::new(20);
        let req = state.begin_submit("q".into());
        state.reset();
        assert_eq!(state.complete(&req, Ok(sample_images("q", 1, 20))), FetchOutcome::Stale);
        assert_eq!(state.status(), SessionStatus::Idle);
        assert!(state.images().is_empty());
        assert!(state.query().is_empty());
    }
}
