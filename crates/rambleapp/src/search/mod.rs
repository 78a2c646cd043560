//! # Search Sessions
//!
//! A session is one query and every page loaded for it. Submitting a new query
//! starts a new session; the old one is abandoned even if a fetch for it is
//! still on the wire.
//!
//! ## State Machine
//!
//! ```text
//!            submit(q)                 full page
//!   Idle ─────────────► Fetching(1) ─────────────► Settled(has_more)
//!                          │  ▲                        │
//!              failure     │  │ retry()     load_more()│
//!                          ▼  │                        ▼
//!                        Errored ◄──────────────── Fetching(page + 1)
//!                                     failure
//! ```
//!
//! - A page with exactly `page_size` results means there may be more; fewer
//!   (including zero) ends the session's pagination.
//! - At most one fetch is in flight per session. `load_more` while fetching,
//!   or after the last page, is skipped without touching the provider.
//! - A failure stops automatic loading (`has_more = false`). [`SearchSession::retry`]
//!   re-issues the failed page.
//!
//! ## Cancellation by Epoch
//!
//! Every `submit`, `begin_search` and `reset` bumps an epoch counter. Fetches are started from
//! a [`PageRequest`] ticket stamped with the epoch current at the time, and
//! [`SessionState::complete`] drops any result whose ticket is from an older
//! epoch. There is no need to abort the network call itself: whatever it
//! returns is simply never merged.
//!
//! When the query still has to be worked out (a keyword rewrite), the epoch is
//! claimed up front with [`SearchSession::begin_search`], so a slow rewrite
//! for an older input cannot land after a newer search.
//!
//! ## Dropped Fetches
//!
//! A fetch future dropped mid-await (a UI timeout, `select!`) releases its
//! ticket through [`SessionState::abandon`] instead of leaving the session in
//! `Fetching`.
//!
//! ## Layers
//!
//! - [`SessionState`]: the synchronous state machine. No I/O.
//! - [`SearchSession`]: drives the state machine against an
//!   [`ImageSearchProvider`], never holding its lock across a provider call.
//!   The lock is a plain `std::sync::Mutex` so drop guards can take it.

mod session;
mod state;

pub use session::{PendingSearch, SearchSession};
pub use state::{FetchOutcome, PageRequest, SessionSnapshot, SessionState, SessionStatus};

use crate::error::ProviderError;
use crate::model::Image;
use async_trait::async_trait;

pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// A paginated image search service.
#[async_trait]
pub trait ImageSearchProvider: Send + Sync {
    /// Fetch one page (1-based) of at most `per_page` results for `query`.
    async fn search(&self, query: &str, page: u32, per_page: u32)
        -> Result<Vec<Image>, ProviderError>;
}
