//! Incremental match loader state machine.
//!
//! [`MatchLoader`] owns the accumulated match list and the loading cursor.
//! It performs no I/O: callers ask it for the next [`PageRequest`], run
//! the request however they like, and feed the outcome back through
//! [`MatchLoader::complete`] or [`MatchLoader::fail`]. Readers only ever
//! see immutable [`LoaderSnapshot`]s.
//!
//! ```text
//!            advance()                 page with more to come
//!   Idle ──────────────▶ Loading ───────────────────────────▶ Idle
//!                          │  ▲
//!          last/empty page │  │ retry()
//!                          ▼  │
//!                    Exhausted  Failed ◀── fetch error
//! ```

use std::sync::Arc;

use super::match_filter::{self, MatchFilter};
use super::{Match, MatchPage, PageNumber};

/// Loader lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Waiting for an advance trigger.
    Idle,
    /// A page request is in flight.
    Loading,
    /// The last page has been received; no further requests are issued.
    Exhausted,
    /// The last request failed; [`MatchLoader::retry`] re-issues it.
    Failed,
}

/// A page the caller should fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Page to fetch.
    pub page: PageNumber,
}

/// Cursor view of the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadCursor {
    /// The page the next (or current) request targets.
    pub next_page: PageNumber,
    /// `false` once the loader is exhausted; never returns to `true`.
    pub has_more: bool,
    /// `true` only while a request is outstanding.
    pub in_flight: bool,
}

/// Owner of the accumulated match list and loading cursor.
#[derive(Debug)]
pub struct MatchLoader {
    state: LoadState,
    next_page: PageNumber,
    matches: Arc<Vec<Match>>,
    total: Option<usize>,
    pages_loaded: u32,
    last_error: Option<String>,
}

impl MatchLoader {
    /// Creates a loader that is already loading page 1.
    ///
    /// The returned request must be fetched and its outcome reported.
    #[must_use]
    pub fn new() -> (Self, PageRequest) {
        let loader = Self {
            state: LoadState::Loading,
            next_page: PageNumber::FIRST,
            matches: Arc::new(Vec::new()),
            total: None,
            pages_loaded: 0,
            last_error: None,
        };
        let request = PageRequest {
            page: loader.next_page,
        };
        (loader, request)
    }

    /// Handles an advance trigger.
    ///
    /// Returns the next request when idle. While loading, exhausted or
    /// failed the trigger is ignored and `None` is returned.
    pub fn advance(&mut self) -> Option<PageRequest> {
        if self.state != LoadState::Idle {
            tracing::trace!(state = ?self.state, "advance ignored");
            return None;
        }
        self.begin()
    }

    /// Re-issues the request that failed.
    ///
    /// Returns `None` unless the loader is in [`LoadState::Failed`].
    pub fn retry(&mut self) -> Option<PageRequest> {
        if self.state != LoadState::Failed {
            return None;
        }
        tracing::debug!(page = %self.next_page, "retrying page");
        self.begin()
    }

    fn begin(&mut self) -> Option<PageRequest> {
        self.state = LoadState::Loading;
        self.last_error = None;
        Some(PageRequest {
            page: self.next_page,
        })
    }

    /// Applies a successful page response.
    ///
    /// Responses for a page other than the one in flight are discarded.
    /// Returns whether the response was applied.
    pub fn complete(&mut self, page: MatchPage) -> bool {
        if !self.awaiting(page.page) {
            tracing::debug!(page = %page.page, state = ?self.state, "stale page discarded");
            return false;
        }
        let last = page.is_last();
        let received = page.matches.len();
        Arc::make_mut(&mut self.matches).extend(page.matches);
        self.total = Some(page.total);
        self.pages_loaded = self.pages_loaded.saturating_add(1);

        if last {
            self.state = LoadState::Exhausted;
            tracing::debug!(page = %page.page, received, accumulated = self.matches.len(), "match list exhausted");
        } else {
            self.state = LoadState::Idle;
            self.next_page = page.page.next();
            tracing::debug!(page = %page.page, received, accumulated = self.matches.len(), "page loaded");
        }
        true
    }

    /// Records a failed request. The accumulated list is left untouched.
    ///
    /// Returns whether the failure was applied.
    pub fn fail(&mut self, page: PageNumber, error: impl std::fmt::Display) -> bool {
        if !self.awaiting(page) {
            return false;
        }
        let error = error.to_string();
        tracing::warn!(%page, %error, "failed to load matches");
        self.state = LoadState::Failed;
        self.last_error = Some(error);
        true
    }

    fn awaiting(&self, page: PageNumber) -> bool {
        self.state == LoadState::Loading && page == self.next_page
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> LoadState {
        self.state
    }

    /// Current cursor.
    #[must_use]
    pub fn cursor(&self) -> LoadCursor {
        LoadCursor {
            next_page: self.next_page,
            has_more: self.state != LoadState::Exhausted,
            in_flight: self.state == LoadState::Loading,
        }
    }

    /// Immutable view of the current state.
    #[must_use]
    pub fn snapshot(&self) -> LoaderSnapshot {
        LoaderSnapshot {
            state: self.state,
            cursor: self.cursor(),
            matches: Arc::clone(&self.matches),
            total: self.total,
            pages_loaded: self.pages_loaded,
            last_error: self.last_error.clone(),
        }
    }
}

/// Point-in-time view of a [`MatchLoader`].
///
/// Cloning is cheap; the match list is shared, not copied.
#[derive(Debug, Clone)]
pub struct LoaderSnapshot {
    state: LoadState,
    cursor: LoadCursor,
    matches: Arc<Vec<Match>>,
    total: Option<usize>,
    pages_loaded: u32,
    last_error: Option<String>,
}

impl LoaderSnapshot {
    /// Loader state when the snapshot was taken.
    #[must_use]
    pub const fn state(&self) -> LoadState {
        self.state
    }

    /// Loader cursor when the snapshot was taken.
    #[must_use]
    pub const fn cursor(&self) -> LoadCursor {
        self.cursor
    }

    /// Accumulated matches in request order.
    #[must_use]
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    /// Total reported by the most recent page, if any page has loaded.
    #[must_use]
    pub const fn total(&self) -> Option<usize> {
        self.total
    }

    /// Number of pages applied so far.
    #[must_use]
    pub const fn pages_loaded(&self) -> u32 {
        self.pages_loaded
    }

    /// Message of the failure that put the loader in [`LoadState::Failed`].
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Distinct competition names across the accumulated matches.
    #[must_use]
    pub fn competitions(&self) -> Vec<String> {
        match_filter::competitions(&self.matches)
    }

    /// Accumulated matches that pass `filter`.
    #[must_use]
    pub fn filtered(&self, filter: &MatchFilter) -> Vec<&Match> {
        filter.apply(&self.matches)
    }
}
