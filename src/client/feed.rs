//! Async driver for the incremental match loader.
//!
//! [`MatchFeed`] owns one [`MatchLoader`] and one [`PageSource`]. The
//! loader is only touched under a short lock that is never held across a
//! fetch, so any number of tasks may fire [`MatchFeed::advance`] at once:
//! the first one dispatches a request and the rest are ignored until it
//! completes. Every transition publishes a fresh [`LoaderSnapshot`] on a
//! [`tokio::sync::watch`] channel.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};

use super::PageSource;
use crate::domain::{LoadState, LoaderSnapshot, MatchLoader, PageRequest};

/// Outcome of an advance or retry trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The loader was not in a state that accepts this trigger.
    Ignored,
    /// A request was sent; holds the state after its outcome was applied.
    Dispatched(LoadState),
}

/// Drives a [`MatchLoader`] against a [`PageSource`].
#[derive(Debug)]
pub struct MatchFeed {
    source: Arc<dyn PageSource>,
    loader: Mutex<MatchLoader>,
    snapshots: watch::Sender<LoaderSnapshot>,
}

impl MatchFeed {
    /// Creates a feed and loads the first page.
    ///
    /// A failed first page leaves the feed in [`LoadState::Failed`]; it
    /// is not an error here.
    pub async fn start(source: Arc<dyn PageSource>) -> Self {
        let (loader, request) = MatchLoader::new();
        let (snapshots, _) = watch::channel(loader.snapshot());
        let feed = Self {
            source,
            loader: Mutex::new(loader),
            snapshots,
        };
        feed.run(request).await;
        feed
    }

    /// Requests the next page if the loader is idle.
    ///
    /// Ignored while a page is loading, after the last page, and after a
    /// failure (use [`MatchFeed::retry`]).
    pub async fn advance(&self) -> Trigger {
        match self.transition(MatchLoader::advance).await {
            Some(request) => Trigger::Dispatched(self.run(request).await),
            None => Trigger::Ignored,
        }
    }

    /// Re-requests the page that failed. Ignored unless the loader failed.
    pub async fn retry(&self) -> Trigger {
        match self.transition(MatchLoader::retry).await {
            Some(request) => Trigger::Dispatched(self.run(request).await),
            None => Trigger::Ignored,
        }
    }

    /// Advances until the loader is exhausted or fails, or until
    /// `max_pages` pages have loaded. Returns the final snapshot.
    pub async fn drain(&self, max_pages: Option<u32>) -> LoaderSnapshot {
        loop {
            let snapshot = self.snapshot();
            let capped = max_pages.is_some_and(|max| snapshot.pages_loaded() >= max);
            if snapshot.state() != LoadState::Idle || capped {
                return snapshot;
            }
            if self.advance().await == Trigger::Ignored {
                return self.snapshot();
            }
        }
    }

    /// Latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> LoaderSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Subscribes to snapshot updates.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LoaderSnapshot> {
        self.snapshots.subscribe()
    }

    async fn transition(
        &self,
        step: impl FnOnce(&mut MatchLoader) -> Option<PageRequest>,
    ) -> Option<PageRequest> {
        let mut loader = self.loader.lock().await;
        let request = step(&mut *loader)?;
        self.snapshots.send_replace(loader.snapshot());
        Some(request)
    }

    async fn run(&self, request: PageRequest) -> LoadState {
        let result = self.source.fetch_page(request.page).await;

        let mut loader = self.loader.lock().await;
        match result {
            Ok(page) => {
                let served = page.page;
                if !loader.complete(page) {
                    loader.fail(
                        request.page,
                        format!("response for page {served}, expected page {}", request.page),
                    );
                }
            }
            Err(e) => {
                loader.fail(request.page, &e);
            }
        }
        self.snapshots.send_replace(loader.snapshot());
        loader.state()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use futures_util::FutureExt;
    use futures_util::future::BoxFuture;

    use super::*;
    use crate::domain::{Match, MatchPage, PageNumber};
    use crate::error::ClientError;

    /// Serves pages of an in-memory collection; selected calls fail.
    #[derive(Debug)]
    struct StubPages {
        all: Vec<Match>,
        delay: Duration,
        calls: AtomicUsize,
        failing_calls: StdMutex<HashSet<usize>>,
    }

    impl StubPages {
        fn new(n: usize) -> Self {
            Self {
                all: crate::upstream::testing::collection(n)
                    .into_iter()
                    .map(Match::from_value)
                    .collect(),
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
                failing_calls: StdMutex::new(HashSet::new()),
            }
        }

        fn delayed(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        /// Makes the `call`-th request (1-based) fail.
        fn fail_call(self, call: usize) -> Self {
            if let Ok(mut failing) = self.failing_calls.lock() {
                failing.insert(call);
            }
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl PageSource for StubPages {
        fn fetch_page(&self, page: PageNumber) -> BoxFuture<'_, Result<MatchPage, ClientError>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            let fail = self
                .failing_calls
                .lock()
                .map(|failing| failing.contains(&call))
                .unwrap_or(false);
            async move {
                if !self.delay.is_zero() {
                    tokio::time::sleep(self.delay).await;
                }
                if fail {
                    return Err(ClientError::UnexpectedStatus {
                        url: format!("http://backend.test/api/matches?page={page}"),
                        status: 500,
                        message: "Failed to fetch matches".to_string(),
                    });
                }
                Ok(MatchPage::slice(&self.all, page))
            }
            .boxed()
        }
    }

    /// Answers every request with the same page, whatever was asked.
    #[derive(Debug)]
    struct FixedPage {
        page: PageNumber,
        calls: AtomicUsize,
    }

    impl PageSource for FixedPage {
        fn fetch_page(&self, _page: PageNumber) -> BoxFuture<'_, Result<MatchPage, ClientError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let all: Vec<Match> = crate::upstream::testing::collection(40)
                .into_iter()
                .map(Match::from_value)
                .collect();
            let page = MatchPage::slice(&all, self.page);
            async move { Ok(page) }.boxed()
        }
    }

    async fn start(stub: &Arc<StubPages>) -> MatchFeed {
        MatchFeed::start(Arc::clone(stub) as Arc<dyn PageSource>).await
    }

    #[tokio::test]
    async fn start_loads_first_page() {
        let stub = Arc::new(StubPages::new(20));
        let feed = start(&stub).await;
        let snapshot = feed.snapshot();
        assert_eq!(snapshot.state(), LoadState::Idle);
        assert_eq!(snapshot.matches().len(), 9);
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn drain_accumulates_every_match() {
        let stub = Arc::new(StubPages::new(20));
        let feed = start(&stub).await;
        let snapshot = feed.drain(None).await;
        assert_eq!(snapshot.state(), LoadState::Exhausted);
        assert_eq!(snapshot.matches(), stub.all.as_slice());
        assert_eq!(snapshot.total(), Some(20));
        assert_eq!(stub.calls(), 3);
    }

    #[tokio::test]
    async fn drain_respects_page_cap() {
        let stub = Arc::new(StubPages::new(40));
        let feed = start(&stub).await;
        let snapshot = feed.drain(Some(2)).await;
        assert_eq!(snapshot.state(), LoadState::Idle);
        assert_eq!(snapshot.matches().len(), 18);
    }

    #[tokio::test]
    async fn exhausted_feed_sends_no_more_requests() {
        let stub = Arc::new(StubPages::new(5));
        let feed = start(&stub).await;
        assert_eq!(feed.snapshot().state(), LoadState::Exhausted);
        for _ in 0..10 {
            assert_eq!(feed.advance().await, Trigger::Ignored);
        }
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn concurrent_triggers_dispatch_one_request() {
        let stub = Arc::new(StubPages::new(40).delayed(Duration::from_millis(30)));
        let feed = start(&stub).await;

        let (a, b, c) = tokio::join!(feed.advance(), feed.advance(), feed.advance());
        let outcomes = [a, b, c];
        let dispatched = outcomes
            .iter()
            .filter(|t| matches!(t, Trigger::Dispatched(_)))
            .count();
        assert_eq!(dispatched, 1);
        assert_eq!(stub.calls(), 2);
        assert_eq!(feed.snapshot().matches().len(), 18);
    }

    #[tokio::test]
    async fn failure_keeps_progress_until_explicit_retry() {
        let stub = Arc::new(StubPages::new(20).fail_call(2));
        let feed = start(&stub).await;

        assert_eq!(feed.advance().await, Trigger::Dispatched(LoadState::Failed));
        let failed = feed.snapshot();
        assert_eq!(failed.matches().len(), 9);
        assert!(failed.last_error().is_some_and(|e| e.contains("status 500")));

        assert_eq!(feed.advance().await, Trigger::Ignored);
        assert_eq!(feed.drain(None).await.state(), LoadState::Failed);
        assert_eq!(stub.calls(), 2);

        assert_eq!(feed.retry().await, Trigger::Dispatched(LoadState::Idle));
        assert_eq!(feed.drain(None).await.matches().len(), 20);
        assert_eq!(feed.retry().await, Trigger::Ignored);
    }

    #[tokio::test]
    async fn failed_first_page_can_be_retried() {
        let stub = Arc::new(StubPages::new(3).fail_call(1));
        let feed = start(&stub).await;
        assert_eq!(feed.snapshot().state(), LoadState::Failed);
        assert!(feed.snapshot().matches().is_empty());

        assert_eq!(feed.retry().await, Trigger::Dispatched(LoadState::Exhausted));
        assert_eq!(feed.snapshot().matches().len(), 3);
    }

    #[tokio::test]
    async fn subscribers_see_each_transition() {
        let stub = Arc::new(StubPages::new(20));
        let feed = start(&stub).await;
        let mut rx = feed.subscribe();

        assert_eq!(feed.advance().await, Trigger::Dispatched(LoadState::Idle));
        assert!(rx.has_changed().unwrap_or(false));
        let latest = rx.borrow_and_update().clone();
        assert_eq!(latest.matches().len(), 18);
        assert_eq!(latest.cursor().next_page.get(), 3);
    }

    #[tokio::test]
    async fn mismatched_page_fails_instead_of_hanging() {
        let Some(wrong) = PageNumber::new(2) else {
            panic!("valid page");
        };
        let source = Arc::new(FixedPage {
            page: wrong,
            calls: AtomicUsize::new(0),
        });
        let feed = MatchFeed::start(Arc::clone(&source) as Arc<dyn PageSource>).await;

        let snapshot = feed.snapshot();
        assert_eq!(snapshot.state(), LoadState::Failed);
        assert!(!snapshot.cursor().in_flight);
        assert!(snapshot.matches().is_empty());
        assert_eq!(
            snapshot.last_error(),
            Some("response for page 2, expected page 1")
        );

        assert_eq!(feed.advance().await, Trigger::Ignored);
        assert_eq!(feed.retry().await, Trigger::Dispatched(LoadState::Failed));
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }
}
