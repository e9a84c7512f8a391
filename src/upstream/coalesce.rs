//! In-flight fetch coalescing.
//!
//! [`CoalescingSource`] lets concurrent callers share one upstream fetch.
//! A caller that arrives while a fetch is running awaits that fetch; a
//! caller that arrives after it finished starts a new one. Results are
//! never kept past the fetch that produced them.

use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use tokio::sync::Mutex;

use super::{MatchList, MatchSource};
use crate::error::UpstreamError;

type SharedFetch = Shared<BoxFuture<'static, Result<MatchList, UpstreamError>>>;

#[derive(Default)]
struct Slot {
    generation: u64,
    in_flight: Option<SharedFetch>,
}

impl std::fmt::Debug for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slot")
            .field("generation", &self.generation)
            .field("in_flight", &self.in_flight.is_some())
            .finish()
    }
}

/// Wraps a [`MatchSource`] so concurrent calls share one in-flight fetch.
#[derive(Debug)]
pub struct CoalescingSource {
    inner: Arc<dyn MatchSource>,
    slot: Arc<Mutex<Slot>>,
}

impl CoalescingSource {
    /// Wraps `inner`.
    #[must_use]
    pub fn new(inner: Arc<dyn MatchSource>) -> Self {
        Self {
            inner,
            slot: Arc::new(Mutex::new(Slot::default())),
        }
    }

    async fn join_or_start(&self) -> SharedFetch {
        let mut slot = self.slot.lock().await;
        if let Some(fetch) = &slot.in_flight {
            tracing::debug!(generation = slot.generation, "joining in-flight upstream fetch");
            return fetch.clone();
        }

        slot.generation = slot.generation.wrapping_add(1);
        let generation = slot.generation;
        let inner = Arc::clone(&self.inner);
        let release = Arc::clone(&self.slot);
        let fetch = async move {
            let result = inner.fetch_matches().await;
            let mut slot = release.lock().await;
            if slot.generation == generation {
                slot.in_flight = None;
            }
            result
        }
        .boxed()
        .shared();

        slot.in_flight = Some(fetch.clone());
        fetch
    }
}

impl MatchSource for CoalescingSource {
    fn fetch_matches(&self) -> BoxFuture<'_, Result<MatchList, UpstreamError>> {
        async move { self.join_or_start().await.await }.boxed()
    }
}
