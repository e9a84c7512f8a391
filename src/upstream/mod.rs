//! Upstream match feed.
//!
//! [`MatchSource`] is the seam between the service and wherever matches
//! come from. [`HttpMatchSource`] reads the public feed over HTTP;
//! [`CoalescingSource`] wraps any source so concurrent callers share one
//! in-flight fetch.

pub mod coalesce;
pub mod http;

use std::fmt;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde_json::Value;

use crate::error::UpstreamError;

pub use coalesce::CoalescingSource;
pub use http::HttpMatchSource;

/// The full upstream collection as raw JSON records, shared between
/// concurrent readers. Records are served exactly as received.
pub type MatchList = Arc<[Value]>;

/// A source of the complete, unpaginated match collection.
///
/// Every call fetches fresh data; implementations must not cache results
/// across calls.
pub trait MatchSource: Send + Sync + fmt::Debug {
    /// Fetches every match, in upstream order.
    fn fetch_matches(&self) -> BoxFuture<'_, Result<MatchList, UpstreamError>>;
}
