//! Client side of the match API.
//!
//! [`BackendClient`] fetches single pages over HTTP. [`MatchFeed`] drives
//! a [`crate::domain::MatchLoader`] with any [`PageSource`], applying the
//! results and publishing snapshots to subscribers.

pub mod backend;
pub mod feed;

use std::fmt;

use futures_util::future::BoxFuture;

use crate::domain::{MatchPage, PageNumber};
use crate::error::ClientError;

pub use backend::BackendClient;
pub use feed::{MatchFeed, Trigger};

/// Something that can fetch one page of matches.
pub trait PageSource: Send + Sync + fmt::Debug {
    /// Fetches `page`.
    fn fetch_page(&self, page: PageNumber) -> BoxFuture<'_, Result<MatchPage, ClientError>>;
}
