//! Match service: fetches the upstream collection and slices pages.

use std::sync::Arc;

use serde_json::Value;

use crate::domain::{MatchPage, PageNumber};
use crate::error::ApiError;
use crate::upstream::MatchSource;

/// Serves fixed-size pages of the upstream match collection.
///
/// Stateless: every call fetches the whole collection from the
/// [`MatchSource`] and slices it. Nothing is cached between calls, and
/// records are served exactly as the upstream sent them.
#[derive(Debug, Clone)]
pub struct MatchService {
    source: Arc<dyn MatchSource>,
}

impl MatchService {
    /// Creates a new `MatchService` reading from `source`.
    #[must_use]
    pub fn new(source: Arc<dyn MatchSource>) -> Self {
        Self { source }
    }

    /// Returns one page of matches with pagination totals.
    ///
    /// Pages past the end come back empty, never as an error.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UpstreamUnavailable`] if the upstream fetch
    /// fails. No partial data is returned and the fetch is not retried.
    pub async fn get_page(&self, page: PageNumber) -> Result<MatchPage<Value>, ApiError> {
        let all = self.source.fetch_matches().await.map_err(|e| {
            tracing::error!(%page, error = %e, "upstream fetch failed");
            ApiError::from(e)
        })?;

        let result = MatchPage::slice(&all, page);
        tracing::debug!(
            %page,
            total = result.total,
            total_pages = result.total_pages,
            returned = result.matches.len(),
            "served match page"
        );
        Ok(result)
    }
}
