//! HTTP client for `GET /api/matches`.

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tracing::instrument;

use super::PageSource;
use crate::api::dto::MatchPageResponse;
use crate::domain::{MatchPage, PageNumber};
use crate::error::{ClientError, ErrorResponse};

/// Default backend base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Fetches match pages from the backend.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Creates a client for the backend at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Creates a client using the provided [`reqwest::Client`].
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: client,
            base_url,
        }
    }

    /// Backend base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches one page of matches.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] if the request fails, the backend answers
    /// with a non-success status, or the body is not a match page.
    #[instrument(skip(self))]
    pub async fn get_page(&self, page: PageNumber) -> Result<MatchPage, ClientError> {
        let url = format!("{}/api/matches?page={page}", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| ClientError::Http {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .map(|body| body.error)
                .unwrap_or_default();
            return Err(ClientError::UnexpectedStatus {
                url,
                status: status.as_u16(),
                message,
            });
        }

        let body: MatchPageResponse = response
            .json()
            .await
            .map_err(|source| ClientError::Decode { url, source })?;
        Ok(body.into())
    }
}

impl Default for BackendClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl PageSource for BackendClient {
    fn fetch_page(&self, page: PageNumber) -> BoxFuture<'_, Result<MatchPage, ClientError>> {
        self.get_page(page).boxed()
    }
}
