//! HTTP client for the upstream match feed.

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use super::{MatchList, MatchSource};
use crate::error::UpstreamError;

/// Envelope returned by the upstream feed: `{"response": [Match, ...]}`.
///
/// Records are kept as raw JSON; they are never reshaped on the way
/// through.
#[derive(Debug, Deserialize)]
struct UpstreamEnvelope {
    #[serde(default)]
    response: Option<Vec<Value>>,
}

/// Reads the match collection from an HTTP JSON feed.
///
/// The same unauthenticated `GET` is issued on every call.
#[derive(Debug, Clone)]
pub struct HttpMatchSource {
    http: reqwest::Client,
    url: String,
}

impl HttpMatchSource {
    /// Creates a source with a default [`reqwest::Client`].
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    /// Creates a source using the provided [`reqwest::Client`].
    ///
    /// Use this to configure timeouts, proxies, headers, etc.
    #[must_use]
    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http: client,
            url: url.into(),
        }
    }

    /// Upstream URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<MatchList, UpstreamError> {
        let response =
            self.http
                .get(&self.url)
                .send()
                .await
                .map_err(|e| UpstreamError::Http {
                    url: self.url.clone(),
                    message: e.to_string(),
                })?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::UnexpectedStatus {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let envelope: UpstreamEnvelope =
            response.json().await.map_err(|e| UpstreamError::Decode {
                url: self.url.clone(),
                message: e.to_string(),
            })?;

        let matches = envelope.response.unwrap_or_default();
        tracing::debug!(count = matches.len(), "fetched upstream matches");
        Ok(matches.into())
    }
}

impl MatchSource for HttpMatchSource {
    fn fetch_matches(&self) -> BoxFuture<'_, Result<MatchList, UpstreamError>> {
        self.fetch().boxed()
    }
}
