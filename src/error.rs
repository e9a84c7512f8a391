//! Error types with HTTP status code mapping.
//!
//! [`UpstreamError`] describes why the upstream feed could not be read.
//! [`ApiError`] is what handlers return; each variant maps to a status
//! code and a JSON body of the form `{"error": "<message>"}`.
//! [`ClientError`] covers the client side of the match API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// JSON error response body.
///
/// ```json
/// { "error": "Failed to fetch matches" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

/// Failure to obtain the upstream match list.
///
/// Messages are stored as strings so a single failed fetch can be shared
/// by every request waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpstreamError {
    /// The request could not be sent or the connection failed.
    #[error("upstream request to {url} failed: {message}")]
    Http {
        /// Upstream URL.
        url: String,
        /// Transport error description.
        message: String,
    },

    /// The upstream answered with a non-success status.
    #[error("upstream {url} returned status {status}")]
    UnexpectedStatus {
        /// Upstream URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The body was not the expected JSON document.
    #[error("upstream {url} returned an unreadable body: {message}")]
    Decode {
        /// Upstream URL.
        url: String,
        /// Decoder error description.
        message: String,
    },
}

/// Failure talking to the match API from the client side.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request could not be sent or the connection failed.
    #[error("request to {url} failed: {source}")]
    Http {
        /// Request URL.
        url: String,
        /// Underlying transport error.
        source: reqwest::Error,
    },

    /// The API answered with a non-success status.
    #[error("{url} returned status {status}: {message}")]
    UnexpectedStatus {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// The `error` field of the body, if it had one.
        message: String,
    },

    /// The body was not a match page.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        /// Request URL.
        url: String,
        /// Underlying decode error.
        source: reqwest::Error,
    },
}

/// Server-side error enum with HTTP status code mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The upstream feed could not be fetched or parsed.
    #[error("Failed to fetch matches")]
    UpstreamUnavailable(#[source] UpstreamError),

    /// No route matches the request path.
    #[error("route not found: {0}")]
    NotFound(String),
}

impl ApiError {
    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::UpstreamUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        Self::UpstreamUnavailable(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.to_string(),
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
