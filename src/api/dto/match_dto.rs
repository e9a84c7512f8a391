//! Match listing DTOs.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Match, MatchPage, PageNumber};

/// Query parameters for `GET /api/matches`.
///
/// `page` is taken as a raw string so malformed values fall back to the
/// first page instead of being rejected.
#[derive(Debug, Clone, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page number (1-indexed). Defaults to 1 when absent or not a number.
    #[param(value_type = Option<u32>, example = 1)]
    pub page: Option<String>,
}

impl PageQuery {
    /// Builds the query from decoded key/value pairs.
    ///
    /// When `page` is repeated the first occurrence wins.
    #[must_use]
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            page: pairs
                .iter()
                .find(|(key, _)| key == "page")
                .map(|(_, value)| value.clone()),
        }
    }

    /// Resolves the requested page.
    #[must_use]
    pub fn page_number(&self) -> PageNumber {
        PageNumber::parse_lenient(self.page.as_deref())
    }
}

/// Response body for `GET /api/matches`.
///
/// `matches` holds the upstream records verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchPageResponse {
    /// The page served.
    pub page: u32,
    /// Number of matches upstream.
    pub total: usize,
    /// Number of pages upstream.
    pub total_pages: usize,
    /// Matches on this page, in upstream order.
    #[schema(value_type = Vec<Object>)]
    pub matches: Vec<Value>,
}

impl From<MatchPage<Value>> for MatchPageResponse {
    fn from(page: MatchPage<Value>) -> Self {
        Self {
            page: page.page.get(),
            total: page.total,
            total_pages: page.total_pages,
            matches: page.matches,
        }
    }
}

impl From<MatchPageResponse> for MatchPage {
    /// Reads each record with [`Match::from_value`]. A `page` of `0` on
    /// the wire is read as page 1.
    fn from(response: MatchPageResponse) -> Self {
        MatchPage {
            page: PageNumber::new(response.page).unwrap_or_default(),
            total: response.total,
            total_pages: response.total_pages,
            matches: response.matches,
        }
        .map(Match::from_value)
    }
}
