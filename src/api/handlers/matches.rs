//! Match listing handler.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{MatchPageResponse, PageQuery};
use crate::app_state::AppState;
use crate::error::{ApiError, ErrorResponse};

/// `GET /api/matches` — One page of upcoming matches.
///
/// # Errors
///
/// Returns [`ApiError::UpstreamUnavailable`] when the upstream feed
/// cannot be fetched.
#[utoipa::path(
    get,
    path = "/api/matches",
    tag = "Matches",
    summary = "List matches",
    description = "Fetches the upstream match feed and returns one page of 9 matches with pagination totals. Pages past the end are empty.",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of matches", body = MatchPageResponse),
        (status = 500, description = "Upstream feed unavailable", body = ErrorResponse),
    )
)]
pub async fn list_matches(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<MatchPageResponse>, ApiError> {
    let query = PageQuery::from_pairs(&pairs);
    let page = state.match_service.get_page(query.page_number()).await?;
    Ok(Json(page.into()))
}

/// Match routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/matches", get(list_matches))
}
