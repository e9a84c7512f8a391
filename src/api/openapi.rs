//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use crate::api::dto::MatchPageResponse;
use crate::api::handlers::system::HealthResponse;
use crate::error::ErrorResponse;

/// Path of the generated OpenAPI JSON document.
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// OpenAPI description of every route.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "upcoming-matches",
        description = "Paginated upcoming soccer matches"
    ),
    paths(
        crate::api::handlers::matches::list_matches,
        crate::api::handlers::system::health_handler,
    ),
    components(schemas(MatchPageResponse, ErrorResponse, HealthResponse)),
    tags(
        (name = "Matches", description = "Paginated match listing"),
        (name = "System", description = "Service health"),
    )
)]
pub struct ApiDoc;
