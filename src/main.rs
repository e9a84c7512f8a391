//! upcoming-matches server entry point.
//!
//! Starts the Axum HTTP server serving `/api/matches`.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use upcoming_matches::api;
use upcoming_matches::app_state::AppState;
use upcoming_matches::config::{LogFormat, ServerConfig};
use upcoming_matches::service::MatchService;
use upcoming_matches::upstream::{CoalescingSource, HttpMatchSource, MatchSource};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = ServerConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(addr = %config.listen_addr, upstream = %config.upstream_url, "starting upcoming-matches");

    // Build upstream layer
    let mut http = reqwest::Client::builder();
    if let Some(timeout) = config.upstream_timeout {
        http = http.timeout(timeout);
    }
    let upstream: Arc<dyn MatchSource> = Arc::new(HttpMatchSource::with_client(
        http.build()?,
        config.upstream_url.clone(),
    ));
    let source: Arc<dyn MatchSource> = if config.upstream_coalesce {
        tracing::info!("coalescing concurrent upstream fetches");
        Arc::new(CoalescingSource::new(upstream))
    } else {
        upstream
    };

    // Build application state
    let app_state = AppState {
        match_service: Arc::new(MatchService::new(source)),
    };

    // Start server
    let app = api::build_app(app_state);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
