//! HTTP server setup with Axum

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::rest::backups;
use super::state::AppState;
use crate::config::HttpConfig;

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>, config: &HttpConfig) -> Router {
    // CORS configuration - allow all origins for development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        // Health check
        .route("/health", get(health_check))
        // Backup endpoints; the static `latest` route wins over `:filename`
        .route("/api/backup", post(backups::save_backup))
        .route("/api/backups", get(backups::list_backups))
        .route("/api/backup/latest", get(backups::get_latest_backup))
        .route("/api/backup/:filename", get(backups::get_backup));

    // Frontend assets for everything else
    if let Some(dir) = &config.static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(DefaultBodyLimit::max(config.body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
