//! HTTP route handlers.

pub mod analyze;
pub mod emissions;
pub mod health;
pub mod summary;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::Json;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the main Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    // A batch may carry the maximum number of files at the maximum size each.
    let body_limit = state
        .config
        .max_upload_bytes
        .saturating_mul(state.config.max_batch_files.max(1));

    Router::new()
        .nest("/api", api_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(health::routes())
        .merge(analyze::routes())
        .merge(emissions::routes())
        .merge(summary::routes())
}

/// `(400, {"error": message})`.
pub(crate) fn bad_request(message: impl Into<String>) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message.into() })),
    )
}
