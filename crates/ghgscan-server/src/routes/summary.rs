//! Summary provider configuration.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use ghgscan_summary::{LLMConfigResponse, LLMConfigUpdate, SummaryEngine};
use tracing::error;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/summary/config", get(get_config).put(update_config))
}

async fn get_config(State(state): State<Arc<AppState>>) -> Json<LLMConfigResponse> {
    Json(state.llm_config.read().to_response())
}

/// Persist the update, then commit it and swap the analyzer's summary
/// engine to match. A failed save leaves both untouched.
async fn update_config(
    State(state): State<Arc<AppState>>,
    Json(update): Json<LLMConfigUpdate>,
) -> impl IntoResponse {
    let mut config = state.llm_config.write();
    let mut updated = config.clone();
    updated.apply_update(&update);

    if let Err(e) = updated.save() {
        error!("Failed to save summary config: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": format!("Failed to save config: {}", e) })),
        )
            .into_response();
    }

    state
        .analyzer
        .set_summary_engine(SummaryEngine::from_config(&updated, state.config.summary_timeout));
    let response = updated.to_response();
    *config = updated;

    (StatusCode::OK, Json(response)).into_response()
}
