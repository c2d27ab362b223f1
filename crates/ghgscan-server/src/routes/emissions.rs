//! Rollup and scoring over previously extracted figures.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use ghgscan_runtime::{calculate_emissions, scoring, RollupRequest, ScoreRequest};

use super::bad_request;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/calculate-emissions", post(calculate))
        .route("/score", post(score))
}

/// POST /api/calculate-emissions: `{documents: [...]}`.
async fn calculate(Json(body): Json<serde_json::Value>) -> Response {
    let request: RollupRequest = match serde_json::from_value(body) {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!("Invalid rollup body: {}", e);
            return bad_request("Invalid documents data").into_response();
        }
    };

    Json(calculate_emissions(&request.documents)).into_response()
}

/// POST /api/score: carbon footprint, ESG score and sector benchmark.
async fn score(Json(request): Json<ScoreRequest>) -> Response {
    match scoring::score(&request) {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => bad_request(e.to_string()).into_response(),
    }
}
