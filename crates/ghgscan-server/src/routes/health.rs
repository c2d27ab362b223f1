use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}

/// GET /api/health
async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let engine = state.analyzer.summary_engine();
    Json(serde_json::json!({
        "status": "healthy",
        "service": "GHG Scan API",
        "version": env!("CARGO_PKG_VERSION"),
        "features": ["PDF Analysis", "OCR Processing", "GHG Extraction", "AI Insights"],
        "summaryProvider": engine.primary_name().unwrap_or("rule-based"),
    }))
}
