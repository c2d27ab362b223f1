//! Document analysis routes: single report upload and batch upload.

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use ghgscan_core::Error;
use ghgscan_ingest::{is_supported_media_type, media_type_from_filename, RawDocument};
use tracing::{error, info, warn};

use super::bad_request;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/analyze-sustainability-report", post(analyze_report))
        .route("/batch-analyze", post(batch_analyze))
}

type Rejection = (StatusCode, Json<serde_json::Value>);

/// Files and flags read from one multipart upload.
struct UploadForm {
    documents: Vec<RawDocument>,
    include_summary: bool,
}

/// POST /api/analyze-sustainability-report: multipart `file` + `include_summary`.
async fn analyze_report(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Response {
    let form = match read_upload(&state, &mut multipart, "file", 1).await {
        Ok(form) => form,
        Err(rejection) => return rejection.into_response(),
    };
    let Some(doc) = form.documents.into_iter().next() else {
        return bad_request("No file uploaded").into_response();
    };

    match state.analyzer.analyze_document(doc, form.include_summary).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => analysis_error(e).into_response(),
    }
}

/// POST /api/batch-analyze: multipart `files` + `include_summary`.
async fn batch_analyze(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Response {
    let max_files = state.config.max_batch_files;
    let form = match read_upload(&state, &mut multipart, "files", max_files).await {
        Ok(form) => form,
        Err(rejection) => return rejection.into_response(),
    };
    if form.documents.is_empty() {
        return bad_request("No files uploaded").into_response();
    }

    info!("Batch upload: {} files", form.documents.len());
    let report = state.analyzer.analyze_batch(form.documents, form.include_summary).await;
    Json(report).into_response()
}

/// Read every `file_field` part plus the `include_summary` flag, applying
/// the media type, size and count limits.
async fn read_upload(
    state: &AppState,
    multipart: &mut Multipart,
    file_field: &str,
    max_files: usize,
) -> Result<UploadForm, Rejection> {
    let max_bytes = state.config.max_upload_bytes;
    let mut form = UploadForm {
        documents: Vec::new(),
        include_summary: false,
    };

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(multipart_error(e)),
        };
        let name = field.name().unwrap_or_default().to_string();

        if name == "include_summary" {
            form.include_summary = matches!(field.text().await.as_deref(), Ok("true"));
            continue;
        }
        if name != file_field {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };

        let media_type = field
            .content_type()
            .map(str::to_string)
            .or_else(|| media_type_from_filename(&filename).map(String::from))
            .unwrap_or_default();
        if !is_supported_media_type(&media_type) {
            warn!("Rejected upload {} ({:?})", filename, media_type);
            return Err(bad_request("Only PDF and image files are allowed"));
        }
        if form.documents.len() >= max_files {
            return Err(bad_request(format!("Too many files. Maximum is {} per request.", max_files)));
        }

        let bytes = field.bytes().await.map_err(multipart_error)?;
        if bytes.len() > max_bytes {
            return Err(bad_request(format!(
                "File too large. Maximum size is {}MB.",
                max_bytes / (1024 * 1024)
            )));
        }

        form.documents
            .push(RawDocument::new(bytes.to_vec(), filename).with_media_type(media_type));
    }

    Ok(form)
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> Rejection {
    warn!("Rejected multipart body: {}", e);
    (e.status(), Json(serde_json::json!({ "error": e.body_text() })))
}

fn analysis_error(e: Error) -> Rejection {
    match e {
        Error::InvalidInput(message) => bad_request(message),
        other => {
            error!("Analysis failed: {}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": "Analysis failed",
                    "message": other.to_string(),
                })),
            )
        }
    }
}
