//! Download endpoints for finished extractions
//!
//! - GET /download/:id/text - `extracted_text.txt`
//! - GET /download/:id/pdf  - `extracted_text.pdf`

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
    routing::get,
    Router,
};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::export::render_text_pdf;
use crate::extract::ExtractionReport;
use crate::state::AppState;

pub const TEXT_FILE_NAME: &str = "extracted_text.txt";
pub const PDF_FILE_NAME: &str = "extracted_text.pdf";

/// Create the download router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:id/text", get(download_text))
        .route("/:id/pdf", get(download_pdf))
}

async fn download_text(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let report = lookup(&state, &id).await?;
    attachment(
        "text/plain; charset=utf-8",
        TEXT_FILE_NAME,
        report.text.clone().into_bytes(),
    )
}

async fn download_pdf(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let report = lookup(&state, &id).await?;
    let title = format!("Extracted from {}", report.file_name);

    let text = report.text.clone();
    let bytes = tokio::task::spawn_blocking(move || render_text_pdf(&text, &title))
        .await
        .map_err(|e| AppError::Internal(format!("PDF export task failed: {}", e)))??;

    tracing::debug!(%id, size = bytes.len(), "Rendered text PDF");
    attachment("application/pdf", PDF_FILE_NAME, bytes)
}

async fn lookup(state: &AppState, id: &str) -> Result<Arc<ExtractionReport>> {
    let not_found = || AppError::NotFound(format!("Result '{}' not found or expired", id));
    let id = Uuid::parse_str(id).map_err(|_| not_found())?;
    state.results().get(&id).await.ok_or_else(not_found)
}

fn attachment(content_type: &str, file_name: &str, bytes: Vec<u8>) -> Result<Response> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, bytes.len())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file_name),
        )
        .body(Body::from(bytes))
        .map_err(|e| AppError::Internal(e.to_string()))
}
