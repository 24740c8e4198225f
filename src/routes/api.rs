//! JSON extraction API
//!
//! - POST /api/v1/extract      - multipart upload, same fields as the form
//! - GET  /api/v1/results/:id  - fetch a stored report

use axum::{
    extract::{Multipart, Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use super::upload::{run_extraction, UploadForm};
use crate::error::{AppError, Result};
use crate::extract::ExtractionReport;
use crate::state::AppState;

/// Create the API router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/extract", post(extract))
        .route("/results/:id", get(get_result))
}

/// Extraction response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResponse {
    pub id: Uuid,
    pub text_url: String,
    pub pdf_url: String,
    #[serde(flatten)]
    pub report: ExtractionReport,
}

impl ExtractResponse {
    fn new(id: Uuid, report: ExtractionReport) -> Self {
        Self {
            id,
            text_url: format!("/download/{}/text", id),
            pdf_url: format!("/download/{}/pdf", id),
            report,
        }
    }
}

async fn extract(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ExtractResponse>> {
    let form = UploadForm::from_multipart(multipart, state.config()).await?;
    let (id, report) = run_extraction(&state, form).await?;
    Ok(Json(ExtractResponse::new(id, (*report).clone())))
}

async fn get_result(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ExtractResponse>> {
    let report = state
        .results()
        .get(&id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Result '{}' not found or expired", id)))?;
    Ok(Json(ExtractResponse::new(id, (*report).clone())))
}
