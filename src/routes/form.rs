//! Browser form endpoints
//!
//! - GET  /         - upload form with configuration sidebar
//! - POST /extract  - run the extraction and render the result page

use axum::{
    extract::{Multipart, State},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};

use super::upload::{run_extraction, UploadForm};
use crate::error::AppError;
use crate::html::{error_page, index_page, result_page, FormDefaults};
use crate::state::AppState;

/// Create the form router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/extract", post(extract))
}

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(index_page(&FormDefaults::from(state.config())))
}

async fn extract(State(state): State<AppState>, multipart: Multipart) -> Response {
    let form = match UploadForm::from_multipart(multipart, state.config()).await {
        Ok(form) => form,
        Err(e) => return html_error(e),
    };

    // Keep the user's sidebar choices on the result page
    let mut defaults = FormDefaults::from(state.config());
    defaults.dpi = form.options.dpi;
    defaults.language = form.options.language.clone();
    defaults.force_ocr = form.options.force_ocr;
    if let Some(path) = &form.overrides.poppler_path {
        defaults.poppler_path = path.clone();
    }
    if let Some(path) = &form.overrides.tesseract_path {
        defaults.tesseract_path = path.clone();
    }

    match run_extraction(&state, form).await {
        Ok((id, report)) => Html(result_page(&id, &report, &defaults)).into_response(),
        Err(e) => html_error(e),
    }
}

fn html_error(error: AppError) -> Response {
    let (status, _, message) = error.parts();
    tracing::warn!(%status, "Form extraction rejected: {}", message);
    (status, Html(error_page(&message))).into_response()
}
