//! Multipart upload parsing shared by the form and JSON endpoints
//!
//! Fields:
//! - `file` (or `pdf`): the PDF document, required
//! - `dpi`: rasterization resolution, clamped to 72..=600
//! - `language`: tesseract language code
//! - `force_ocr`: any of `on`, `true`, `1`, `yes`
//! - `poppler_path`, `tesseract_path`: tool location overrides

use std::sync::Arc;

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use uuid::Uuid;

use crate::config::{Config, OcrConfig};
use crate::error::{AppError, Result};
use crate::extract::{validate_upload, ExtractOptions, ExtractionReport};
use crate::state::AppState;
use crate::tools::{validate_language, ToolOverrides};

/// A parsed extraction request
#[derive(Debug)]
pub struct UploadForm {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub options: ExtractOptions,
    pub overrides: ToolOverrides,
}

impl UploadForm {
    /// Read all multipart fields, applying configured defaults
    pub async fn from_multipart(mut multipart: Multipart, config: &Config) -> Result<Self> {
        let mut file: Option<(String, Vec<u8>)> = None;
        let mut options = ExtractOptions {
            dpi: config.ocr.dpi,
            language: config.ocr.language.clone(),
            force_ocr: false,
        };
        let mut overrides = ToolOverrides::default();
        let limit = config.upload.max_bytes;
        let read = |e: MultipartError| read_error(e, limit);

        while let Some(field) = multipart.next_field().await.map_err(read)? {
            let name = field.name().unwrap_or("").to_string();
            tracing::debug!(
                "Received field: name='{}', filename={:?}",
                name,
                field.file_name()
            );

            match name.as_str() {
                "file" | "pdf" => {
                    let file_name = field
                        .file_name()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "upload.pdf".to_string());
                    let data = field.bytes().await.map_err(read)?;
                    tracing::debug!("Read {} bytes of file data", data.len());
                    file = Some((file_name, data.to_vec()));
                }
                "dpi" => {
                    let raw = field.text().await.map_err(read)?;
                    let dpi: u32 = raw.trim().parse().map_err(|_| {
                        AppError::BadRequest(format!("Invalid DPI value: {:?}", raw))
                    })?;
                    options.dpi = OcrConfig::clamp_dpi(dpi);
                }
                "language" => {
                    let lang = field.text().await.map_err(read)?.trim().to_string();
                    if !lang.is_empty() {
                        validate_language(&lang)?;
                        options.language = lang;
                    }
                }
                "force_ocr" => {
                    let raw = field.text().await.map_err(read)?;
                    options.force_ocr = is_checked(&raw);
                }
                "poppler_path" => {
                    overrides.poppler_path = non_blank(field.text().await.map_err(read)?)
                }
                "tesseract_path" => {
                    overrides.tesseract_path = non_blank(field.text().await.map_err(read)?)
                }
                _ => tracing::debug!("Ignoring unknown field '{}'", name),
            }
        }

        let (file_name, bytes) = file.ok_or_else(|| {
            AppError::BadRequest("No file provided. Use field name 'file' or 'pdf'".to_string())
        })?;

        // Browsers submit an empty part when no file was chosen
        if file_name.is_empty() && bytes.is_empty() {
            return Err(AppError::BadRequest("Please choose a PDF file to upload".to_string()));
        }

        validate_upload(&file_name, &bytes)?;

        Ok(Self {
            file_name,
            bytes,
            options,
            overrides,
        })
    }
}

/// Run the pipeline for an upload and keep the report for downloads
pub async fn run_extraction(
    state: &AppState,
    form: UploadForm,
) -> Result<(Uuid, Arc<ExtractionReport>)> {
    let extractor = state.extractor(&form.overrides);
    let report = extractor
        .extract(&form.file_name, form.bytes, &form.options)
        .await?;

    let report = Arc::new(report);
    let id = state.results().insert(Arc::clone(&report)).await;

    tracing::info!(%id, file_name = %report.file_name, "Stored extraction result");
    Ok((id, report))
}

/// Body limit hits surface as multipart read errors
fn read_error(error: MultipartError, limit: usize) -> AppError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!("Upload rejected, over the {} byte limit", limit);
        AppError::PayloadTooLarge(limit)
    } else {
        AppError::Multipart(error)
    }
}

fn is_checked(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "on" | "true" | "1" | "yes"
    )
}

fn non_blank(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_checked() {
        assert!(is_checked("on"));
        assert!(is_checked(" TRUE "));
        assert!(is_checked("1"));
        assert!(!is_checked(""));
        assert!(!is_checked("off"));
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank("  ".to_string()), None);
        assert_eq!(non_blank(" /opt/bin ".to_string()), Some("/opt/bin".to_string()));
    }
}
