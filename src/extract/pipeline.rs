//! Extraction pipeline
//!
//! Text layer first, OCR when the text layer is missing or unusable:
//!
//! 1. count pages (informational only)
//! 2. unless OCR is forced, pull the embedded text layer
//! 3. if that text is too short or garbled, rasterize every page and OCR it
//!
//! Problems along the way are recorded as status messages on the report
//! rather than aborting, so the user always sees what happened.

use std::path::Path;
use std::sync::Arc;

use super::error::{ExtractError, Result};
use super::quality::TextQuality;
use super::text;
use super::types::{ExtractOptions, ExtractionMethod, ExtractionReport};
use crate::config::ExtractionConfig;
use crate::tools::{OcrEngine, Rasterizer};

const PDF_SIGNATURE: &[u8] = b"%PDF-";

/// Shown when `pdftoppm` cannot be run
pub const POPPLER_MISSING_HELP: &str = "Poppler is not installed or not in PATH. OCR cannot proceed. \
Install poppler-utils (Linux: `apt install poppler-utils`, macOS: `brew install poppler`, \
Windows: download a Poppler release and extract it, e.g. to C:\\poppler), then either add its \
bin directory to PATH or enter that bin directory as the Poppler path.";

/// Shown when `tesseract` cannot be run
pub const TESSERACT_MISSING_HELP: &str = "Tesseract is not installed or not in PATH. OCR cannot proceed. \
Install tesseract-ocr with the language packs you need, then either add it to PATH or enter the \
executable (or its install directory) as the Tesseract path.";

/// Runs the text-or-OCR pipeline with a given rasterizer and OCR engine
pub struct Extractor {
    rasterizer: Arc<dyn Rasterizer>,
    ocr: Arc<dyn OcrEngine>,
    settings: ExtractionConfig,
}

impl Extractor {
    pub fn new(
        rasterizer: Arc<dyn Rasterizer>,
        ocr: Arc<dyn OcrEngine>,
        settings: ExtractionConfig,
    ) -> Self {
        Self {
            rasterizer,
            ocr,
            settings,
        }
    }

    /// Process one uploaded PDF
    ///
    /// Only input validation and scratch file errors are returned as `Err`;
    /// everything else ends up in the report's messages.
    pub async fn extract(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        options: &ExtractOptions,
    ) -> Result<ExtractionReport> {
        validate_upload(file_name, &bytes)?;

        let mut report = ExtractionReport::new(file_name);
        let bytes = Arc::new(bytes);

        let scratch = tempfile::Builder::new().prefix("pdf-ocr-").tempdir()?;
        let pdf_path = scratch.path().join("input.pdf");
        tokio::fs::write(&pdf_path, bytes.as_slice()).await?;

        tracing::info!(
            file_name,
            size = bytes.len(),
            force_ocr = options.force_ocr,
            "Processing upload"
        );

        match text::page_count_blocking(Arc::clone(&bytes)).await {
            Ok(count) => {
                report.page_count = Some(count);
                report.info(format!("PDF has {} pages", count));
            }
            Err(e) => report.warning(format!("Could not determine page count: {}", e)),
        }

        if !options.force_ocr {
            self.extract_text_layer(&mut report, Arc::clone(&bytes)).await;
        }

        if options.force_ocr || !self.is_usable(&report.text) {
            report.warning("Text-based extraction failed or OCR was forced. Switching to OCR mode");
            self.run_ocr(&mut report, &pdf_path, scratch.path(), options).await;
        }

        if report.has_text() {
            report.success("Text extraction complete!");
        } else {
            report.method = ExtractionMethod::None;
            report.error("Failed to extract any text. Check the PDF or try another one.");
        }

        tracing::info!(
            file_name,
            method = ?report.method,
            chars = report.text.len(),
            "Extraction finished"
        );

        Ok(report)
    }

    fn is_usable(&self, text: &str) -> bool {
        TextQuality::assess(text)
            .is_usable(self.settings.min_text_chars, self.settings.max_garbage_ratio)
    }

    async fn extract_text_layer(&self, report: &mut ExtractionReport, bytes: Arc<Vec<u8>>) {
        match text::extract_pages_blocking(bytes).await {
            Ok(pages) => {
                for (i, page_text) in pages.iter().enumerate() {
                    if !page_text.trim().is_empty() {
                        report.push_page(i + 1, page_text);
                    }
                }
                report.method = ExtractionMethod::Text;

                let quality = TextQuality::assess(&report.text);
                tracing::debug!(
                    chars = quality.trimmed_chars,
                    visible = quality.visible_chars,
                    garbage_ratio = quality.garbage_ratio(),
                    "Text layer assessed"
                );
                if self.is_usable(&report.text) {
                    report.success("Text-based extraction successful!");
                }
            }
            Err(e) => {
                tracing::warn!("Text layer extraction failed: {}", e);
                report.warning(format!("Text-based extraction error: {}", e));
                report.clear_text();
            }
        }
    }

    async fn run_ocr(
        &self,
        report: &mut ExtractionReport,
        pdf_path: &Path,
        scratch: &Path,
        options: &ExtractOptions,
    ) {
        if !self.rasterizer.is_available().await {
            tracing::warn!("pdftoppm unavailable, keeping text layer result");
            report.error(POPPLER_MISSING_HELP);
            return;
        }
        if !self.ocr.is_available().await {
            tracing::warn!("tesseract unavailable, keeping text layer result");
            report.error(TESSERACT_MISSING_HELP);
            return;
        }

        report.clear_text();

        let images = match self.rasterizer.rasterize(pdf_path, options.dpi, scratch).await {
            Ok(images) => images,
            Err(e) => {
                tracing::error!("Rasterization failed: {}", e);
                report.error(format!("OCR processing error: {}", e));
                return;
            }
        };

        report.method = ExtractionMethod::Ocr;
        report.success(format!(
            "Successfully converted {} pages to images for OCR",
            images.len()
        ));

        let total = images.len();
        for (i, image) in images.iter().enumerate() {
            let page = i + 1;
            match self.ocr.recognize(image, &options.language).await {
                Ok(page_text) => {
                    tracing::info!(page, total, chars = page_text.len(), "OCR page done");
                    report.push_page(page, &page_text);
                    report.info(format!("Processed page {}/{}", page, total));
                }
                Err(e) => {
                    tracing::warn!(page, total, "OCR failed: {}", e);
                    report.error(format!("OCR error on page {}: {}", page, e));
                }
            }
        }
    }
}

/// Reject uploads that are obviously not PDFs
pub fn validate_upload(file_name: &str, bytes: &[u8]) -> Result<()> {
    let has_pdf_extension = Path::new(file_name)
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("pdf"));
    if !has_pdf_extension {
        return Err(ExtractError::InvalidInput(format!(
            "File is not a PDF: {}",
            file_name
        )));
    }
    if bytes.is_empty() {
        return Err(ExtractError::InvalidInput("Uploaded file is empty".to_string()));
    }
    if !bytes.starts_with(PDF_SIGNATURE) {
        return Err(ExtractError::InvalidInput(format!(
            "{} does not look like a PDF document",
            file_name
        )));
    }
    Ok(())
}
