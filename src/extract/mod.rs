//! PDF to text extraction
//!
//! Tries the embedded text layer first and falls back to OCR for scanned
//! or image-only documents.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pdf_ocr_extractor::extract::{ExtractOptions, Extractor};
//!
//! let tools = ToolPaths::resolve(&config.tools, &ToolOverrides::default());
//! let extractor = Extractor::new(
//!     Arc::new(tools.rasterizer()),
//!     Arc::new(tools.ocr_engine()),
//!     config.extraction.clone(),
//! );
//! let report = extractor.extract("scan.pdf", bytes, &options).await?;
//! println!("{}", report.text);
//! ```

mod error;
mod pipeline;
mod quality;
pub mod text;
mod types;

pub use error::{ExtractError, Result};
pub use pipeline::{validate_upload, Extractor, POPPLER_MISSING_HELP, TESSERACT_MISSING_HELP};
pub use quality::TextQuality;
pub use types::{
    format_page, ExtractOptions, ExtractionMethod, ExtractionReport, MessageLevel, PageText,
    StatusMessage,
};
