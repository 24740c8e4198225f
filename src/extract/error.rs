//! Extraction error types

use thiserror::Error;

/// Errors raised while turning a PDF into text
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Upload is not something we can process
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Text layer extraction failed
    #[error("Text extraction failed: {0}")]
    TextExtraction(String),

    /// PDF structure could not be read
    #[error("Could not read PDF: {0}")]
    PdfStructure(String),

    /// External tool missing or not runnable
    #[error("{tool} is not available: {reason}")]
    ToolUnavailable { tool: &'static str, reason: String },

    /// External tool ran but reported failure
    #[error("{tool} failed: {stderr}")]
    ToolFailed { tool: &'static str, stderr: String },

    /// External tool exceeded the configured time limit
    #[error("{tool} timed out after {secs} seconds")]
    Timeout { tool: &'static str, secs: u64 },

    /// Rasterizer produced no page images
    #[error("Rasterizer produced no page images")]
    NoPages,

    /// OCR language code rejected before reaching tesseract
    #[error("Invalid OCR language code: {0}")]
    InvalidLanguage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExtractError>;
