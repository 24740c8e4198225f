//! Extraction report types

use serde::{Deserialize, Serialize};

/// How the final text was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMethod {
    /// Embedded text layer
    Text,
    /// Rasterized pages run through OCR
    Ocr,
    /// Nothing usable came out
    None,
}

impl Default for ExtractionMethod {
    fn default() -> Self {
        Self::None
    }
}

/// Severity of a status line shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A status line produced while processing an upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub level: MessageLevel,
    pub text: String,
}

/// Text recovered from one page (1-indexed)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageText {
    pub page: usize,
    pub text: String,
}

/// Options chosen in the form for a single extraction
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub dpi: u32,
    pub language: String,
    pub force_ocr: bool,
}

/// Full outcome of processing one upload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionReport {
    pub file_name: String,
    pub page_count: Option<usize>,
    pub method: ExtractionMethod,
    pub text: String,
    pub pages: Vec<PageText>,
    pub messages: Vec<StatusMessage>,
}

impl ExtractionReport {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            ..Default::default()
        }
    }

    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Append a page using the `--- Page N ---` separator
    pub fn push_page(&mut self, page: usize, text: &str) {
        self.text.push_str(&format_page(page, text));
        self.pages.push(PageText {
            page,
            text: text.to_string(),
        });
    }

    pub fn clear_text(&mut self) {
        self.text.clear();
        self.pages.clear();
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push_message(MessageLevel::Info, text);
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.push_message(MessageLevel::Success, text);
    }

    pub fn warning(&mut self, text: impl Into<String>) {
        self.push_message(MessageLevel::Warning, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push_message(MessageLevel::Error, text);
    }

    fn push_message(&mut self, level: MessageLevel, text: impl Into<String>) {
        self.messages.push(StatusMessage {
            level,
            text: text.into(),
        });
    }
}

/// Page block as it appears in the concatenated output
pub fn format_page(page: usize, text: &str) -> String {
    format!("\n--- Page {} ---\n{}", page, text)
}
