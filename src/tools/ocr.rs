//! Character recognition through the `tesseract` CLI

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use super::run_tool;
use crate::extract::{ExtractError, Result};

const TOOL: &str = "tesseract";

/// Language packs offered in the form, first entry is the default
pub const OCR_LANGUAGES: &[(&str, &str)] = &[
    ("eng", "English"),
    ("fra", "French"),
    ("deu", "German"),
    ("spa", "Spanish"),
    ("ita", "Italian"),
    ("por", "Portuguese"),
    ("chi_sim", "Chinese (Simplified)"),
    ("jpn", "Japanese"),
    ("kor", "Korean"),
];

/// OCR engine trait
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Check if the engine can be run
    async fn is_available(&self) -> bool;

    /// Recognize the text in a single page image
    async fn recognize(&self, image: &Path, language: &str) -> Result<String>;
}

/// Validate a tesseract language code to prevent argument injection.
///
/// Accepts combined packs such as `eng+deu` and script names like `chi_sim`.
pub fn validate_language(lang: &str) -> Result<()> {
    if lang.is_empty() || lang.len() > 20 {
        return Err(ExtractError::InvalidLanguage(lang.to_string()));
    }
    if !lang
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '_')
    {
        return Err(ExtractError::InvalidLanguage(lang.to_string()));
    }
    Ok(())
}

/// Tesseract OCR engine
pub struct TesseractEngine {
    executable: PathBuf,
    timeout: Duration,
}

impl TesseractEngine {
    pub fn new(executable: PathBuf, timeout: Duration) -> Self {
        Self {
            executable,
            timeout,
        }
    }

    /// Get tesseract version
    pub async fn version(&self) -> Result<String> {
        let mut cmd = Command::new(&self.executable);
        cmd.arg("--version");
        let output = run_tool(TOOL, cmd, self.timeout).await?;

        // Older releases print the banner on stderr
        let banner = if output.stdout.is_empty() {
            output.stderr
        } else {
            output.stdout
        };
        Ok(String::from_utf8_lossy(&banner)
            .lines()
            .next()
            .unwrap_or_default()
            .trim()
            .to_string())
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    async fn is_available(&self) -> bool {
        match self.version().await {
            Ok(version) => {
                tracing::debug!("Found {}", version);
                true
            }
            Err(e) => {
                tracing::debug!(
                    executable = %self.executable.display(),
                    "tesseract not available: {}",
                    e
                );
                false
            }
        }
    }

    async fn recognize(&self, image: &Path, language: &str) -> Result<String> {
        validate_language(language)?;

        let mut cmd = Command::new(&self.executable);
        cmd.arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(language)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let output = run_tool(TOOL, cmd, self.timeout).await?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
