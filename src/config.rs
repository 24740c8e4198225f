//! Configuration management for the PDF extractor server

use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Lowest rasterization DPI accepted from the form
pub const MIN_DPI: u32 = 72;
/// Highest rasterization DPI accepted from the form
pub const MAX_DPI: u32 = 600;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub tools: ToolsConfig,
    pub ocr: OcrConfig,
    pub extraction: ExtractionConfig,
    pub upload: UploadConfig,
    pub results: ResultsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Locations of the external binaries
#[derive(Debug, Clone, Deserialize)]
pub struct ToolsConfig {
    /// Poppler `bin` directory; `None` means look up `pdftoppm` on PATH
    pub poppler_path: Option<String>,
    /// Tesseract executable or install directory; `None` means PATH
    pub tesseract_path: Option<String>,
    /// Whether the form may override the paths above per request
    pub allow_overrides: bool,
    /// Upper bound for a single external tool invocation
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    pub dpi: u32,
    pub language: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
    /// Text layers shorter than this (non-whitespace chars) trigger OCR
    pub min_text_chars: usize,
    /// Text layers with a higher share of unprintable chars trigger OCR
    pub max_garbage_ratio: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    pub max_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResultsConfig {
    pub capacity: usize,
    pub ttl_secs: i64,
}

impl OcrConfig {
    /// Clamp a requested DPI into the supported range
    pub fn clamp_dpi(dpi: u32) -> u32 {
        dpi.clamp(MIN_DPI, MAX_DPI)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            tools: ToolsConfig {
                poppler_path: None,
                tesseract_path: None,
                allow_overrides: true,
                timeout_secs: 300,
            },
            ocr: OcrConfig {
                dpi: 300,
                language: "eng".to_string(),
            },
            extraction: ExtractionConfig {
                min_text_chars: 100,
                max_garbage_ratio: 0.3,
            },
            upload: UploadConfig {
                max_bytes: 50 * 1024 * 1024,
            },
            results: ResultsConfig {
                capacity: 64,
                ttl_secs: 3600,
            },
        }
    }
}

impl Config {
    /// Read settings from the environment; unset or unparsable values keep
    /// their defaults
    pub fn from_env() -> Self {
        let defaults = Config::default();

        Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_var("SERVER_PORT", defaults.server.port),
            },
            tools: ToolsConfig {
                poppler_path: optional_var("POPPLER_PATH"),
                tesseract_path: optional_var("TESSERACT_PATH"),
                allow_overrides: parse_var("ALLOW_TOOL_OVERRIDES", defaults.tools.allow_overrides),
                timeout_secs: parse_var("TOOL_TIMEOUT_SECS", defaults.tools.timeout_secs),
            },
            ocr: OcrConfig {
                dpi: OcrConfig::clamp_dpi(parse_var("OCR_DPI", defaults.ocr.dpi)),
                language: env::var("OCR_LANGUAGE").unwrap_or(defaults.ocr.language),
            },
            extraction: ExtractionConfig {
                min_text_chars: parse_var("MIN_TEXT_CHARS", defaults.extraction.min_text_chars),
                max_garbage_ratio: parse_var(
                    "MAX_GARBAGE_RATIO",
                    defaults.extraction.max_garbage_ratio,
                ),
            },
            upload: UploadConfig {
                max_bytes: parse_var("MAX_UPLOAD_BYTES", defaults.upload.max_bytes),
            },
            results: ResultsConfig {
                capacity: parse_var("RESULT_CAPACITY", defaults.results.capacity),
                ttl_secs: parse_var("RESULT_TTL_SECS", defaults.results.ttl_secs),
            },
        }
    }
}

/// Read an env var, treating unset and blank the same
fn optional_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid value for {}: {:?}", key, raw);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.ocr.dpi, 300);
        assert_eq!(config.ocr.language, "eng");
        assert_eq!(config.extraction.min_text_chars, 100);
        assert!(config.tools.poppler_path.is_none());
        assert!(config.tools.allow_overrides);
    }

    #[test]
    fn test_clamp_dpi() {
        assert_eq!(OcrConfig::clamp_dpi(10), MIN_DPI);
        assert_eq!(OcrConfig::clamp_dpi(300), 300);
        assert_eq!(OcrConfig::clamp_dpi(1200), MAX_DPI);
    }

    #[test]
    fn test_parse_var_falls_back_on_garbage() {
        std::env::set_var("PDF_OCR_TEST_PORT", "not-a-number");
        assert_eq!(parse_var("PDF_OCR_TEST_PORT", 8080u16), 8080);
        std::env::set_var("PDF_OCR_TEST_PORT", " 9000 ");
        assert_eq!(parse_var("PDF_OCR_TEST_PORT", 8080u16), 9000);
        std::env::remove_var("PDF_OCR_TEST_PORT");
    }

    #[test]
    fn test_from_env_reads_overrides() {
        std::env::set_var("OCR_DPI", "5000");
        std::env::set_var("MIN_TEXT_CHARS", "250");
        std::env::set_var("RESULT_CAPACITY", "lots");

        let config = Config::from_env();
        assert_eq!(config.ocr.dpi, MAX_DPI);
        assert_eq!(config.extraction.min_text_chars, 250);
        assert_eq!(config.results.capacity, 64);

        std::env::remove_var("OCR_DPI");
        std::env::remove_var("MIN_TEXT_CHARS");
        std::env::remove_var("RESULT_CAPACITY");
    }

    #[test]
    fn test_optional_var_blank_is_none() {
        std::env::set_var("PDF_OCR_TEST_BLANK", "   ");
        assert_eq!(optional_var("PDF_OCR_TEST_BLANK"), None);
        std::env::remove_var("PDF_OCR_TEST_BLANK");
    }
}
