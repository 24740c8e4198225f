//! External tool integration
//!
//! The heavy lifting of the OCR path is delegated to two binaries:
//! - `pdftoppm` from Poppler rasterizes PDF pages to PNG images
//! - `tesseract` recognizes text in those images
//!
//! Both are located either on `PATH` or through user supplied paths, the
//! same way a desktop install of either tool is usually pointed at.

mod ocr;
mod raster;

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::process::Command;

use crate::config::ToolsConfig;
use crate::extract::{ExtractError, Result};

pub use ocr::{validate_language, OcrEngine, TesseractEngine, OCR_LANGUAGES};
pub use raster::{PopplerRasterizer, Rasterizer};

const TESSERACT_BIN: &str = if cfg!(windows) { "tesseract.exe" } else { "tesseract" };
const PDFTOPPM_BIN: &str = if cfg!(windows) { "pdftoppm.exe" } else { "pdftoppm" };

/// Resolve the tesseract executable.
///
/// An existing file is used as-is; anything else is treated as the
/// install directory that contains the executable.
pub fn resolve_tesseract(path: Option<&str>) -> PathBuf {
    match path.map(str::trim).filter(|p| !p.is_empty()) {
        None => PathBuf::from(TESSERACT_BIN),
        Some(p) if Path::new(p).is_file() => PathBuf::from(p),
        Some(dir) => Path::new(dir).join(TESSERACT_BIN),
    }
}

/// Resolve `pdftoppm` inside an optional Poppler `bin` directory
pub fn resolve_pdftoppm(bin_dir: Option<&str>) -> PathBuf {
    match bin_dir.map(str::trim).filter(|p| !p.is_empty()) {
        None => PathBuf::from(PDFTOPPM_BIN),
        Some(dir) => Path::new(dir).join(PDFTOPPM_BIN),
    }
}

/// Per-request path overrides coming from the form
#[derive(Debug, Clone, Default)]
pub struct ToolOverrides {
    pub poppler_path: Option<String>,
    pub tesseract_path: Option<String>,
}

/// Fully resolved tool locations for one extraction
#[derive(Debug, Clone)]
pub struct ToolPaths {
    pub pdftoppm: PathBuf,
    pub tesseract: PathBuf,
    pub timeout: Duration,
}

impl ToolPaths {
    pub fn resolve(config: &ToolsConfig, overrides: &ToolOverrides) -> Self {
        let pick = |requested: &Option<String>, configured: &Option<String>| {
            let requested = requested
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty());
            match requested {
                Some(p) if config.allow_overrides => Some(p.to_string()),
                Some(p) => {
                    tracing::warn!("Ignoring tool path override {:?}: overrides disabled", p);
                    configured.clone()
                }
                None => configured.clone(),
            }
        };

        let poppler = pick(&overrides.poppler_path, &config.poppler_path);
        let tesseract = pick(&overrides.tesseract_path, &config.tesseract_path);

        Self {
            pdftoppm: resolve_pdftoppm(poppler.as_deref()),
            tesseract: resolve_tesseract(tesseract.as_deref()),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    pub fn rasterizer(&self) -> PopplerRasterizer {
        PopplerRasterizer::new(self.pdftoppm.clone(), self.timeout)
    }

    pub fn ocr_engine(&self) -> TesseractEngine {
        TesseractEngine::new(self.tesseract.clone(), self.timeout)
    }
}

/// Run a prepared command under a time limit, failing on non-zero exit
pub(crate) async fn run_tool(
    tool: &'static str,
    mut cmd: Command,
    limit: Duration,
) -> Result<std::process::Output> {
    cmd.kill_on_drop(true);

    let output = tokio::time::timeout(limit, cmd.output())
        .await
        .map_err(|_| ExtractError::Timeout {
            tool,
            secs: limit.as_secs(),
        })?
        .map_err(|e| ExtractError::ToolUnavailable {
            tool,
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let stderr = if stderr.is_empty() {
            format!("exited with {}", output.status)
        } else {
            stderr
        };
        return Err(ExtractError::ToolFailed { tool, stderr });
    }

    Ok(output)
}


#[cfg(test)]
mod tests {
    use super::*;

    fn tools_config(allow_overrides: bool) -> ToolsConfig {
        ToolsConfig {
            poppler_path: Some("/opt/poppler/bin".to_string()),
            tesseract_path: None,
            allow_overrides,
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_resolve_defaults_to_path_lookup() {
        assert_eq!(resolve_tesseract(None), PathBuf::from(TESSERACT_BIN));
        assert_eq!(resolve_tesseract(Some("  ")), PathBuf::from(TESSERACT_BIN));
        assert_eq!(resolve_pdftoppm(None), PathBuf::from(PDFTOPPM_BIN));
    }

    #[test]
    fn test_resolve_tesseract_directory() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = resolve_tesseract(dir.path().to_str());
        assert_eq!(resolved, dir.path().join(TESSERACT_BIN));
    }

    #[test]
    fn test_resolve_tesseract_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("my-tesseract");
        std::fs::write(&exe, b"").unwrap();

        assert_eq!(resolve_tesseract(exe.to_str()), exe);
    }

    #[test]
    fn test_resolve_pdftoppm_in_bin_dir() {
        assert_eq!(
            resolve_pdftoppm(Some("/opt/poppler/bin")),
            Path::new("/opt/poppler/bin").join(PDFTOPPM_BIN)
        );
    }

    #[test]
    fn test_overrides_win_when_allowed() {
        let overrides = ToolOverrides {
            poppler_path: Some("/custom/bin".to_string()),
            tesseract_path: None,
        };
        let paths = ToolPaths::resolve(&tools_config(true), &overrides);

        assert_eq!(paths.pdftoppm, Path::new("/custom/bin").join(PDFTOPPM_BIN));
        assert_eq!(paths.tesseract, PathBuf::from(TESSERACT_BIN));
        assert_eq!(paths.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_overrides_ignored_when_disabled() {
        let overrides = ToolOverrides {
            poppler_path: Some("/custom/bin".to_string()),
            tesseract_path: Some("/custom/tesseract".to_string()),
        };
        let paths = ToolPaths::resolve(&tools_config(false), &overrides);

        assert_eq!(paths.pdftoppm, Path::new("/opt/poppler/bin").join(PDFTOPPM_BIN));
        assert_eq!(paths.tesseract, PathBuf::from(TESSERACT_BIN));
    }

    fn shell(script: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(script);
        cmd
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_tool_failure_carries_stderr() {
        let cmd = shell("echo 'Syntax Error: Couldn'\\''t read xref table' >&2; exit 1");
        let result = run_tool("pdftoppm", cmd, Duration::from_secs(5)).await;

        match result {
            Err(ExtractError::ToolFailed { tool, stderr }) => {
                assert_eq!(tool, "pdftoppm");
                assert_eq!(stderr, "Syntax Error: Couldn't read xref table");
            }
            other => panic!("expected ToolFailed, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_tool_failure_without_stderr_reports_exit() {
        let result = run_tool("tesseract", shell("exit 3"), Duration::from_secs(5)).await;
        assert!(matches!(
            result,
            Err(ExtractError::ToolFailed { ref stderr, .. }) if stderr.contains("exited with")
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_tool_times_out() {
        let result = run_tool("tesseract", shell("sleep 5"), Duration::from_secs(1)).await;
        assert!(matches!(
            result,
            Err(ExtractError::Timeout { tool: "tesseract", secs: 1 })
        ));
    }

    #[tokio::test]
    async fn test_run_tool_missing_binary() {
        let cmd = Command::new("/nonexistent/definitely-not-a-tool");
        let result = run_tool("fake", cmd, Duration::from_secs(5)).await;
        assert!(matches!(result, Err(ExtractError::ToolUnavailable { tool: "fake", .. })));
    }
}
