//! Page rasterization through Poppler's `pdftoppm`

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use super::run_tool;
use crate::extract::{ExtractError, Result};

const TOOL: &str = "pdftoppm";
const OUTPUT_PREFIX: &str = "page";

/// Renders PDF pages to image files
#[async_trait]
pub trait Rasterizer: Send + Sync {
    /// Check whether the renderer can be run at all
    async fn is_available(&self) -> bool;

    /// Render every page of `pdf` at `dpi` into `out_dir`.
    ///
    /// Returns the image paths in page order.
    async fn rasterize(&self, pdf: &Path, dpi: u32, out_dir: &Path) -> Result<Vec<PathBuf>>;
}

/// `pdftoppm` based rasterizer
pub struct PopplerRasterizer {
    executable: PathBuf,
    timeout: Duration,
}

impl PopplerRasterizer {
    pub fn new(executable: PathBuf, timeout: Duration) -> Self {
        Self {
            executable,
            timeout,
        }
    }
}

#[async_trait]
impl Rasterizer for PopplerRasterizer {
    async fn is_available(&self) -> bool {
        // `pdftoppm -v` exits non-zero on older Poppler builds, so only
        // spawning is checked.
        let result = Command::new(&self.executable)
            .arg("-v")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match result {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(
                    executable = %self.executable.display(),
                    "pdftoppm not runnable: {}",
                    e
                );
                false
            }
        }
    }

    async fn rasterize(&self, pdf: &Path, dpi: u32, out_dir: &Path) -> Result<Vec<PathBuf>> {
        let mut cmd = Command::new(&self.executable);
        cmd.arg("-png")
            .arg("-r")
            .arg(dpi.to_string())
            .arg(pdf)
            .arg(out_dir.join(OUTPUT_PREFIX))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        tracing::debug!(dpi, pdf = %pdf.display(), "Running pdftoppm");
        run_tool(TOOL, cmd, self.timeout).await?;

        let images = collect_page_images(out_dir)?;
        if images.is_empty() {
            return Err(ExtractError::NoPages);
        }

        tracing::debug!("pdftoppm rendered {} pages", images.len());
        Ok(images)
    }
}

/// List `page-N.png` files sorted by page number.
///
/// `pdftoppm` zero-pads the page suffix to the width of the last page
/// number, so the suffix is compared numerically.
fn collect_page_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut images: Vec<(u32, PathBuf)> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().map_or(false, |ext| ext == "png"))
        .filter_map(|path| page_number(&path).map(|n| (n, path)))
        .collect();

    images.sort_by_key(|(n, _)| *n);
    Ok(images.into_iter().map(|(_, path)| path).collect())
}

fn page_number(path: &Path) -> Option<u32> {
    let stem = path.file_stem()?.to_str()?;
    let suffix = stem.strip_prefix(OUTPUT_PREFIX)?.strip_prefix('-')?;
    suffix.parse().ok()
}
