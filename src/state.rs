//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::extract::Extractor;
use crate::store::ResultStore;
use crate::tools::{ToolOverrides, ToolPaths};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    results: ResultStore,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let results = ResultStore::new(&config.results);
        Self {
            inner: Arc::new(AppStateInner { config, results }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the store holding finished extractions
    pub fn results(&self) -> &ResultStore {
        &self.inner.results
    }

    /// Build an extractor wired to the tools chosen for this request
    pub fn extractor(&self, overrides: &ToolOverrides) -> Extractor {
        let config = self.config();
        let tools = ToolPaths::resolve(&config.tools, overrides);
        tracing::debug!(
            pdftoppm = %tools.pdftoppm.display(),
            tesseract = %tools.tesseract.display(),
            "Resolved external tools"
        );

        Extractor::new(
            Arc::new(tools.rasterizer()),
            Arc::new(tools.ocr_engine()),
            config.extraction.clone(),
        )
    }
}
