//! PDF OCR Extractor Server
//!
//! Serves a browser form that extracts text from uploaded PDFs, falling back
//! to OCR for scanned documents, and offers the result for download.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pdf_ocr_extractor::config::Config;
use pdf_ocr_extractor::routes;
use pdf_ocr_extractor::state::AppState;
use pdf_ocr_extractor::tools::{Rasterizer, ToolOverrides, ToolPaths};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "pdf_ocr_extractor=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    tracing::info!("Starting PDF OCR Extractor v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("OCR defaults: {} dpi, language '{}'", config.ocr.dpi, config.ocr.language);

    report_tools(&config).await;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", config.server.host, config.server.port))?;

    let app = routes::app(AppState::new(config));

    tracing::info!("PDF OCR Extractor listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Log whether the configured external tools can be found
async fn report_tools(config: &Config) {
    let tools = ToolPaths::resolve(&config.tools, &ToolOverrides::default());

    if tools.rasterizer().is_available().await {
        tracing::info!("pdftoppm: {}", tools.pdftoppm.display());
    } else {
        tracing::warn!(
            "pdftoppm not found at {}; OCR fallback needs Poppler (set POPPLER_PATH or use the form)",
            tools.pdftoppm.display()
        );
    }

    match tools.ocr_engine().version().await {
        Ok(version) => tracing::info!("tesseract: {} ({})", tools.tesseract.display(), version),
        Err(e) => tracing::warn!(
            "tesseract unavailable: {}; set TESSERACT_PATH to the executable or install directory",
            e
        ),
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
