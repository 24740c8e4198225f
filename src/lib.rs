//! PDF OCR Extractor Library
//!
//! Extracts text from PDF uploads, using the embedded text layer when it is
//! usable and falling back to Poppler + Tesseract OCR for scanned pages.
//! The server binary is in main.rs; the modules are exposed here so the
//! HTTP layer can be exercised from integration tests.
//!
//! # Modules
//!
//! - `extract`: text-layer-or-OCR pipeline
//! - `tools`: `pdftoppm` and `tesseract` wrappers
//! - `export`: text to PDF rendering for downloads
//! - `routes`: browser form, downloads and JSON API

pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod html;
pub mod routes;
pub mod state;
pub mod store;
pub mod tools;
