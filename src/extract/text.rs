//! Direct text layer extraction
//!
//! Reads the embedded text of a PDF with `pdf-extract` and counts pages with
//! `lopdf`. Both libraries are synchronous and `pdf-extract` panics on some
//! malformed documents, so the async entry points run them on the blocking
//! pool where a panic surfaces as a join error.

use std::sync::Arc;

use super::error::{ExtractError, Result};

/// Number of pages in the document
pub fn page_count(bytes: &[u8]) -> Result<usize> {
    let document = lopdf::Document::load_mem(bytes)
        .map_err(|e| ExtractError::PdfStructure(e.to_string()))?;
    Ok(document.get_pages().len())
}

/// Text of each page, in page order
pub fn extract_pages(bytes: &[u8]) -> Result<Vec<String>> {
    pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| ExtractError::TextExtraction(e.to_string()))
}

pub async fn page_count_blocking(bytes: Arc<Vec<u8>>) -> Result<usize> {
    tokio::task::spawn_blocking(move || page_count(&bytes))
        .await
        .map_err(|e| ExtractError::PdfStructure(format!("page counter crashed: {}", e)))?
}

pub async fn extract_pages_blocking(bytes: Arc<Vec<u8>>) -> Result<Vec<String>> {
    tokio::task::spawn_blocking(move || extract_pages(&bytes))
        .await
        .map_err(|e| ExtractError::TextExtraction(format!("text extractor crashed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::render_text_pdf;

    #[test]
    fn test_page_count_rejects_garbage() {
        let result = page_count(b"definitely not a pdf");
        assert!(matches!(result, Err(ExtractError::PdfStructure(_))));
    }

    #[test]
    fn test_page_count_of_generated_pdf() {
        let pdf = render_text_pdf("hello\nworld", "Title").unwrap();
        assert_eq!(page_count(&pdf).unwrap(), 1);
    }

    #[tokio::test]
    async fn test_extract_pages_from_generated_pdf() {
        let body = "The quick brown fox jumps over the lazy dog";
        let pdf = render_text_pdf(body, "Sample").unwrap();

        let pages = extract_pages_blocking(Arc::new(pdf)).await.unwrap();

        assert_eq!(pages.len(), 1);
        assert!(pages[0].contains("quick brown fox"));
    }

    #[tokio::test]
    async fn test_extract_pages_error_on_garbage() {
        let result = extract_pages_blocking(Arc::new(b"%PDF-1.4 broken".to_vec())).await;
        assert!(result.is_err());
    }
}
