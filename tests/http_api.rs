//! HTTP level tests for the form, JSON API and downloads.
//!
//! External tools are pointed at paths that do not exist, so the OCR
//! fallback always reports missing binaries and the outcome does not depend
//! on what is installed on the machine running the tests.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use serde_json::Value;
use tower::ServiceExt;

use pdf_ocr_extractor::config::Config;
use pdf_ocr_extractor::export::render_text_pdf;
use pdf_ocr_extractor::routes;
use pdf_ocr_extractor::state::AppState;

const MISSING_TOOLS: &str = "/nonexistent/pdf-ocr-extractor-tests/bin";

fn test_config() -> Config {
    let mut config = Config::default();
    config.tools.poppler_path = Some(MISSING_TOOLS.to_string());
    config.tools.tesseract_path = Some(MISSING_TOOLS.to_string());
    config.tools.allow_overrides = false;
    config.tools.timeout_secs = 10;
    config
}

fn server() -> TestServer {
    TestServer::new(routes::app(AppState::new(test_config()))).unwrap()
}

fn text_pdf() -> Vec<u8> {
    let body = "Quarterly report for the northern warehouse.\n".repeat(8);
    render_text_pdf(&body, "Extracted from report.pdf").unwrap()
}

fn pdf_part(name: &str, bytes: Vec<u8>) -> Part {
    Part::bytes(bytes)
        .file_name(name.to_string())
        .mime_type("application/pdf")
}

#[tokio::test]
async fn test_health() {
    let response = server().get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "pdf-ocr-extractor");
}

#[tokio::test]
async fn test_health_via_tower_oneshot() {
    let app = routes::app(AppState::new(test_config()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_index_renders_form() {
    let response = server().get("/").await;
    response.assert_status_ok();

    let html = response.text();
    assert!(html.contains(r#"action="/extract""#));
    assert!(html.contains(r#"type="file""#));
    assert!(html.contains("Force OCR on all pages"));
    // Overrides are disabled in the test config
    assert!(!html.contains(r#"name="tesseract_path""#));
}

#[tokio::test]
async fn test_api_extracts_text_layer_and_serves_downloads() {
    let server = server();
    let form = MultipartForm::new()
        .add_part("file", pdf_part("report.pdf", text_pdf()))
        .add_text("dpi", "150")
        .add_text("language", "eng");

    let response = server.post("/api/v1/extract").multipart(form).await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["method"], "text");
    assert_eq!(body["fileName"], "report.pdf");
    assert_eq!(body["pageCount"], 1);
    let text = body["text"].as_str().unwrap().to_string();
    assert!(text.starts_with("\n--- Page 1 ---\n"));
    assert!(text.contains("northern warehouse"));

    let text_url = body["textUrl"].as_str().unwrap().to_string();
    let download = server.get(&text_url).await;
    download.assert_status_ok();
    assert_eq!(download.text(), text);
    let disposition = download.header("content-disposition");
    assert!(disposition.to_str().unwrap().contains("extracted_text.txt"));

    let pdf_url = body["pdfUrl"].as_str().unwrap().to_string();
    let download = server.get(&pdf_url).await;
    download.assert_status_ok();
    assert_eq!(download.header("content-type"), "application/pdf");
    assert!(download.as_bytes().starts_with(b"%PDF-"));

    let id = body["id"].as_str().unwrap().to_string();
    let stored = server.get(&format!("/api/v1/results/{}", id)).await;
    stored.assert_status_ok();
    assert_eq!(stored.json::<Value>()["text"], text.as_str());
}

#[tokio::test]
async fn test_short_text_layer_reports_missing_poppler() {
    let pdf = render_text_pdf("Page one", "Scan").unwrap();
    let form = MultipartForm::new().add_part("file", pdf_part("scan.pdf", pdf));

    let response = server().post("/api/v1/extract").multipart(form).await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["method"], "text");
    let messages = body["messages"].as_array().unwrap();
    assert!(messages.iter().any(|m| {
        m["level"] == "error"
            && m["text"]
                .as_str()
                .unwrap()
                .contains("Poppler is not installed")
    }));
}

#[tokio::test]
async fn test_forced_ocr_without_tools_extracts_nothing() {
    let form = MultipartForm::new()
        .add_part("file", pdf_part("report.pdf", text_pdf()))
        .add_text("force_ocr", "on");

    let response = server().post("/api/v1/extract").multipart(form).await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["method"], "none");
    assert_eq!(body["text"], "");
    let last = body["messages"].as_array().unwrap().last().unwrap().clone();
    assert_eq!(last["level"], "error");
}

#[tokio::test]
async fn test_api_rejects_non_pdf() {
    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(b"just some notes".to_vec())
            .file_name("notes.txt")
            .mime_type("text/plain"),
    );

    let response = server().post("/api/v1/extract").multipart(form).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "invalid_input");
}

#[tokio::test]
async fn test_api_rejects_missing_file() {
    let form = MultipartForm::new().add_text("dpi", "300");

    let response = server().post("/api/v1/extract").multipart(form).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "bad_request");
}

#[tokio::test]
async fn test_api_rejects_bad_language() {
    let form = MultipartForm::new()
        .add_part("file", pdf_part("report.pdf", text_pdf()))
        .add_text("language", "eng --psm 0");

    let response = server().post("/api/v1/extract").multipart(form).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "invalid_language");
}

#[tokio::test]
async fn test_unknown_download_is_not_found() {
    let server = server();

    server
        .get("/download/00000000-0000-0000-0000-000000000000/text")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .get("/download/not-a-uuid/pdf")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_form_renders_result_page() {
    let form = MultipartForm::new()
        .add_part("file", pdf_part("report.pdf", text_pdf()))
        .add_text("dpi", "400")
        .add_text("language", "deu");

    let response = server().post("/extract").multipart(form).await;
    response.assert_status_ok();

    let html = response.text();
    assert!(html.contains("Extracted Text"));
    assert!(html.contains("Download Text"));
    assert!(html.contains("Download as PDF"));
    assert!(html.contains("northern warehouse"));
    // Sidebar keeps the submitted choices
    assert!(html.contains(r#"value="400""#));
    assert!(html.contains(r#"<option value="deu" selected>"#));
}

#[tokio::test]
async fn test_form_shows_error_page_for_non_pdf() {
    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(b"PK\x03\x04".to_vec())
            .file_name("archive.zip")
            .mime_type("application/zip"),
    );

    let response = server().post("/extract").multipart(form).await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let html = response.text();
    assert!(html.contains("File is not a PDF: archive.zip"));
    assert!(html.contains("Back to the form"));
}

fn small_limit_server() -> TestServer {
    let mut config = test_config();
    config.upload.max_bytes = 1024;
    TestServer::new(routes::app(AppState::new(config))).unwrap()
}

fn oversized_pdf() -> Vec<u8> {
    let mut bytes = b"%PDF-1.4\n".to_vec();
    bytes.resize(10 * 1024, b' ');
    bytes
}

#[tokio::test]
async fn test_api_rejects_upload_over_limit() {
    let form = MultipartForm::new().add_part("file", pdf_part("big.pdf", oversized_pdf()));

    let response = small_limit_server()
        .post("/api/v1/extract")
        .multipart(form)
        .await;
    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);

    let body: Value = response.json();
    assert_eq!(body["error"], "payload_too_large");
    assert_eq!(body["message"], "File exceeds the 1024 byte upload limit");
}

#[tokio::test]
async fn test_form_rejects_upload_over_limit() {
    let form = MultipartForm::new().add_part("file", pdf_part("big.pdf", oversized_pdf()));

    let response = small_limit_server().post("/extract").multipart(form).await;
    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    assert!(response
        .text()
        .contains("File exceeds the 1024 byte upload limit"));
}

#[tokio::test]
async fn test_form_result_keeps_force_ocr_checked() {
    let form = MultipartForm::new()
        .add_part("file", pdf_part("report.pdf", text_pdf()))
        .add_text("force_ocr", "on");

    let response = server().post("/extract").multipart(form).await;
    response.assert_status_ok();
    assert!(response
        .text()
        .contains(r#"name="force_ocr" value="on" checked>"#));
}
