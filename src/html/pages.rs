//! Page templates

use html_escape::{encode_double_quoted_attribute, encode_text};
use uuid::Uuid;

use crate::config::{Config, MAX_DPI, MIN_DPI};
use crate::extract::{ExtractionMethod, ExtractionReport, MessageLevel};
use crate::tools::OCR_LANGUAGES;

const TITLE: &str = "OCR PDF Extractor";

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; display: flex; min-height: 100vh; }
aside { width: 18rem; background: #f0f2f6; padding: 1.5rem; box-sizing: border-box; }
main { flex: 1; max-width: 48rem; margin: 0 auto; padding: 2rem; }
label { display: block; margin-top: 1rem; font-weight: 600; }
input[type=text], select { width: 100%; box-sizing: border-box; padding: .4rem; }
small { color: #555; display: block; }
.msg { padding: .6rem .9rem; border-radius: .4rem; margin: .4rem 0; }
.info { background: #e7f0fd; } .success { background: #e3f6e8; }
.warning { background: #fff6dc; } .error { background: #fde7e9; }
textarea { width: 100%; height: 25rem; font-family: monospace; }
.downloads a { display: inline-block; margin: 1rem 1rem 0 0; padding: .5rem 1rem;
  border: 1px solid #999; border-radius: .4rem; text-decoration: none; color: inherit; }
"#;

const TIPS: &str = r#"
<details>
  <summary>Troubleshooting Tips</summary>
  <h3>Tips for better results</h3>
  <ol>
    <li><strong>Text-based PDFs:</strong> make sure the PDF is not password-protected.</li>
    <li><strong>Scanned PDFs:</strong>
      <ul>
        <li>Try a higher DPI (better accuracy, more memory).</li>
        <li>Select the correct language for the document.</li>
        <li>Clear, high-contrast scans work best.</li>
      </ul>
    </li>
    <li><strong>Mixed PDFs:</strong> try "Force OCR on all pages".</li>
    <li><strong>If extraction fails:</strong>
      <ul>
        <li>Check that Poppler and Tesseract are installed, or set their paths.</li>
        <li>Try processing a smaller section of the PDF.</li>
        <li>For secured or DRM-protected PDFs, OCR may be the only option.</li>
      </ul>
    </li>
  </ol>
</details>
"#;

/// Values pre-filled into the form
#[derive(Debug, Clone)]
pub struct FormDefaults {
    pub dpi: u32,
    pub language: String,
    pub poppler_path: String,
    pub tesseract_path: String,
    pub force_ocr: bool,
    pub allow_tool_overrides: bool,
}

impl From<&Config> for FormDefaults {
    fn from(config: &Config) -> Self {
        Self {
            dpi: config.ocr.dpi,
            language: config.ocr.language.clone(),
            poppler_path: config.tools.poppler_path.clone().unwrap_or_default(),
            tesseract_path: config.tools.tesseract_path.clone().unwrap_or_default(),
            force_ocr: false,
            allow_tool_overrides: config.tools.allow_overrides,
        }
    }
}

/// Upload form with the configuration sidebar
pub fn index_page(defaults: &FormDefaults) -> String {
    let body = format!(
        r#"<h1>📄 {title}</h1>
<p>Upload scanned or text-based PDFs. The text layer is used when present; otherwise pages are run through OCR.</p>
<label for="file">Upload a PDF file</label>
<input id="file" type="file" name="file" accept=".pdf,application/pdf" required>
<p><button type="submit">Extract text</button></p>"#,
        title = TITLE,
    );

    layout(TITLE, &sidebar(defaults), &body, true)
}

/// Results of one extraction
pub fn result_page(id: &Uuid, report: &ExtractionReport, defaults: &FormDefaults) -> String {
    let mut body = format!(
        "<h1>📄 {}</h1>\n<p>Results for <strong>{}</strong>",
        TITLE,
        encode_text(&report.file_name)
    );
    if let Some(count) = report.page_count {
        body.push_str(&format!(" ({} pages)", count));
    }
    body.push_str(&format!(", method: {}</p>\n", method_label(report.method)));

    body.push_str(&messages(report));

    if report.has_text() {
        body.push_str(&format!(
            r#"<label for="text">📃 Extracted Text</label>
<textarea id="text" readonly>{text}</textarea>
<div class="downloads">
  <a href="/download/{id}/text" download="extracted_text.txt">⬇️ Download Text</a>
  <a href="/download/{id}/pdf" download="extracted_text.pdf">⬇️ Download as PDF</a>
</div>"#,
            text = encode_text(&report.text),
            id = id,
        ));
    }

    body.push_str(
        r#"<h2>Extract another file</h2>
<input type="file" name="file" accept=".pdf,application/pdf" required>
<p><button type="submit">Extract text</button></p>"#,
    );
    body.push_str(TIPS);

    layout(TITLE, &sidebar(defaults), &body, true)
}

/// Standalone error page
pub fn error_page(message: &str) -> String {
    let body = format!(
        r#"<h1>📄 {}</h1>
<div class="msg error">⚠️ {}</div>
<p>Try adjusting the settings or try another PDF. <a href="/">Back to the form</a></p>
{}"#,
        TITLE,
        encode_text(message),
        TIPS
    );
    layout(TITLE, "", &body, false)
}

fn layout(title: &str, sidebar: &str, body: &str, with_form: bool) -> String {
    let (open, close) = if with_form {
        (
            r#"<form method="post" action="/extract" enctype="multipart/form-data" style="display:contents">"#,
            "</form>",
        )
    } else {
        ("", "")
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{style}</style>
</head>
<body>
{open}
{sidebar}
<main>
{body}
</main>
{close}
</body>
</html>
"#,
        title = encode_text(title),
        style = STYLE,
    )
}

fn sidebar(defaults: &FormDefaults) -> String {
    let language_options: String = OCR_LANGUAGES
        .iter()
        .map(|(code, name)| {
            let selected = if *code == defaults.language { " selected" } else { "" };
            format!(r#"<option value="{code}"{selected}>{name} ({code})</option>"#)
        })
        .collect();

    let force_checked = if defaults.force_ocr { " checked" } else { "" };

    let tool_fields = if defaults.allow_tool_overrides {
        format!(
            r#"<label for="poppler_path">Poppler Path (optional)</label>
<input id="poppler_path" type="text" name="poppler_path" value="{poppler}" placeholder="e.g., C:\poppler\bin">
<small>Directory containing the Poppler binaries, if not on PATH</small>
<label for="tesseract_path">Tesseract Path (optional)</label>
<input id="tesseract_path" type="text" name="tesseract_path" value="{tesseract}" placeholder="e.g., C:\Program Files\Tesseract-OCR">
<small>Tesseract executable or install directory, if not on PATH</small>"#,
            poppler = encode_double_quoted_attribute(&defaults.poppler_path),
            tesseract = encode_double_quoted_attribute(&defaults.tesseract_path),
        )
    } else {
        "<small>External tool paths are fixed by the server configuration.</small>".to_string()
    };

    format!(
        r#"<aside>
<h2>Configuration</h2>
{tool_fields}
<h3>OCR Options</h3>
<label for="dpi">DPI for OCR: <output id="dpi_value">{dpi}</output></label>
<input id="dpi" type="range" name="dpi" min="{min}" max="{max}" value="{dpi}" oninput="dpi_value.value = this.value">
<small>Higher DPI may improve OCR accuracy but uses more memory</small>
<label for="language">OCR Language</label>
<select id="language" name="language">{language_options}</select>
<label><input type="checkbox" name="force_ocr" value="on"{force_checked}> Force OCR on all pages</label>
<small>Use OCR for all pages, even when text is extractable</small>
</aside>"#,
        dpi = defaults.dpi,
        min = MIN_DPI,
        max = MAX_DPI,
    )
}

fn messages(report: &ExtractionReport) -> String {
    report
        .messages
        .iter()
        .map(|m| {
            let (class, icon) = match m.level {
                MessageLevel::Info => ("info", "ℹ️"),
                MessageLevel::Success => ("success", "✅"),
                MessageLevel::Warning => ("warning", "⚠️"),
                MessageLevel::Error => ("error", "❌"),
            };
            format!(
                "<div class=\"msg {}\">{} {}</div>\n",
                class,
                icon,
                encode_text(&m.text)
            )
        })
        .collect()
}

fn method_label(method: ExtractionMethod) -> &'static str {
    match method {
        ExtractionMethod::Text => "text layer",
        ExtractionMethod::Ocr => "OCR",
        ExtractionMethod::None => "none",
    }
}
