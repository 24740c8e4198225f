//! Text to PDF export
//!
//! Builds a plain A4 document from extracted text so it can be downloaded
//! as a PDF. Uses the standard Helvetica fonts with WinAnsi encoding, which
//! means only Latin-1 text can be drawn; lines with other characters are
//! replaced by a placeholder.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use thiserror::Error;

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 50.0;
const TITLE_SIZE: f32 = 16.0;
const BODY_SIZE: f32 = 11.0;
const LINE_HEIGHT: f32 = 14.0;
/// Helvetica averages a little over half an em per glyph
const WRAP_COLUMNS: usize = 88;

/// Replacement for lines the built-in fonts cannot draw
pub const UNSUPPORTED_LINE: &str = "[Content with special characters removed]";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PDF generation failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Render `text` into a PDF document with `title` on the first page
pub fn render_text_pdf(text: &str, title: &str) -> Result<Vec<u8>, ExportError> {
    let lines = layout_lines(text);
    let title = encode_latin1(&sanitize(title)).unwrap_or_else(|| b"Extracted Text".to_vec());

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let body_font = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let title_font = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => body_font,
            "F2" => title_font,
        },
    });

    let body_top = PAGE_HEIGHT - MARGIN;
    let lines_per_page = ((body_top - MARGIN) / LINE_HEIGHT) as usize;
    let title_lines = 2;

    let mut page_ids: Vec<ObjectId> = Vec::new();
    let mut remaining = lines.as_slice();
    let mut first = true;

    loop {
        let mut operations = Vec::new();
        let capacity = if first {
            operations.extend(title_operations(&title, body_top));
            lines_per_page - title_lines
        } else {
            lines_per_page
        };

        let take = capacity.min(remaining.len());
        let (chunk, rest) = remaining.split_at(take);
        let start_y = if first {
            body_top - LINE_HEIGHT * title_lines as f32
        } else {
            body_top
        };
        operations.extend(body_operations(chunk, start_y));

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => media_box(),
        });
        page_ids.push(page_id);

        remaining = rest;
        first = false;
        if remaining.is_empty() {
            break;
        }
    }

    let count = page_ids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => page_ids.into_iter().map(Object::from).collect::<Vec<_>>(),
        "Count" => count,
        "MediaBox" => media_box(),
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    Ok(buffer)
}

fn media_box() -> Vec<Object> {
    vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()]
}

fn title_operations(title: &[u8], top: f32) -> Vec<Operation> {
    // No font metrics at hand, so centring is approximate
    let estimated_width = title.len() as f32 * TITLE_SIZE * 0.55;
    let x = ((PAGE_WIDTH - estimated_width) / 2.0).max(MARGIN);

    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F2".into(), TITLE_SIZE.into()]),
        Operation::new("Td", vec![x.into(), (top - TITLE_SIZE).into()]),
        Operation::new("Tj", vec![Object::string_literal(title.to_vec())]),
        Operation::new("ET", vec![]),
    ]
}

fn body_operations(lines: &[Vec<u8>], start_y: f32) -> Vec<Operation> {
    let mut ops = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), BODY_SIZE.into()]),
        Operation::new("TL", vec![LINE_HEIGHT.into()]),
        Operation::new("Td", vec![MARGIN.into(), (start_y - BODY_SIZE).into()]),
    ];
    for line in lines {
        ops.push(Operation::new("Tj", vec![Object::string_literal(line.clone())]));
        ops.push(Operation::new("T*", vec![]));
    }
    ops.push(Operation::new("ET", vec![]));
    ops
}

/// Break text into encoded, wrapped output lines
fn layout_lines(text: &str) -> Vec<Vec<u8>> {
    let mut out = Vec::new();
    for raw in text.lines() {
        let line = sanitize(raw);
        if line.trim().is_empty() {
            continue;
        }
        match encode_latin1(&line) {
            Some(_) => {
                for wrapped in wrap(&line, WRAP_COLUMNS) {
                    if let Some(bytes) = encode_latin1(&wrapped) {
                        out.push(bytes);
                    }
                }
            }
            None => out.push(UNSUPPORTED_LINE.as_bytes().to_vec()),
        }
    }
    out
}

/// Expand tabs and drop control characters
fn sanitize(line: &str) -> String {
    line.replace('\t', "    ")
        .chars()
        .filter(|c| !c.is_control())
        .collect()
}

fn encode_latin1(line: &str) -> Option<Vec<u8>> {
    line.chars()
        .map(|c| u8::try_from(u32::from(c)).ok())
        .collect()
}

/// Greedy word wrap; words longer than `width` are split
fn wrap(line: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in line.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let word: String = word.into_iter().collect();
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
