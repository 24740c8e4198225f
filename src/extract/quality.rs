//! Text layer quality checks
//!
//! Decides whether an embedded text layer is good enough to return, or
//! whether the document should go through OCR instead. Scanned PDFs usually
//! have no text layer at all; some broken producers emit a layer full of
//! replacement characters or private-use glyph codes.

/// Measured properties of an extracted text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextQuality {
    /// Length of the text with surrounding whitespace trimmed
    pub trimmed_chars: usize,
    /// Characters that are not whitespace
    pub visible_chars: usize,
    /// Characters that cannot be meaningful text
    pub garbage_chars: usize,
}

impl TextQuality {
    pub fn assess(text: &str) -> Self {
        let mut visible_chars = 0;
        let mut garbage_chars = 0;

        for c in text.chars().filter(|c| !c.is_whitespace()) {
            visible_chars += 1;
            if is_garbage(c) {
                garbage_chars += 1;
            }
        }

        Self {
            trimmed_chars: text.trim().chars().count(),
            visible_chars,
            garbage_chars,
        }
    }

    /// Share of visible characters that are garbage (0 for empty text)
    pub fn garbage_ratio(&self) -> f64 {
        if self.visible_chars == 0 {
            0.0
        } else {
            self.garbage_chars as f64 / self.visible_chars as f64
        }
    }

    /// Long enough once trimmed, and not dominated by garbage
    pub fn is_usable(&self, min_chars: usize, max_garbage_ratio: f64) -> bool {
        self.trimmed_chars >= min_chars && self.garbage_ratio() <= max_garbage_ratio
    }
}

fn is_garbage(c: char) -> bool {
    c == char::REPLACEMENT_CHARACTER
        || c.is_control()
        || matches!(c as u32, 0xE000..=0xF8FF | 0xF0000..=0x10FFFF)
}
