//! PDF content stream generation for the note text.
//!
//! Text is shown through a Type0 font with Identity-H encoding, so every
//! string is written as hex UTF-16BE code units.

use anyhow::Result;
use std::io::Write;

use crate::compose::ComposedPage;

/// Builder for the page content stream
pub struct ContentBuilder {
    pub content_parts: Vec<String>,
    font_name: String,
}

impl ContentBuilder {
    /// Create a new ContentBuilder drawing with the font resource `font_name`
    pub fn new(font_name: &str) -> Self {
        Self {
            content_parts: Vec::new(),
            font_name: font_name.to_string(),
        }
    }

    /// Show one line of text with its baseline starting at (x, y)
    pub fn add_line(&mut self, text: &str, font_size: f64, x: f64, y: f64) {
        if text.is_empty() {
            return;
        }
        self.content_parts.push(format!(
            "q BT 0 g /{} {:.3} Tf {:.3} {:.3} Td <{}> Tj ET Q ",
            self.font_name,
            font_size,
            x,
            y,
            encode_cid_text(text)
        ));
    }

    /// Add every wrapped line of a composed page
    pub fn add_page(&mut self, page: &ComposedPage) {
        let font_size = page.font_size();
        for line in page.line_positions() {
            self.add_line(line.text, font_size, line.x, line.y);
        }
    }

    /// Build the final content bytes
    pub fn build_content_bytes(&self) -> Vec<u8> {
        self.content_parts.join("").into_bytes()
    }
}

/// Encode text for CID font (Identity-H encoding)
///
/// Converts text to UTF-16BE and returns hex representation
pub fn encode_cid_text(s: &str) -> String {
    s.encode_utf16().map(|unit| format!("{:04X}", unit)).collect()
}

/// Compress data using zlib/flate2
pub fn compress_data(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}
