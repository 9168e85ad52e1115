//! Paragraph wrapping and measurement.
//!
//! Text is wrapped the way a centred paragraph is set: hard line breaks are
//! kept, words are packed greedily and never split. A word wider than the
//! constraint sits alone on a line that overflows, which is what lets the
//! font-size search notice that the size is too large.

use ttf_parser::{Face, GlyphId};

/// Line height as a multiple of the font size
pub const LEADING_FACTOR: f64 = 1.1;

/// Horizontal advance of single characters at a given size
pub trait GlyphMetrics {
    fn advance(&self, ch: char, font_size: f64) -> f64;

    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        text.chars().map(|ch| self.advance(ch, font_size)).sum()
    }
}

/// Lays out text at a given size within a width and reports the block it occupies
pub trait TextMeasure {
    fn measure(&self, text: &str, font_size: f64, max_width: f64) -> WrappedBlock;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub text: String,
    pub width: f64,
}

/// A paragraph after wrapping
#[derive(Debug, Clone, PartialEq)]
pub struct WrappedBlock {
    pub lines: Vec<Line>,
    pub font_size: f64,
    pub leading: f64,
    /// Width of the widest line, not the constraint width
    pub width: f64,
    pub height: f64,
}

/// Wrap `text` at `font_size` so lines stay within `max_width` where possible
pub fn wrap_paragraph<M: GlyphMetrics + ?Sized>(
    metrics: &M,
    text: &str,
    font_size: f64,
    max_width: f64,
) -> WrappedBlock {
    // normalize newlines
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let space = metrics.advance(' ', font_size);

    let mut lines = Vec::new();
    for hard_line in text.split('\n') {
        let mut current = String::new();
        let mut current_width = 0.0;

        for word in break_units(hard_line) {
            let word = word.as_str();
            let word_width = metrics.text_width(word, font_size);
            if current.is_empty() {
                current.push_str(word);
                current_width = word_width;
            } else if current_width + space + word_width <= max_width {
                current.push(' ');
                current.push_str(word);
                current_width += space + word_width;
            } else {
                lines.push(Line {
                    text: std::mem::take(&mut current),
                    width: current_width,
                });
                current.push_str(word);
                current_width = word_width;
            }
        }

        lines.push(Line {
            text: current,
            width: current_width,
        });
    }

    let leading = font_size * LEADING_FACTOR;
    let width = lines.iter().map(|l| l.width).fold(0.0, f64::max);
    let height = lines.len() as f64 * leading;

    WrappedBlock {
        lines,
        font_size,
        leading,
        width,
        height,
    }
}

/// Words of a line, with a lone marker such as `☐` or `•` kept on the
/// same line as the word after it
fn break_units(line: &str) -> Vec<String> {
    let mut units: Vec<String> = Vec::new();
    let mut pending_marker: Option<&str> = None;

    for word in line.split_whitespace() {
        if let Some(marker) = pending_marker.take() {
            units.push(format!("{marker} {word}"));
        } else if is_marker(word) {
            pending_marker = Some(word);
        } else {
            units.push(word.to_string());
        }
    }
    units.extend(pending_marker.map(str::to_string));
    units
}

fn is_marker(word: &str) -> bool {
    let mut chars = word.chars();
    matches!((chars.next(), chars.next()), (Some(ch), None) if !ch.is_alphanumeric())
}

/// Glyph metrics read from a TrueType/OpenType face
pub struct FontMetrics<'a> {
    face: Face<'a>,
    units_per_em: f64,
}

impl<'a> FontMetrics<'a> {
    pub fn new(face: Face<'a>) -> Self {
        let units_per_em = face.units_per_em() as f64;
        Self { face, units_per_em }
    }
}

impl GlyphMetrics for FontMetrics<'_> {
    fn advance(&self, ch: char, font_size: f64) -> f64 {
        // Missing glyphs render as .notdef, so measure them that way too
        let gid = self.face.glyph_index(ch).unwrap_or(GlyphId(0));
        let advance = self.face.glyph_hor_advance(gid).unwrap_or_default() as f64;
        advance * font_size / self.units_per_em
    }
}

impl TextMeasure for FontMetrics<'_> {
    fn measure(&self, text: &str, font_size: f64, max_width: f64) -> WrappedBlock {
        wrap_paragraph(self, text, font_size, max_width)
    }
}
