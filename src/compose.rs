//! Page composition: resolve the media geometry, fit the text and place the block.

use tracing::info;

use crate::layout::geometry::to_inches;
use crate::layout::{FitResult, Geometry, TextMeasure, fit};
use crate::media::MediaProfile;

/// A single page ready to be rendered
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedPage {
    pub media: MediaProfile,
    pub geometry: Geometry,
    pub fit: FitResult,
    /// Bottom-left corner of the text block, from the page's bottom-left
    pub origin: (f64, f64),
}

/// Baseline origin of one wrapped line
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine<'a> {
    pub text: &'a str,
    pub x: f64,
    pub y: f64,
}

impl ComposedPage {
    pub fn font_size(&self) -> f64 {
        self.fit.font_size as f64
    }

    /// Lines centred across the body; the first baseline sits one font size
    /// below the top of the block, the rest follow at the leading.
    pub fn line_positions(&self) -> Vec<PlacedLine<'_>> {
        let block = &self.fit.block;
        let body_width = self.geometry.body_width();
        let top = self.origin.1 + block.height;

        block
            .lines
            .iter()
            .enumerate()
            .map(|(i, line)| PlacedLine {
                text: &line.text,
                x: self.geometry.margins.left + (body_width - line.width) / 2.0,
                y: top - block.font_size - i as f64 * block.leading,
            })
            .collect()
    }
}

/// Fit `text` into the body of `media` and centre it vertically
pub fn compose<M: TextMeasure + ?Sized>(media: MediaProfile, text: &str, measure: &M) -> ComposedPage {
    let geometry = Geometry::for_media(media);

    info!(
        "Page size: {:.3} in x {:.3} in",
        to_inches(geometry.page_width),
        to_inches(geometry.page_height)
    );
    info!(
        "Body size: {:.3} in x {:.3} in",
        to_inches(geometry.body_width()),
        to_inches(geometry.body_height())
    );

    let fit = fit(measure, text, geometry.body_width(), geometry.body_height());

    let x = geometry.margins.left;
    let y = geometry.margins.bottom + (geometry.body_height() - fit.height()) / 2.0;

    ComposedPage {
        media,
        geometry,
        fit,
        origin: (x, y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checklist::to_checklist;
    use crate::layout::geometry::mm;
    use crate::layout::wrap::tests::Monospace;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_block_is_vertically_centred() {
        let page = compose(MediaProfile::Note, "Hi", &Monospace);
        let g = page.geometry;
        let below = page.origin.1 - g.margins.bottom;
        let above = (g.page_height - g.margins.top) - (page.origin.1 + page.fit.height());
        assert!(approx(below, above));
        assert!(approx(page.origin.0, mm(8.0)));
    }

    #[test]
    fn test_note_fits_body() {
        let page = compose(MediaProfile::Note, "Hi", &Monospace);
        assert!(page.fit.width() <= mm(64.0));
        assert!(page.fit.height() <= mm(64.0));
    }

    #[test]
    fn test_label_uses_label_body() {
        let page = compose(MediaProfile::Label1, "Hi", &Monospace);
        assert!(approx(page.geometry.body_height(), mm(17.0)));
        assert!(page.fit.height() <= mm(17.0));
        // origin sits inside the 17 mm band above the 46.5 mm bottom margin
        assert!(page.origin.1 >= mm(46.5) - 1e-9);
    }

    #[test]
    fn test_compose_is_idempotent() {
        let first = compose(MediaProfile::Label3, "Call the plumber", &Monospace);
        let second = compose(MediaProfile::Label3, "Call the plumber", &Monospace);
        assert_eq!(first, second);
        assert_eq!(first.line_positions(), second.line_positions());
    }

    #[test]
    fn test_lines_are_centred_and_stacked() {
        let page = compose(MediaProfile::Note, &to_checklist("milk,eggs,bread"), &Monospace);
        let lines = page.line_positions();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].text, "☐ milk");

        let body_centre = page.geometry.margins.left + page.geometry.body_width() / 2.0;
        for (line, placed) in page.fit.block.lines.iter().zip(&lines) {
            assert!(approx(placed.x + line.width / 2.0, body_centre));
        }
        assert!(approx(lines[0].y - lines[1].y, page.fit.block.leading));
        assert!(approx(
            lines[0].y,
            page.origin.1 + page.fit.height() - page.font_size()
        ));
    }
}
