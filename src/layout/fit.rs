//! Font-size search.
//!
//! Sizes are tried one point at a time. Wrapped height does not grow
//! monotonically with the size once words start reflowing onto new lines, so
//! a bisection could land on the wrong side of the boundary.

use tracing::{debug, info};

use super::geometry::to_inches;
use super::wrap::{TextMeasure, WrappedBlock};

/// First size tried
pub const MIN_FONT_SIZE: u32 = 10;

/// Largest size ever returned
pub const MAX_FONT_SIZE: u32 = 200;

/// Chosen font size and the wrapped block measured at that size
#[derive(Debug, Clone, PartialEq)]
pub struct FitResult {
    pub font_size: u32,
    pub block: WrappedBlock,
}

impl FitResult {
    pub fn width(&self) -> f64 {
        self.block.width
    }

    pub fn height(&self) -> f64 {
        self.block.height
    }
}

/// Find the largest font size at which `text` fits inside the body rectangle.
///
/// The scan stops at the first size whose block reaches either bound
/// (`>=`). It only steps back one size if that block strictly exceeds a bound
/// (`>`), so a block that lands exactly on a bound is kept. Text that does not
/// fit even at [`MIN_FONT_SIZE`] comes back at one size below it, still
/// overflowing; that is not treated as an error.
pub fn fit<M: TextMeasure + ?Sized>(
    measure: &M,
    text: &str,
    body_width: f64,
    body_height: f64,
) -> FitResult {
    let mut font_size = MIN_FONT_SIZE - 1;
    let mut block = loop {
        font_size += 1;
        let block = measure.measure(text, font_size as f64, body_width);
        debug!(
            "Font size: {} -> Width: {:.2}, Height: {:.2}",
            font_size, block.width, block.height
        );
        if block.height >= body_height || block.width >= body_width || font_size >= MAX_FONT_SIZE {
            break block;
        }
    };

    if block.height > body_height || block.width > body_width {
        font_size -= 1;
        block = measure.measure(text, font_size as f64, body_width);
    }

    info!(
        "Font size: {} pt -> Width: {:.3} in, Height: {:.3} in",
        font_size,
        to_inches(block.width),
        to_inches(block.height)
    );

    FitResult { font_size, block }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::wrap::tests::Monospace;
    use crate::layout::wrap::{Line, LEADING_FACTOR};
    use std::cell::RefCell;

    /// Reports a single line whose size grows linearly with the font size
    struct Linear {
        width_per_pt: f64,
        height_per_pt: f64,
        sizes_tried: RefCell<Vec<f64>>,
    }

    impl Linear {
        fn new(width_per_pt: f64, height_per_pt: f64) -> Self {
            Self {
                width_per_pt,
                height_per_pt,
                sizes_tried: RefCell::new(Vec::new()),
            }
        }
    }

    impl TextMeasure for Linear {
        fn measure(&self, text: &str, font_size: f64, _max_width: f64) -> WrappedBlock {
            self.sizes_tried.borrow_mut().push(font_size);
            let width = font_size * self.width_per_pt;
            WrappedBlock {
                lines: vec![Line {
                    text: text.to_string(),
                    width,
                }],
                font_size,
                leading: font_size * LEADING_FACTOR,
                width,
                height: font_size * self.height_per_pt,
            }
        }
    }

    #[test]
    fn test_steps_back_after_overflow() {
        // height reaches 50 at size 50, exceeds it from 51
        let measure = Linear::new(0.1, 1.0);
        let result = fit(&measure, "x", 1000.0, 50.5);
        assert_eq!(result.font_size, 50);
        assert!(result.height() < 50.5);
    }

    #[test]
    fn test_exact_fill_is_accepted() {
        // size 40 measures exactly the body height and must not step back
        let measure = Linear::new(0.1, 1.0);
        let result = fit(&measure, "x", 1000.0, 40.0);
        assert_eq!(result.font_size, 40);
        assert_eq!(result.height(), 40.0);
        assert_eq!(*measure.sizes_tried.borrow().last().unwrap(), 40.0);
    }

    #[test]
    fn test_exact_width_is_accepted() {
        let measure = Linear::new(2.0, 0.1);
        let result = fit(&measure, "x", 60.0, 1000.0);
        assert_eq!(result.font_size, 30);
        assert_eq!(result.width(), 60.0);
    }

    #[test]
    fn test_width_bound() {
        let measure = Linear::new(2.0, 0.1);
        let result = fit(&measure, "x", 61.0, 1000.0);
        assert_eq!(result.font_size, 30);
    }

    #[test]
    fn test_capped_at_max_size() {
        let measure = Linear::new(0.01, 0.01);
        let result = fit(&measure, "x", 1000.0, 1000.0);
        assert_eq!(result.font_size, MAX_FONT_SIZE);
        // 10 through 200
        assert_eq!(measure.sizes_tried.borrow().len(), 191);
    }

    #[test]
    fn test_degenerate_size_below_minimum() {
        let measure = Linear::new(0.1, 1.0);
        let result = fit(&measure, "x", 1000.0, 5.0);
        assert_eq!(result.font_size, MIN_FONT_SIZE - 1);
        assert!(result.height() > 5.0);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let first = fit(&Monospace, "The quick brown fox", 181.4, 181.4);
        let second = fit(&Monospace, "The quick brown fox", 181.4, 181.4);
        assert_eq!(first, second);
    }

    #[test]
    fn test_note_body_fit_with_wrapping() {
        // 64 mm square body
        let body = 64.0 * 72.0 / 25.4;
        let result = fit(&Monospace, "Hi", body, body);
        assert!(result.font_size >= MIN_FONT_SIZE && result.font_size < MAX_FONT_SIZE);
        assert!(result.width() <= body && result.height() <= body);
        // one size more overflows one of the bounds
        let next = Monospace.measure("Hi", (result.font_size + 1) as f64, body);
        assert!(next.width >= body || next.height >= body);
    }

    #[test]
    fn test_longer_text_gets_smaller_size() {
        let body = 181.4;
        let short = fit(&Monospace, "Milk", body, body);
        let long = fit(&Monospace, "Pick up milk and eggs on the way home", body, body);
        assert!(long.font_size < short.font_size);
    }
}
