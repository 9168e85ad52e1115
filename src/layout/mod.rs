//! Page geometry, paragraph wrapping and the font-size search.

pub mod fit;
pub mod geometry;
pub mod wrap;

pub use fit::{FitResult, fit};
pub use geometry::Geometry;
pub use wrap::{FontMetrics, TextMeasure};
