//! PDF output for composed pages.
//!
//! - `content`: text drawing operators and stream compression
//! - `fonts`: font registry and CID font embedding
//! - `resources`: page resource dictionary
//! - `document`: page tree assembly and saving

mod content;
mod document;
mod fonts;
mod resources;

pub use document::{render, save};
pub use fonts::FontRegistry;
