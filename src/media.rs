//! Media profiles and sticky-edge orientation tables.
//!
//! Both tables are fixed: a profile resolves to a nominal page size (what the
//! PDF declares) and an actual stock size (what the printer feeds). Label stock
//! is declared taller than it really is, so the difference is absorbed by the
//! top and bottom margins.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::layout::geometry::{Margins, mm};

/// Left/right margin for every profile, and all four margins for notes (mm)
const SIDE_MARGIN_MM: f64 = 8.0;

/// Extra top/bottom padding added on top of the label offset (mm)
const LABEL_PAD_MM: f64 = 4.0;

/// Physical media loaded in the printer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaProfile {
    Note,
    Label1,
    Label2,
    Label3,
    Label4,
    LabelHalf,
}

impl MediaProfile {
    pub const ALL: [MediaProfile; 6] = [
        MediaProfile::Note,
        MediaProfile::Label1,
        MediaProfile::Label2,
        MediaProfile::Label3,
        MediaProfile::Label4,
        MediaProfile::LabelHalf,
    ];

    /// Key used on the command line and in settings.json
    pub fn key(&self) -> &'static str {
        match self {
            MediaProfile::Note => "note",
            MediaProfile::Label1 => "label1",
            MediaProfile::Label2 => "label2",
            MediaProfile::Label3 => "label3",
            MediaProfile::Label4 => "label4",
            MediaProfile::LabelHalf => "label0.5",
        }
    }

    pub fn is_label(&self) -> bool {
        !matches!(self, MediaProfile::Note)
    }

    /// Page size declared to the renderer, (width, height) in mm
    pub fn nominal_size_mm(&self) -> (f64, f64) {
        match self {
            MediaProfile::Note => (80.0, 80.0),
            _ => (76.0, 110.0),
        }
    }

    /// Size of the stock that actually comes out of the printer, in mm
    pub fn actual_size_mm(&self) -> (f64, f64) {
        match self {
            MediaProfile::Note => (80.0, 80.0),
            MediaProfile::Label1 => (76.0, 25.0),
            MediaProfile::Label2 => (76.0, 51.0),
            MediaProfile::Label3 => (76.0, 76.0),
            MediaProfile::Label4 => (76.0, 102.0),
            MediaProfile::LabelHalf => (51.0, 13.0),
        }
    }

    /// Nominal page size in points
    pub fn page_size(&self) -> (f64, f64) {
        let (w, h) = self.nominal_size_mm();
        (mm(w), mm(h))
    }

    /// Margins in points
    pub fn margins(&self) -> Margins {
        if self.is_label() {
            let nominal_h = self.nominal_size_mm().1;
            let actual_h = self.actual_size_mm().1;
            let offset = (nominal_h - actual_h) / 2.0;
            Margins::symmetric(mm(offset + LABEL_PAD_MM), mm(SIDE_MARGIN_MM))
        } else {
            Margins::all(mm(SIDE_MARGIN_MM))
        }
    }
}

impl FromStr for MediaProfile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MediaProfile::ALL
            .into_iter()
            .find(|m| m.key() == s)
            .ok_or_else(|| ConfigError::UnknownMedia(s.to_string()))
    }
}

impl fmt::Display for MediaProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Edge of the note that carries the adhesive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StickyEdge {
    Up,
    Down,
    Left,
    Right,
}

impl StickyEdge {
    pub fn key(&self) -> &'static str {
        match self {
            StickyEdge::Up => "up",
            StickyEdge::Down => "down",
            StickyEdge::Left => "left",
            StickyEdge::Right => "right",
        }
    }

    /// IPP `orientation-requested` value passed to lpr
    pub fn orientation_requested(&self) -> u8 {
        match self {
            StickyEdge::Up => 5,
            StickyEdge::Down => 4,
            StickyEdge::Left => 6,
            StickyEdge::Right => 3,
        }
    }

    /// The lpr option for this edge, e.g. `orientation-requested=5`
    pub fn lpr_option(&self) -> String {
        format!("orientation-requested={}", self.orientation_requested())
    }
}

impl FromStr for StickyEdge {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(StickyEdge::Up),
            "down" => Ok(StickyEdge::Down),
            "left" => Ok(StickyEdge::Left),
            "right" => Ok(StickyEdge::Right),
            _ => Err(ConfigError::UnknownStickyEdge(s.to_string())),
        }
    }
}

impl fmt::Display for StickyEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Label stock always feeds the same way, so the requested edge only applies to notes
pub fn effective_edge(media: MediaProfile, requested: StickyEdge) -> StickyEdge {
    if media.is_label() {
        StickyEdge::Right
    } else {
        requested
    }
}
