use crate::media::MediaProfile;

/// Points per inch (PDF user space unit)
pub const PT_PER_INCH: f64 = 72.0;

/// Convert millimetres to points
pub fn mm(value: f64) -> f64 {
    value * PT_PER_INCH / 25.4
}

/// Convert points to inches, for diagnostics
pub fn to_inches(points: f64) -> f64 {
    points / PT_PER_INCH
}

/// Page margins in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Margins {
    pub fn all(value: f64) -> Margins {
        Margins {
            top: value,
            bottom: value,
            left: value,
            right: value,
        }
    }

    /// Same value for top and bottom, and another for left and right
    pub fn symmetric(vertical: f64, horizontal: f64) -> Margins {
        Margins {
            top: vertical,
            bottom: vertical,
            left: horizontal,
            right: horizontal,
        }
    }
}

/// Page size plus margins; the body is whatever is left inside the margins
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub page_width: f64,
    pub page_height: f64,
    pub margins: Margins,
}

impl Geometry {
    pub fn for_media(media: MediaProfile) -> Geometry {
        let (page_width, page_height) = media.page_size();
        Geometry {
            page_width,
            page_height,
            margins: media.margins(),
        }
    }

    pub fn body_width(&self) -> f64 {
        self.page_width - (self.margins.left + self.margins.right)
    }

    pub fn body_height(&self) -> f64 {
        self.page_height - (self.margins.top + self.margins.bottom)
    }
}
