//! Cover spread geometry

use crate::types::CoverSpec;
use book_format::constants::{BLEED_PT, POINTS_PER_INCH};

/// Rectangle in PDF points, origin at bottom-left
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

/// Layout of the full cover spread: bleed, back, spine, front, bleed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverGeometry {
    pub trim_width: f32,
    pub trim_height: f32,
    pub spine_width: f32,
    pub bleed: f32,
}

impl CoverGeometry {
    pub fn new(spec: &CoverSpec) -> Self {
        Self {
            trim_width: spec.trim.width_pt,
            trim_height: spec.trim.height_pt,
            spine_width: spec.binding.spine_width_in(spec.page_count) * POINTS_PER_INCH,
            bleed: BLEED_PT,
        }
    }

    /// Full page width including bleed
    pub fn width(&self) -> f32 {
        2.0 * self.trim_width + self.spine_width + 2.0 * self.bleed
    }

    /// Full page height including bleed
    pub fn height(&self) -> f32 {
        self.trim_height + 2.0 * self.bleed
    }

    pub fn media_box(&self) -> Rect {
        Rect {
            x: 0.0,
            y: 0.0,
            width: self.width(),
            height: self.height(),
        }
    }

    /// Area inside the trim line
    pub fn trim_box(&self) -> Rect {
        Rect {
            x: self.bleed,
            y: self.bleed,
            width: self.width() - 2.0 * self.bleed,
            height: self.trim_height,
        }
    }

    pub fn back_panel(&self) -> Rect {
        Rect {
            x: self.bleed,
            y: self.bleed,
            width: self.trim_width,
            height: self.trim_height,
        }
    }

    pub fn spine(&self) -> Rect {
        Rect {
            x: self.bleed + self.trim_width,
            y: self.bleed,
            width: self.spine_width,
            height: self.trim_height,
        }
    }

    pub fn front_panel(&self) -> Rect {
        Rect {
            x: self.bleed + self.trim_width + self.spine_width,
            y: self.bleed,
            width: self.trim_width,
            height: self.trim_height,
        }
    }
}
