use crate::constants::pt_to_in;
use crate::options::Binding;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormatError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("Interior has no pages")]
    NoPages,
    #[error("Page {page} has no usable MediaBox")]
    InvalidPageBox { page: usize },
    #[error("Page {page} is {found}, but the interior starts at {expected}")]
    MixedPageSizes {
        page: usize,
        expected: PageDimensions,
        found: PageDimensions,
    },
    #[error("No supported trim size matches {0}")]
    UnsupportedSize(PageDimensions),
    #[error("{binding} accepts {min}-{max} pages, interior has {pages}")]
    PageCount {
        binding: Binding,
        pages: usize,
        min: usize,
        max: usize,
    },
    #[error("Unknown {kind}: {value:?}")]
    UnknownOption { kind: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, FormatError>;

/// Page size in PDF points, with any page rotation already applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageDimensions {
    pub width_pt: f32,
    pub height_pt: f32,
}

impl PageDimensions {
    pub fn new(width_pt: f32, height_pt: f32) -> Self {
        Self {
            width_pt,
            height_pt,
        }
    }

    pub fn from_inches(width_in: f32, height_in: f32) -> Self {
        Self::new(
            crate::constants::in_to_pt(width_in),
            crate::constants::in_to_pt(height_in),
        )
    }

    pub fn width_in(self) -> f32 {
        pt_to_in(self.width_pt)
    }

    pub fn height_in(self) -> f32 {
        pt_to_in(self.height_pt)
    }

    /// Swap width and height (quarter-turn rotation)
    pub fn rotated(self) -> Self {
        Self::new(self.height_pt, self.width_pt)
    }

    /// True when both dimensions are within `tolerance_pt` of `other`
    pub fn approx_eq(self, other: PageDimensions, tolerance_pt: f32) -> bool {
        (self.width_pt - other.width_pt).abs() <= tolerance_pt
            && (self.height_pt - other.height_pt).abs() <= tolerance_pt
    }
}

impl fmt::Display for PageDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1} x {:.1} pt ({:.2} x {:.2} in)",
            self.width_pt,
            self.height_pt,
            self.width_in(),
            self.height_in()
        )
    }
}
