//! Trim sizes accepted by the publisher and matching of interior pages
//! against them.

use crate::constants::{BLEED_PT, POINTS_PER_INCH, SIZE_TOLERANCE_PT};
use crate::types::*;

/// A trim size the publisher prints
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SupportedSize {
    pub name: &'static str,
    /// Size code as it appears in the POD package id (`WWWWXHHHH`, hundredths of an inch)
    pub code: &'static str,
    pub width_pt: f32,
    pub height_pt: f32,
    pub tolerance_pt: f32,
}

const fn trim(name: &'static str, code: &'static str, width_in: f32, height_in: f32) -> SupportedSize {
    SupportedSize {
        name,
        code,
        width_pt: width_in * POINTS_PER_INCH,
        height_pt: height_in * POINTS_PER_INCH,
        tolerance_pt: SIZE_TOLERANCE_PT,
    }
}

/// Catalog in order of preference. The first entry that matches wins.
static CATALOG: [SupportedSize; 16] = [
    trim("US Trade", "0600X0900", 6.0, 9.0),
    trim("US Letter", "0850X1100", 8.5, 11.0),
    trim("Digest", "0550X0850", 5.5, 8.5),
    trim("A5", "0583X0827", 5.83, 8.27),
    trim("A4", "0827X1169", 8.27, 11.69),
    trim("Novella", "0500X0800", 5.0, 8.0),
    trim("Royal", "0614X0921", 6.14, 9.21),
    trim("Executive", "0700X1000", 7.0, 10.0),
    trim("Pocketbook", "0425X0687", 4.25, 6.875),
    trim("Comic Book", "0663X1025", 6.625, 10.25),
    trim("Crown Quarto", "0744X0969", 7.44, 9.69),
    trim("Square", "0850X0850", 8.5, 8.5),
    trim("Small Square", "0750X0750", 7.5, 7.5),
    trim("Landscape", "0900X0700", 9.0, 7.0),
    trim("US Letter Landscape", "1100X0850", 11.0, 8.5),
    trim("A4 Landscape", "1169X0827", 11.69, 8.27),
];

/// The built-in size catalog
pub fn catalog() -> &'static [SupportedSize] {
    &CATALOG
}

impl SupportedSize {
    /// Trim dimensions
    pub fn dimensions(&self) -> PageDimensions {
        PageDimensions::new(self.width_pt, self.height_pt)
    }

    /// Trim dimensions plus bleed on every edge
    pub fn bleed_dimensions(&self) -> PageDimensions {
        PageDimensions::new(
            self.width_pt + 2.0 * BLEED_PT,
            self.height_pt + 2.0 * BLEED_PT,
        )
    }

    /// Whether `page` is this size at trim
    pub fn matches(&self, page: PageDimensions) -> bool {
        self.dimensions().approx_eq(page, self.tolerance_pt)
    }

    /// Whether `page` is this size with bleed included
    pub fn matches_with_bleed(&self, page: PageDimensions) -> bool {
        self.bleed_dimensions().approx_eq(page, self.tolerance_pt)
    }
}

/// Result of size selection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeMatch {
    pub size: SupportedSize,
    /// The interior was supplied with bleed rather than at trim
    pub with_bleed: bool,
}

/// Select from the built-in catalog
pub fn select_size(page: PageDimensions) -> Result<SizeMatch> {
    select_size_from(catalog(), page)
}

/// Find the first catalog entry that `page` matches, at trim or with bleed.
pub fn select_size_from(catalog: &[SupportedSize], page: PageDimensions) -> Result<SizeMatch> {
    for size in catalog {
        if size.matches(page) {
            return Ok(SizeMatch {
                size: *size,
                with_bleed: false,
            });
        }
        if size.matches_with_bleed(page) {
            return Ok(SizeMatch {
                size: *size,
                with_bleed: true,
            });
        }
    }
    Err(FormatError::UnsupportedSize(page))
}
