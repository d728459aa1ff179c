//! Shared constants for print formats
//!
//! Everything is expressed in PDF points unless the name says otherwise.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per inch
pub const POINTS_PER_INCH: f32 = 72.0;

/// Convert inches to points
#[inline]
pub fn in_to_pt(inches: f32) -> f32 {
    inches * POINTS_PER_INCH
}

/// Convert points to inches
#[inline]
pub fn pt_to_in(pt: f32) -> f32 {
    pt / POINTS_PER_INCH
}

// =============================================================================
// Size Matching
// =============================================================================

/// Allowed difference per dimension when matching a page against the catalog (points).
/// Absorbs rounding from metric sizes and PDF writers that emit reals.
pub const SIZE_TOLERANCE_PT: f32 = 2.0;

/// Bleed added beyond the trim line on every edge (inches)
pub const BLEED_IN: f32 = 0.125;

/// Bleed added beyond the trim line on every edge (points)
pub const BLEED_PT: f32 = BLEED_IN * POINTS_PER_INCH;

// =============================================================================
// Spine
// =============================================================================

/// Interior pages per inch of spine for the standard paper stocks
pub const PAGES_PER_INCH: f32 = 444.0;

/// Fixed allowance added to every spine for the cover stock (inches)
pub const SPINE_ALLOWANCE_IN: f32 = 0.06;

/// Narrowest spine that carries printed text (inches)
pub const MIN_SPINE_TEXT_IN: f32 = 0.25;

// =============================================================================
// Page Tree
// =============================================================================

/// Maximum depth followed through `/Parent` links when resolving inherited
/// page attributes. Guards against cyclic page trees.
pub const MAX_PAGE_TREE_DEPTH: usize = 64;
