//! Cover template constants (points unless noted)

use book_format::constants::POINTS_PER_INCH;

/// Distance kept between text and the trim line on the front panel
pub const SAFE_MARGIN: f32 = 0.5 * POINTS_PER_INCH;

/// Top of the title block, measured down from the trim top
pub const TITLE_TOP_OFFSET: f32 = 1.5 * POINTS_PER_INCH;

/// Author baseline, measured up from the trim bottom
pub const AUTHOR_BASELINE_OFFSET: f32 = 1.0 * POINTS_PER_INCH;

/// Gap between the title block and the subtitle
pub const SUBTITLE_GAP: f32 = 0.3 * POINTS_PER_INCH;

/// Minimum clearance between the subtitle (or title) and the author block
pub const AUTHOR_CLEARANCE: f32 = 0.25 * POINTS_PER_INCH;

/// Baseline-to-baseline distance as a multiple of font size
pub const LINE_SPACING: f32 = 1.2;

/// (largest, smallest, max lines) for each text block
pub const TITLE_FIT: (f32, f32, usize) = (40.0, 18.0, 3);
pub const SUBTITLE_FIT: (f32, f32, usize) = (20.0, 12.0, 2);
pub const AUTHOR_FIT: (f32, f32, usize) = (22.0, 12.0, 2);

/// Font size step when shrinking text to fit
pub const FIT_STEP: f32 = 2.0;

/// Spine text sizing
pub const SPINE_FONT_MAX: f32 = 14.0;
pub const SPINE_FONT_MIN: f32 = 6.0;
/// Spine text height as a fraction of spine width
pub const SPINE_FONT_RATIO: f32 = 0.6;

/// Background and text colours (DeviceRGB)
pub const BACKGROUND_RGB: (f32, f32, f32) = (0.12, 0.2, 0.35);
pub const TEXT_RGB: (f32, f32, f32) = (1.0, 1.0, 1.0);

/// Resource names for the two base-14 fonts
pub const FONT_REGULAR: &[u8] = b"F1";
pub const FONT_BOLD: &[u8] = b"F2";
