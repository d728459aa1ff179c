//! Wraparound cover generation: back panel, spine and front panel on one
//! page, with bleed, built from the book's title, subtitle and author.

mod constants;
mod geometry;
mod render;
mod text;
mod types;

pub use geometry::CoverGeometry;
pub use render::{generate_cover, render_cover, save_cover};
pub use text::encode_win_ansi;
pub use types::*;
