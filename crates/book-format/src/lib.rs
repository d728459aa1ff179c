//! Print formats accepted by the publisher: the trim size catalog, binding
//! and paper options, and inspection of interior PDFs.

mod catalog;
pub mod constants;
mod interior;
mod options;
mod types;

pub use catalog::{SizeMatch, SupportedSize, catalog, select_size, select_size_from};
pub use interior::{Interior, inspect_interior, load_interior, page_dimensions};
pub use options::*;
pub use types::*;
