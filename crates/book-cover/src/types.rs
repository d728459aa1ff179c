use book_format::{Binding, SupportedSize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoverError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("Cover {field} is empty")]
    EmptyText { field: &'static str },
    #[error("Cover {field} contains {ch:?}, which the cover fonts cannot render")]
    Unencodable { field: &'static str, ch: char },
    #[error("Cover {field} does not fit on the front panel")]
    TextTooLong { field: &'static str },
}

pub type Result<T> = std::result::Result<T, CoverError>;

/// Words printed on the cover
#[derive(Debug, Clone, PartialEq)]
pub struct CoverText {
    pub title: String,
    pub subtitle: Option<String>,
    pub author: String,
}

impl CoverText {
    /// A blank subtitle is treated as no subtitle
    pub fn new(title: impl Into<String>, subtitle: Option<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.filter(|s| !s.trim().is_empty()),
            author: author.into(),
        }
    }
}

/// Physical book the cover wraps
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverSpec {
    pub trim: SupportedSize,
    pub binding: Binding,
    pub page_count: usize,
}

/// A rendered cover, ready to upload
#[derive(Debug, Clone, PartialEq)]
pub struct CoverArtifact {
    pub bytes: Vec<u8>,
    pub width_pt: f32,
    pub height_pt: f32,
    pub spine_width_pt: f32,
}
