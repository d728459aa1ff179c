use crate::config::ConfigError;
use crate::publisher::PublishError;
use book_cover::CoverError;
use book_format::{FormatError, PageDimensions};
use thiserror::Error;

/// Why an order run stopped. Every variant is fatal.
#[derive(Error, Debug)]
pub enum OrderError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Unsupported page size: no trim size matches {0}")]
    UnsupportedSize(PageDimensions),
    #[error("Interior rejected: {0}")]
    Interior(#[source] FormatError),
    #[error("Cover could not be rendered: {0}")]
    CoverRender(#[from] CoverError),
    #[error("Authentication failed: {0}")]
    Auth(#[source] PublishError),
    #[error("Project creation failed: {0}")]
    ProjectCreation(#[source] PublishError),
    #[error("Upload failed: {0}")]
    Upload(#[source] PublishError),
    #[error("Size configuration rejected: {0}")]
    Configuration(#[source] PublishError),
    #[error("Pricing failed: {0}")]
    Pricing(#[source] PublishError),
    #[error("Payment failed: {0}")]
    Payment(#[source] PublishError),
    #[error("Order submission failed: {0}")]
    Submission(#[source] PublishError),
}

impl From<FormatError> for OrderError {
    fn from(err: FormatError) -> Self {
        match err {
            FormatError::UnsupportedSize(dims) => OrderError::UnsupportedSize(dims),
            other => OrderError::Interior(other),
        }
    }
}

impl OrderError {
    /// Process exit code for this failure
    pub fn exit_code(&self) -> u8 {
        match self {
            OrderError::Config(_) => 3,
            OrderError::UnsupportedSize(_) | OrderError::Interior(_) => 4,
            OrderError::CoverRender(_) => 5,
            OrderError::Auth(_) => 10,
            OrderError::ProjectCreation(_) => 11,
            OrderError::Upload(_) => 12,
            OrderError::Configuration(_) => 13,
            OrderError::Pricing(_) => 14,
            OrderError::Payment(_) => 15,
            OrderError::Submission(_) => 16,
        }
    }

    /// Whether money may have changed hands
    pub fn after_payment(&self) -> bool {
        matches!(self, OrderError::Submission(_))
    }
}
