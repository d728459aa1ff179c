use crate::error::OrderError;
use crate::money::Money;
use crate::workflow::WorkflowState;
use book_format::{PrintOptions, SupportedSize};
use std::fmt;
use std::path::PathBuf;

/// The book to order, as given on the command line
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub pdf_path: PathBuf,
    pub title: String,
    pub subtitle: Option<String>,
    pub author: String,
}

impl OrderRequest {
    /// A blank subtitle means the book has none
    pub fn new(
        pdf_path: impl Into<PathBuf>,
        title: impl Into<String>,
        subtitle: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        let subtitle = subtitle.into();
        Self {
            pdf_path: pdf_path.into(),
            title: title.into(),
            subtitle: (!subtitle.trim().is_empty()).then_some(subtitle),
            author: author.into(),
        }
    }
}

/// Publisher-assigned project handle
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectId(pub String);

/// Publisher-assigned order number
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderId(pub String);

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Authenticated session for one run
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteSession {
    pub access_token: String,
    pub token_type: String,
}

impl RemoteSession {
    /// Value for the `Authorization` header
    pub fn authorization(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

impl fmt::Debug for RemoteSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteSession")
            .field("token_type", &self.token_type)
            .finish_non_exhaustive()
    }
}

/// Which file an upload carried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Interior,
    Cover,
}

impl FileKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FileKind::Interior => "interior",
            FileKind::Cover => "cover",
        }
    }
}

/// Publisher's acknowledgement of an accepted file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub file_id: String,
    pub kind: FileKind,
}

/// Trim size plus print options, as sent to the publisher
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectedProduct {
    pub size: SupportedSize,
    pub options: PrintOptions,
    pub page_count: usize,
}

impl SelectedProduct {
    pub fn pod_package_id(&self) -> String {
        self.options.pod_package_id(&self.size)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeConfirmation {
    pub pod_package_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentConfirmation {
    pub payment_id: String,
}

/// Identifiers of a placed order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderReceipt {
    pub order_id: OrderId,
    pub project_id: ProjectId,
    pub payment_id: String,
    pub pod_package_id: String,
    pub price: Money,
}

/// How a successful run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Dry run: priced but not paid
    Quoted { project_id: ProjectId, price: Money },
    /// Paid and submitted
    Ordered(OrderReceipt),
}

/// Terminal output of the workflow
#[derive(Debug)]
pub struct OrderResult {
    /// Furthest state reached
    pub reached: WorkflowState,
    pub outcome: Result<Completion, OrderError>,
}

impl OrderResult {
    pub fn success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn order_id(&self) -> Option<&OrderId> {
        match &self.outcome {
            Ok(Completion::Ordered(receipt)) => Some(&receipt.order_id),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&OrderError> {
        self.outcome.as_ref().err()
    }

    /// Name of the step that failed, if any
    pub fn failed_step(&self) -> Option<&'static str> {
        if self.outcome.is_err() {
            self.reached.next().map(WorkflowState::step_name)
        } else {
            None
        }
    }
}
