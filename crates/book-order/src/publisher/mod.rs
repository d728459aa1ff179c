//! The publisher's remote operations
//!
//! Each operation depends on the previous one having succeeded and none is
//! retried. Operations that upload, configure, pay or submit change remote
//! state and are not idempotent.

mod http;
mod wire;

pub use http::{HttpPublisher, MAX_UPLOAD_BYTES};

use crate::config::{Credentials, PaymentMethod, ShippingAddress};
use crate::money::Money;
use crate::types::*;
use book_cover::CoverArtifact;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Rejected: {0}")]
    Rejected(String),
    #[error("Unexpected response: {0}")]
    Decode(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type PublishResult<T> = std::result::Result<T, PublishError>;

/// Remote operations needed to place one order
#[allow(async_fn_in_trait)]
pub trait Publisher {
    async fn authenticate(&mut self, credentials: &Credentials) -> PublishResult<RemoteSession>;

    async fn create_project(
        &mut self,
        session: &RemoteSession,
        request: &OrderRequest,
    ) -> PublishResult<ProjectId>;

    async fn upload_interior(
        &mut self,
        session: &RemoteSession,
        project: &ProjectId,
        pdf_path: &Path,
    ) -> PublishResult<UploadReceipt>;

    async fn upload_cover(
        &mut self,
        session: &RemoteSession,
        project: &ProjectId,
        cover: &CoverArtifact,
    ) -> PublishResult<UploadReceipt>;

    /// Fails when the publisher's live catalog does not accept `product`
    async fn configure_size(
        &mut self,
        session: &RemoteSession,
        project: &ProjectId,
        product: &SelectedProduct,
    ) -> PublishResult<SizeConfirmation>;

    async fn get_price(&mut self, session: &RemoteSession, project: &ProjectId) -> PublishResult<Money>;

    /// Point of no return: once this succeeds the order is paid for
    async fn pay(
        &mut self,
        session: &RemoteSession,
        project: &ProjectId,
        price: &Money,
        payment: &PaymentMethod,
    ) -> PublishResult<PaymentConfirmation>;

    async fn submit_order(
        &mut self,
        session: &RemoteSession,
        project: &ProjectId,
        payment: &PaymentConfirmation,
        address: &ShippingAddress,
    ) -> PublishResult<OrderId>;
}
