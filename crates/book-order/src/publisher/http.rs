//! Publisher client over HTTPS
//!
//! Requests go through a blocking `ureq` agent on the blocking pool and are
//! awaited one at a time. Transport failures and timeouts surface as
//! `PublishError::Transport`; the workflow turns them into the failing
//! step's error.

use super::wire::*;
use super::{PublishError, PublishResult, Publisher};
use crate::config::{ApiSettings, Credentials, OrderConfig, PaymentMethod, ShippingAddress};
use crate::money::Money;
use crate::types::*;
use book_cover::CoverArtifact;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Largest file accepted for upload (1 GiB)
pub const MAX_UPLOAD_BYTES: u64 = 1 << 30;

const PDF_CONTENT_TYPE: &str = "application/pdf";

pub struct HttpPublisher {
    agent: ureq::Agent,
    base_url: String,
    shipping_level: String,
    category: String,
}

impl HttpPublisher {
    pub fn new(api: &ApiSettings, shipping_level: &str, category: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(api.timeout)
            .user_agent(concat!("bookord/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            agent,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            shipping_level: shipping_level.to_string(),
            category: category.to_string(),
        }
    }

    pub fn from_config(config: &OrderConfig) -> Self {
        Self::new(&config.api, &config.shipping_level, &config.category)
    }

    /// Resolve a path (or an absolute URL handed out by the publisher)
    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        }
    }

    fn authorized(&self, method: &str, path: &str, session: &RemoteSession) -> ureq::Request {
        log::debug!("{} {}", method, path);
        self.agent
            .request(method, &self.url(path))
            .set("Authorization", &session.authorization())
    }

    /// Register a file, send its bytes, then ask the publisher to validate it
    async fn upload(
        &self,
        session: &RemoteSession,
        project: &ProjectId,
        kind: FileKind,
        filename: &str,
        bytes: Vec<u8>,
    ) -> PublishResult<UploadReceipt> {
        let size = bytes.len() as u64;
        if size > MAX_UPLOAD_BYTES {
            return Err(PublishError::Rejected(format!(
                "{} is {} bytes, the limit is {}",
                filename, size, MAX_UPLOAD_BYTES
            )));
        }

        let files_path = format!("/projects/{}/files", project);
        let request = self.authorized("POST", &files_path, session);
        let body = to_body(&NewFile {
            kind: kind.as_str(),
            filename,
            content_type: PDF_CONTENT_TYPE,
            size,
        })?;
        let slot: UploadSlot = blocking(move || read_json(request.send_json(body))).await?;

        log::debug!("PUT {} ({} bytes)", slot.upload_url, size);
        let request = self
            .agent
            .put(&self.url(&slot.upload_url))
            .set("Content-Type", PDF_CONTENT_TYPE);
        blocking(move || expect_success(request.send_bytes(&bytes))).await?;

        let complete_path = format!("{}/{}/complete", files_path, slot.file_id);
        let request = self.authorized("POST", &complete_path, session);
        let status: FileStatus = blocking(move || read_json(request.call())).await?;

        if status.status != "accepted" {
            let detail = if status.errors.is_empty() {
                format!("{} file {}", kind.as_str(), status.status)
            } else {
                status.errors.join("; ")
            };
            return Err(PublishError::Rejected(detail));
        }

        Ok(UploadReceipt {
            file_id: slot.file_id,
            kind,
        })
    }
}

impl Publisher for HttpPublisher {
    async fn authenticate(&mut self, credentials: &Credentials) -> PublishResult<RemoteSession> {
        log::debug!("POST /auth/token");
        let request = self.agent.post(&self.url("/auth/token"));
        let username = credentials.username.clone();
        let password = credentials.password.clone();

        let token: TokenResponse = blocking(move || {
            read_json(request.send_form(&[
                ("grant_type", "password"),
                ("username", username.as_str()),
                ("password", password.as_str()),
            ]))
        })
        .await?;

        if token.access_token.is_empty() {
            return Err(PublishError::Decode("empty access token".to_string()));
        }
        Ok(RemoteSession {
            access_token: token.access_token,
            token_type: token.token_type,
        })
    }

    async fn create_project(
        &mut self,
        session: &RemoteSession,
        request: &OrderRequest,
    ) -> PublishResult<ProjectId> {
        let body = to_body(&NewProject {
            title: &request.title,
            subtitle: request.subtitle.as_deref(),
            author: &request.author,
            product_type: "print_book",
            goal: "print_your_book",
            category: &self.category,
        })?;
        let http = self.authorized("POST", "/projects", session);
        let created: ProjectCreated = blocking(move || read_json(http.send_json(body))).await?;
        Ok(ProjectId(created.id))
    }

    async fn upload_interior(
        &mut self,
        session: &RemoteSession,
        project: &ProjectId,
        pdf_path: &Path,
    ) -> PublishResult<UploadReceipt> {
        let size = tokio::fs::metadata(pdf_path).await?.len();
        if size > MAX_UPLOAD_BYTES {
            return Err(PublishError::Rejected(format!(
                "interior is {} bytes, the limit is {}",
                size, MAX_UPLOAD_BYTES
            )));
        }
        let bytes = tokio::fs::read(pdf_path).await?;
        let filename = pdf_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "interior.pdf".to_string());
        self.upload(session, project, FileKind::Interior, &filename, bytes)
            .await
    }

    async fn upload_cover(
        &mut self,
        session: &RemoteSession,
        project: &ProjectId,
        cover: &CoverArtifact,
    ) -> PublishResult<UploadReceipt> {
        self.upload(session, project, FileKind::Cover, "cover.pdf", cover.bytes.clone())
            .await
    }

    async fn configure_size(
        &mut self,
        session: &RemoteSession,
        project: &ProjectId,
        product: &SelectedProduct,
    ) -> PublishResult<SizeConfirmation> {
        let requested = product.pod_package_id();
        let body = to_body(&Specification {
            pod_package_id: &requested,
            trim_size: product.size.name,
            page_count: product.page_count,
        })?;
        let http = self.authorized("PUT", &format!("/projects/{}/specification", project), session);
        let accepted: SpecificationAccepted =
            blocking(move || read_json(http.send_json(body))).await?;

        if accepted.pod_package_id != requested {
            return Err(PublishError::Rejected(format!(
                "requested {} but the publisher configured {}",
                requested, accepted.pod_package_id
            )));
        }
        Ok(SizeConfirmation {
            pod_package_id: accepted.pod_package_id,
        })
    }

    async fn get_price(&mut self, session: &RemoteSession, project: &ProjectId) -> PublishResult<Money> {
        let http = self
            .authorized("GET", &format!("/projects/{}/price", project), session)
            .query("quantity", "1")
            .query("shipping_level", &self.shipping_level);
        let quote: PriceQuote = blocking(move || read_json(http.call())).await?;

        Money::parse(&quote.total_cost_incl_tax, &quote.currency)
            .map_err(|e| PublishError::Decode(e.to_string()))
    }

    async fn pay(
        &mut self,
        session: &RemoteSession,
        project: &ProjectId,
        price: &Money,
        payment: &PaymentMethod,
    ) -> PublishResult<PaymentConfirmation> {
        let body = to_body(&NewPayment {
            amount: price.to_decimal_string(),
            currency: &price.currency,
            payment_token: &payment.token,
        })?;
        let http = self.authorized("POST", &format!("/projects/{}/payments", project), session);
        let result: PaymentResult = blocking(move || read_json(http.send_json(body))).await?;

        if result.status != "succeeded" {
            return Err(PublishError::Rejected(format!("payment {}", result.status)));
        }
        Ok(PaymentConfirmation {
            payment_id: result.payment_id,
        })
    }

    async fn submit_order(
        &mut self,
        session: &RemoteSession,
        project: &ProjectId,
        payment: &PaymentConfirmation,
        address: &ShippingAddress,
    ) -> PublishResult<OrderId> {
        let body = to_body(&NewOrder {
            payment_id: &payment.payment_id,
            quantity: 1,
            shipping_level: &self.shipping_level,
            shipping_address: address,
        })?;
        let http = self.authorized("POST", &format!("/projects/{}/orders", project), session);
        let placed: OrderPlaced = blocking(move || read_json(http.send_json(body))).await?;

        if placed.order_id.is_empty() {
            return Err(PublishError::Decode("empty order id".to_string()));
        }
        Ok(OrderId(placed.order_id))
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Run a blocking request on the blocking pool
async fn blocking<T, F>(f: F) -> PublishResult<T>
where
    F: FnOnce() -> PublishResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await?
}

fn to_body<T: Serialize>(body: &T) -> PublishResult<serde_json::Value> {
    serde_json::to_value(body).map_err(|e| PublishError::Decode(e.to_string()))
}

fn read_json<T: DeserializeOwned>(result: Result<ureq::Response, ureq::Error>) -> PublishResult<T> {
    match result {
        Ok(response) => response
            .into_json::<T>()
            .map_err(|e| PublishError::Decode(e.to_string())),
        Err(err) => Err(request_error(err)),
    }
}

fn expect_success(result: Result<ureq::Response, ureq::Error>) -> PublishResult<()> {
    result.map(|_| ()).map_err(request_error)
}

fn request_error(err: ureq::Error) -> PublishError {
    match err {
        ureq::Error::Status(status, response) => {
            let body = response.into_string().unwrap_or_default();
            PublishError::Status {
                status,
                message: error_message(&body),
            }
        }
        ureq::Error::Transport(transport) => PublishError::Transport(transport.to_string()),
    }
}

/// `message` from a JSON error body, else the raw body
pub(crate) fn error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => parsed.message,
        Err(_) if body.trim().is_empty() => "no details".to_string(),
        Err(_) => body.trim().to_string(),
    }
}
