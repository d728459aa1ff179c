//! Sequencing of one order, from the interior PDF to a submitted order.
//!
//! Local checks (size, page count, cover) all run before the first remote
//! call, and every remote step runs at most once. The first failure ends the
//! run; the result records how far it got.

use crate::config::OrderConfig;
use crate::error::OrderError;
use crate::publisher::{PublishError, Publisher};
use crate::types::*;
use book_cover::{CoverSpec, CoverText, generate_cover, save_cover};
use book_format::{load_interior, select_size};
use std::fmt;
use std::path::PathBuf;

/// Progress of a run. States only ever advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WorkflowState {
    Start,
    SizeSelected,
    CoverGenerated,
    Authenticated,
    ProjectCreated,
    InteriorUploaded,
    CoverUploaded,
    SizeConfigured,
    Priced,
    Paid,
    Submitted,
}

impl WorkflowState {
    pub fn next(self) -> Option<WorkflowState> {
        use WorkflowState::*;
        match self {
            Start => Some(SizeSelected),
            SizeSelected => Some(CoverGenerated),
            CoverGenerated => Some(Authenticated),
            Authenticated => Some(ProjectCreated),
            ProjectCreated => Some(InteriorUploaded),
            InteriorUploaded => Some(CoverUploaded),
            CoverUploaded => Some(SizeConfigured),
            SizeConfigured => Some(Priced),
            Priced => Some(Paid),
            Paid => Some(Submitted),
            Submitted => None,
        }
    }

    /// Name of the step that leads into this state
    pub fn step_name(self) -> &'static str {
        use WorkflowState::*;
        match self {
            Start => "start",
            SizeSelected => "select size",
            CoverGenerated => "generate cover",
            Authenticated => "authenticate",
            ProjectCreated => "create project",
            InteriorUploaded => "upload interior",
            CoverUploaded => "upload cover",
            SizeConfigured => "configure size",
            Priced => "get price",
            Paid => "pay",
            Submitted => "submit order",
        }
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Run options that are not part of the account configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowOptions {
    /// Stop after pricing without paying
    pub dry_run: bool,
    /// Also write the generated cover here
    pub cover_out: Option<PathBuf>,
}

pub struct Workflow<'a, P> {
    publisher: P,
    config: &'a OrderConfig,
    options: WorkflowOptions,
    state: WorkflowState,
}

impl<'a, P: Publisher> Workflow<'a, P> {
    pub fn new(publisher: P, config: &'a OrderConfig, options: WorkflowOptions) -> Self {
        Self {
            publisher,
            config,
            options,
            state: WorkflowState::Start,
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn into_publisher(self) -> P {
        self.publisher
    }

    /// Place one order. Never panics on step failure; the error and the
    /// furthest state reached are returned in the result.
    pub async fn run(&mut self, request: &OrderRequest) -> OrderResult {
        self.state = WorkflowState::Start;
        let outcome = self.drive(request).await;

        match &outcome {
            Ok(Completion::Ordered(receipt)) => {
                log::info!("Order {} submitted ({})", receipt.order_id, receipt.price);
            }
            Ok(Completion::Quoted { project_id, price }) => {
                log::info!("Dry run: project {} would cost {}", project_id, price);
            }
            Err(err) => {
                let step = self.state.next().map_or("finish", WorkflowState::step_name);
                log::error!("Step '{}' failed after reaching {}: {}", step, self.state, err);
            }
        }

        OrderResult {
            reached: self.state,
            outcome,
        }
    }

    async fn drive(&mut self, request: &OrderRequest) -> Result<Completion, OrderError> {
        let config = self.config;

        // Local checks: nothing here touches the network
        let interior = load_interior(&request.pdf_path).await?;
        let size_match = select_size(interior.dimensions)?;
        config.print.binding.check_page_count(interior.page_count)?;
        if size_match.with_bleed {
            log::info!("Interior includes bleed around {}", size_match.size.name);
        }
        let product = SelectedProduct {
            size: size_match.size,
            options: config.print,
            page_count: interior.page_count,
        };
        self.advance(WorkflowState::SizeSelected);
        log::info!(
            "Selected {} ({} pages, {})",
            product.size.name,
            product.page_count,
            product.pod_package_id()
        );

        let text = CoverText::new(
            request.title.clone(),
            request.subtitle.clone(),
            request.author.clone(),
        );
        let spec = CoverSpec {
            trim: product.size,
            binding: config.print.binding,
            page_count: product.page_count,
        };
        let cover = generate_cover(&text, &spec).await?;
        if let Some(path) = &self.options.cover_out {
            save_cover(&cover, path).await?;
            log::info!("Cover written to {}", path.display());
        }
        self.advance(WorkflowState::CoverGenerated);

        // Remote steps, strictly in order
        let session = self
            .publisher
            .authenticate(&config.credentials)
            .await
            .map_err(OrderError::Auth)?;
        self.advance(WorkflowState::Authenticated);

        let project = self
            .publisher
            .create_project(&session, request)
            .await
            .map_err(OrderError::ProjectCreation)?;
        self.advance(WorkflowState::ProjectCreated);
        log::info!("Created project {}", project);

        let receipt = self
            .publisher
            .upload_interior(&session, &project, &request.pdf_path)
            .await
            .map_err(OrderError::Upload)?;
        self.advance(WorkflowState::InteriorUploaded);
        log::debug!("Interior stored as {}", receipt.file_id);

        let receipt = self
            .publisher
            .upload_cover(&session, &project, &cover)
            .await
            .map_err(OrderError::Upload)?;
        self.advance(WorkflowState::CoverUploaded);
        log::debug!("Cover stored as {}", receipt.file_id);

        let confirmation = self
            .publisher
            .configure_size(&session, &project, &product)
            .await
            .map_err(OrderError::Configuration)?;
        self.advance(WorkflowState::SizeConfigured);

        let price = self
            .publisher
            .get_price(&session, &project)
            .await
            .map_err(OrderError::Pricing)?;
        self.advance(WorkflowState::Priced);
        log::info!("Quoted {}", price);

        if self.options.dry_run {
            return Ok(Completion::Quoted {
                project_id: project,
                price,
            });
        }

        if let Some(limit) = &config.max_price {
            if !limit.allows(&price) {
                return Err(OrderError::Payment(PublishError::Rejected(format!(
                    "quoted {} exceeds the limit of {}",
                    price, limit
                ))));
            }
        }

        let payment = self
            .publisher
            .pay(&session, &project, &price, &config.payment)
            .await
            .map_err(OrderError::Payment)?;
        self.advance(WorkflowState::Paid);

        let order_id = self
            .publisher
            .submit_order(&session, &project, &payment, &config.shipping)
            .await
            .map_err(OrderError::Submission)?;
        self.advance(WorkflowState::Submitted);

        Ok(Completion::Ordered(OrderReceipt {
            order_id,
            project_id: project,
            payment_id: payment.payment_id,
            pod_package_id: confirmation.pod_package_id,
            price,
        }))
    }

    fn advance(&mut self, to: WorkflowState) {
        debug_assert!(to > self.state);
        log::info!("{} -> {}", self.state, to);
        self.state = to;
    }
}
