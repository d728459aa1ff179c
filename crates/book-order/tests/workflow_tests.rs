use book_cover::CoverArtifact;
use book_format::FormatError;
use book_order::*;
use lopdf::{Dictionary, Document, Object, Stream};
use std::path::Path;
use tempfile::NamedTempFile;

// =============================================================================
// Fixtures
// =============================================================================

/// Scripted publisher that records every call and can fail at one step
struct FakePublisher {
    calls: Vec<&'static str>,
    fail_at: Option<&'static str>,
    price: Money,
    configured: Option<SelectedProduct>,
}

impl FakePublisher {
    fn new() -> Self {
        Self {
            calls: Vec::new(),
            fail_at: None,
            price: Money::new(2599, "USD"),
            configured: None,
        }
    }

    fn failing_at(step: &'static str) -> Self {
        Self {
            fail_at: Some(step),
            ..Self::new()
        }
    }

    fn record(&mut self, step: &'static str) -> Result<(), PublishError> {
        self.calls.push(step);
        if self.fail_at == Some(step) {
            Err(PublishError::Status {
                status: 402,
                message: format!("{} refused", step),
            })
        } else {
            Ok(())
        }
    }
}

impl Publisher for FakePublisher {
    async fn authenticate(&mut self, credentials: &Credentials) -> Result<RemoteSession, PublishError> {
        self.record("authenticate")?;
        assert_eq!(credentials.username, "writer@example.com");
        Ok(RemoteSession {
            access_token: "token-1".to_string(),
            token_type: "Bearer".to_string(),
        })
    }

    async fn create_project(
        &mut self,
        _session: &RemoteSession,
        _request: &OrderRequest,
    ) -> Result<ProjectId, PublishError> {
        self.record("create_project")?;
        Ok(ProjectId("proj-1".to_string()))
    }

    async fn upload_interior(
        &mut self,
        _session: &RemoteSession,
        _project: &ProjectId,
        pdf_path: &Path,
    ) -> Result<UploadReceipt, PublishError> {
        self.record("upload_interior")?;
        assert!(pdf_path.exists());
        Ok(UploadReceipt {
            file_id: "file-interior".to_string(),
            kind: FileKind::Interior,
        })
    }

    async fn upload_cover(
        &mut self,
        _session: &RemoteSession,
        _project: &ProjectId,
        cover: &CoverArtifact,
    ) -> Result<UploadReceipt, PublishError> {
        self.record("upload_cover")?;
        assert!(cover.bytes.starts_with(b"%PDF"));
        Ok(UploadReceipt {
            file_id: "file-cover".to_string(),
            kind: FileKind::Cover,
        })
    }

    async fn configure_size(
        &mut self,
        _session: &RemoteSession,
        _project: &ProjectId,
        product: &SelectedProduct,
    ) -> Result<SizeConfirmation, PublishError> {
        self.record("configure_size")?;
        self.configured = Some(*product);
        Ok(SizeConfirmation {
            pod_package_id: product.pod_package_id(),
        })
    }

    async fn get_price(&mut self, _session: &RemoteSession, _project: &ProjectId) -> Result<Money, PublishError> {
        self.record("get_price")?;
        Ok(self.price.clone())
    }

    async fn pay(
        &mut self,
        _session: &RemoteSession,
        _project: &ProjectId,
        price: &Money,
        _payment: &PaymentMethod,
    ) -> Result<PaymentConfirmation, PublishError> {
        self.record("pay")?;
        assert_eq!(*price, self.price);
        Ok(PaymentConfirmation {
            payment_id: "pay-1".to_string(),
        })
    }

    async fn submit_order(
        &mut self,
        _session: &RemoteSession,
        _project: &ProjectId,
        payment: &PaymentConfirmation,
        address: &ShippingAddress,
    ) -> Result<OrderId, PublishError> {
        self.record("submit_order")?;
        assert_eq!(payment.payment_id, "pay-1");
        assert_eq!(address.postcode, "62701");
        Ok(OrderId("ORD-1001".to_string()))
    }
}

const ALL_STEPS: [&str; 8] = [
    "authenticate",
    "create_project",
    "upload_interior",
    "upload_cover",
    "configure_size",
    "get_price",
    "pay",
    "submit_order",
];

fn base_vars() -> Vec<(String, String)> {
    [
        ("LULU_USERNAME", "writer@example.com"),
        ("LULU_PASSWORD", "hunter2"),
        ("LULU_PAYMENT_TOKEN", "tok_visa"),
        ("SHIP_NAME", "Jane Doe"),
        ("SHIP_STREET1", "1 Main St"),
        ("SHIP_CITY", "Springfield"),
        ("SHIP_POSTCODE", "62701"),
        ("SHIP_COUNTRY", "us"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn config_with(extra: &[(&str, &str)]) -> OrderConfig {
    let mut vars = base_vars();
    vars.extend(extra.iter().map(|(k, v)| (k.to_string(), v.to_string())));
    OrderConfig::from_vars(vars).unwrap()
}

/// Write a PDF whose pages have the given sizes
fn write_interior(sizes: &[(f32, f32)]) -> NamedTempFile {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for &(width, height) in sizes {
        let content_id = doc.add_object(Stream::new(Dictionary::new(), b"q Q".to_vec()));
        let page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(width),
                    Object::Real(height),
                ]),
            ),
            ("Contents", Object::Reference(content_id)),
        ]);
        kids.push(Object::Reference(doc.add_object(page)));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(sizes.len() as i64)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);

    let file = NamedTempFile::new().unwrap();
    doc.save(file.path()).unwrap();
    file
}

fn letter_interior(pages: usize) -> NamedTempFile {
    write_interior(&vec![(612.0, 792.0); pages])
}

fn request_for(file: &NamedTempFile) -> OrderRequest {
    OrderRequest::new(file.path(), "Sample Book", "", "Jane Doe")
}

async fn run_with(
    publisher: FakePublisher,
    config: &OrderConfig,
    options: WorkflowOptions,
    request: &OrderRequest,
) -> (OrderResult, FakePublisher) {
    let mut workflow = Workflow::new(publisher, config, options);
    let result = workflow.run(request).await;
    assert_eq!(workflow.state(), result.reached);
    (result, workflow.into_publisher())
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn test_full_order_for_us_letter() {
    let interior = letter_interior(40);
    let config = config_with(&[]);
    let request = request_for(&interior);

    let (result, publisher) =
        run_with(FakePublisher::new(), &config, WorkflowOptions::default(), &request).await;

    assert!(result.success(), "{:?}", result.error());
    assert_eq!(result.reached, WorkflowState::Submitted);
    assert_eq!(result.order_id().map(|id| id.0.as_str()), Some("ORD-1001"));
    assert_eq!(result.failed_step(), None);
    assert_eq!(publisher.calls, ALL_STEPS);

    let product = publisher.configured.unwrap();
    assert_eq!(product.size.name, "US Letter");
    assert_eq!(product.page_count, 40);

    match result.outcome {
        Ok(Completion::Ordered(receipt)) => {
            assert_eq!(receipt.pod_package_id, "0850X1100BWSTDPB060UW444MXX");
            assert_eq!(receipt.project_id.0, "proj-1");
            assert_eq!(receipt.payment_id, "pay-1");
            assert_eq!(receipt.price, Money::new(2599, "USD"));
        }
        other => panic!("expected an order, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unsupported_size_makes_no_remote_calls() {
    let interior = write_interior(&vec![(72.0, 72.0); 40]);
    let config = config_with(&[]);
    let request = request_for(&interior);

    let (result, publisher) =
        run_with(FakePublisher::new(), &config, WorkflowOptions::default(), &request).await;

    assert!(!result.success());
    assert!(matches!(result.error(), Some(OrderError::UnsupportedSize(_))));
    assert_eq!(result.reached, WorkflowState::Start);
    assert_eq!(result.failed_step(), Some("select size"));
    assert_eq!(result.error().map(OrderError::exit_code), Some(4));
    assert!(publisher.calls.is_empty());
}

#[tokio::test]
async fn test_payment_failure_stops_before_submission() {
    let interior = letter_interior(40);
    let config = config_with(&[]);
    let request = request_for(&interior);

    let (result, publisher) = run_with(
        FakePublisher::failing_at("pay"),
        &config,
        WorkflowOptions::default(),
        &request,
    )
    .await;

    assert!(matches!(result.error(), Some(OrderError::Payment(_))));
    assert_eq!(result.reached, WorkflowState::Priced);
    assert_eq!(result.failed_step(), Some("pay"));
    assert_eq!(result.order_id(), None);
    assert_eq!(publisher.calls, &ALL_STEPS[..7]);
    assert!(!publisher.calls.contains(&"submit_order"));
}

#[tokio::test]
async fn test_no_step_runs_after_a_failure() {
    let interior = letter_interior(40);
    let config = config_with(&[]);
    let request = request_for(&interior);

    for (idx, step) in ALL_STEPS.into_iter().enumerate() {
        let (result, publisher) = run_with(
            FakePublisher::failing_at(step),
            &config,
            WorkflowOptions::default(),
            &request,
        )
        .await;

        assert!(!result.success(), "run should fail at {}", step);
        assert_eq!(publisher.calls, &ALL_STEPS[..=idx], "failing at {}", step);
    }
}

#[tokio::test]
async fn test_failure_kinds_and_exit_codes_per_step() {
    let interior = letter_interior(40);
    let config = config_with(&[]);
    let request = request_for(&interior);

    let expected = [
        ("authenticate", WorkflowState::CoverGenerated, 10),
        ("create_project", WorkflowState::Authenticated, 11),
        ("upload_interior", WorkflowState::ProjectCreated, 12),
        ("upload_cover", WorkflowState::InteriorUploaded, 12),
        ("configure_size", WorkflowState::CoverUploaded, 13),
        ("get_price", WorkflowState::SizeConfigured, 14),
        ("pay", WorkflowState::Priced, 15),
        ("submit_order", WorkflowState::Paid, 16),
    ];

    for (step, reached, code) in expected {
        let (result, _) = run_with(
            FakePublisher::failing_at(step),
            &config,
            WorkflowOptions::default(),
            &request,
        )
        .await;

        let err = result.error().unwrap();
        assert_eq!(result.reached, reached, "failing at {}", step);
        assert_eq!(err.exit_code(), code, "failing at {}", step);
        assert_eq!(err.after_payment(), step == "submit_order");
    }
}

#[tokio::test]
async fn test_pay_only_after_size_configured() {
    let interior = letter_interior(40);
    let config = config_with(&[]);
    let request = request_for(&interior);

    let (result, publisher) = run_with(
        FakePublisher::failing_at("configure_size"),
        &config,
        WorkflowOptions::default(),
        &request,
    )
    .await;

    assert!(matches!(result.error(), Some(OrderError::Configuration(_))));
    assert_eq!(result.failed_step(), Some("configure size"));
    assert!(!publisher.calls.contains(&"get_price"));
    assert!(!publisher.calls.contains(&"pay"));
}

// =============================================================================
// Local validation
// =============================================================================

#[tokio::test]
async fn test_page_count_checked_before_remote_calls() {
    let interior = letter_interior(60);
    let config = config_with(&[("LULU_BINDING", "saddle")]);
    let request = request_for(&interior);

    let (result, publisher) =
        run_with(FakePublisher::new(), &config, WorkflowOptions::default(), &request).await;

    match result.error() {
        Some(OrderError::Interior(FormatError::PageCount { pages, max, .. })) => {
            assert_eq!(*pages, 60);
            assert_eq!(*max, 48);
        }
        other => panic!("expected a page count error, got {:?}", other),
    }
    assert_eq!(result.reached, WorkflowState::Start);
    assert!(publisher.calls.is_empty());
}

#[tokio::test]
async fn test_mixed_page_sizes_rejected_locally() {
    let interior = write_interior(&[(612.0, 792.0), (612.0, 792.0), (432.0, 648.0)]);
    let config = config_with(&[("LULU_BINDING", "coil")]);
    let request = request_for(&interior);

    let (result, publisher) =
        run_with(FakePublisher::new(), &config, WorkflowOptions::default(), &request).await;

    assert!(matches!(
        result.error(),
        Some(OrderError::Interior(FormatError::MixedPageSizes { page: 3, .. }))
    ));
    assert!(publisher.calls.is_empty());
}

#[tokio::test]
async fn test_missing_interior_file() {
    let config = config_with(&[]);
    let request = OrderRequest::new("/nonexistent/book.pdf", "Sample Book", "", "Jane Doe");

    let (result, publisher) =
        run_with(FakePublisher::new(), &config, WorkflowOptions::default(), &request).await;

    assert!(matches!(result.error(), Some(OrderError::Interior(FormatError::Io(_)))));
    assert!(publisher.calls.is_empty());
}

#[tokio::test]
async fn test_cover_failure_makes_no_remote_calls() {
    let interior = letter_interior(40);
    let config = config_with(&[]);
    let request = OrderRequest::new(interior.path(), "   ", "", "Jane Doe");

    let (result, publisher) =
        run_with(FakePublisher::new(), &config, WorkflowOptions::default(), &request).await;

    assert!(matches!(result.error(), Some(OrderError::CoverRender(_))));
    assert_eq!(result.reached, WorkflowState::SizeSelected);
    assert_eq!(result.failed_step(), Some("generate cover"));
    assert_eq!(result.error().map(OrderError::exit_code), Some(5));
    assert!(publisher.calls.is_empty());
}

// =============================================================================
// Dry run and price ceiling
// =============================================================================

#[tokio::test]
async fn test_dry_run_stops_after_pricing() {
    let interior = letter_interior(40);
    let config = config_with(&[]);
    let request = request_for(&interior);
    let cover_out = NamedTempFile::new().unwrap();
    let options = WorkflowOptions {
        dry_run: true,
        cover_out: Some(cover_out.path().to_path_buf()),
    };

    let (result, publisher) = run_with(FakePublisher::new(), &config, options, &request).await;

    assert!(result.success());
    assert_eq!(result.reached, WorkflowState::Priced);
    assert_eq!(result.order_id(), None);
    assert_eq!(publisher.calls, &ALL_STEPS[..6]);
    match result.outcome {
        Ok(Completion::Quoted { project_id, price }) => {
            assert_eq!(project_id.0, "proj-1");
            assert_eq!(price.to_string(), "25.99 USD");
        }
        other => panic!("expected a quote, got {:?}", other),
    }

    let written = std::fs::read(cover_out.path()).unwrap();
    assert!(written.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_price_ceiling_blocks_payment() {
    let interior = letter_interior(40);
    let config = config_with(&[("LULU_MAX_PRICE", "20.00 USD")]);
    let request = request_for(&interior);

    let (result, publisher) =
        run_with(FakePublisher::new(), &config, WorkflowOptions::default(), &request).await;

    assert!(matches!(
        result.error(),
        Some(OrderError::Payment(PublishError::Rejected(_)))
    ));
    assert_eq!(result.reached, WorkflowState::Priced);
    assert_eq!(result.failed_step(), Some("pay"));
    assert!(!publisher.calls.contains(&"pay"));
}

#[tokio::test]
async fn test_price_within_ceiling_is_paid() {
    let interior = letter_interior(40);
    let config = config_with(&[("LULU_MAX_PRICE", "30")]);
    let request = request_for(&interior);

    let (result, publisher) =
        run_with(FakePublisher::new(), &config, WorkflowOptions::default(), &request).await;

    assert!(result.success());
    assert_eq!(publisher.calls, ALL_STEPS);
}

#[tokio::test]
async fn test_print_options_reach_the_publisher() {
    let interior = write_interior(&vec![(432.0, 648.0); 120]);
    let config = config_with(&[
        ("LULU_BINDING", "case"),
        ("LULU_INTERIOR_COLOR", "full"),
        ("LULU_PAPER", "coated"),
        ("LULU_COVER_FINISH", "gloss"),
    ]);
    let request = request_for(&interior);

    let (result, publisher) =
        run_with(FakePublisher::new(), &config, WorkflowOptions::default(), &request).await;

    assert!(result.success(), "{:?}", result.error());
    let product = publisher.configured.unwrap();
    assert_eq!(product.size.name, "US Trade");
    assert_eq!(product.pod_package_id(), "0600X0900FCSTDCW080CW444GXX");
}
