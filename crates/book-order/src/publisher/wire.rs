//! Request and response bodies

use crate::config::ShippingAddress;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default = "bearer")]
    pub token_type: String,
}

fn bearer() -> String {
    "Bearer".to_string()
}

#[derive(Debug, Serialize)]
pub(crate) struct NewProject<'a> {
    pub title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<&'a str>,
    pub author: &'a str,
    pub product_type: &'static str,
    pub goal: &'static str,
    pub category: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProjectCreated {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewFile<'a> {
    pub kind: &'static str,
    pub filename: &'a str,
    pub content_type: &'static str,
    pub size: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UploadSlot {
    pub file_id: String,
    pub upload_url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FileStatus {
    pub status: String,
    #[serde(default)]
    pub errors: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct Specification<'a> {
    pub pod_package_id: &'a str,
    pub trim_size: &'a str,
    pub page_count: usize,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SpecificationAccepted {
    pub pod_package_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PriceQuote {
    pub total_cost_incl_tax: String,
    pub currency: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewPayment<'a> {
    pub amount: String,
    pub currency: &'a str,
    pub payment_token: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PaymentResult {
    pub payment_id: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewOrder<'a> {
    pub payment_id: &'a str,
    pub quantity: u32,
    pub shipping_level: &'a str,
    pub shipping_address: &'a ShippingAddress,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OrderPlaced {
    pub order_id: String,
}

/// Body of a non-2xx response
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub message: String,
}
