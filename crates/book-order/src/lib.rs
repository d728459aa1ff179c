//! Ordering a printed book: configuration, the publisher's remote
//! operations, and the workflow that sequences them.

mod config;
mod error;
mod money;
pub mod publisher;
mod types;
mod workflow;

pub use config::*;
pub use error::OrderError;
pub use money::{Money, ParseMoneyError, PriceLimit};
pub use publisher::{HttpPublisher, MAX_UPLOAD_BYTES, PublishError, Publisher};
pub use types::*;
pub use workflow::{Workflow, WorkflowOptions, WorkflowState};
