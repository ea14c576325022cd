//! Typed client for the service's REST surface.
//!
//! Everything network-facing goes through the [`Transport`] trait so the
//! submission, approval, and reporting flows can be exercised end to end
//! against a recording fake. A process wires a real blocking HTTP client
//! behind the trait; the rest of the module never knows the difference.

pub mod api;
pub mod approval;
pub mod form;
pub mod report_view;
pub mod retry;
pub mod session;
pub mod transport;

pub use api::ApiClient;
pub use approval::{ApprovalAction, Dialog, ListState, PendingApprovals};
pub use form::{FileAttachment, SubmissionForm};
pub use report_view::ReportView;
pub use retry::RetryPolicy;
pub use session::Session;
pub use transport::{ApiRequest, ApiResponse, FormPart, Method, PartValue, RequestBody, Transport};

use std::collections::BTreeMap;
use std::fmt;

/// Client-side error taxonomy.
///
/// `Validation` never reaches the transport; `Auth` additionally expires
/// the shared [`Session`] before surfacing.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientError {
    Validation(BTreeMap<String, String>),
    Request { status: u16, message: String },
    Auth,
    RateLimited,
    Network(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Validation(fields) => {
                write!(f, "Validation failed ({} fields)", fields.len())
            }
            ClientError::Request { status, message } => write!(f, "Request failed ({status}): {message}"),
            ClientError::Auth => write!(f, "Session expired"),
            ClientError::RateLimited => write!(f, "Too many requests"),
            ClientError::Network(msg) => write!(f, "Network failure: {msg}"),
        }
    }
}

impl std::error::Error for ClientError {}
