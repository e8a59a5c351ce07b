//! Error types for the LicenseSpring webhook connector.

use thiserror::Error;

/// Errors raised while translating or delivering webhook payloads.
#[derive(Debug, Error)]
pub enum AppError {
    /// The payment provider's order document is not valid JSON or lacks
    /// required structure. Raised before any backend call.
    #[error("malformed upstream payload: {0}")]
    MalformedUpstreamPayload(String),

    /// A license request is missing `products` or a product's `code`/`quantity`.
    /// Raised before any backend call.
    #[error("missing required field: {0}")]
    MissingRequiredField(String),

    /// The HTTP client failed before a response was received.
    #[error("transport failure: {0}")]
    TransportFailure(String),

    /// The backend answered with a status other than 200/201.
    #[error("backend rejected request with status {status}: {body}")]
    BackendRejected { status: u16, body: String },

    /// A license call still failed after every retry was spent.
    #[error("There was a problem obtaining license codes from LicenseSpring: {0}")]
    UpstreamLicenseFetchFailed(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether the failure happened before anything was sent to the backend.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            AppError::MalformedUpstreamPayload(_) | AppError::MissingRequiredField(_)
        )
    }

    /// Raw backend body carried by this error, if any.
    pub fn backend_body(&self) -> Option<&str> {
        match self {
            AppError::BackendRejected { body, .. } => Some(body),
            AppError::UpstreamLicenseFetchFailed(body) => Some(body),
            _ => None,
        }
    }
}

/// Result type for connector operations
pub type Result<T> = std::result::Result<T, AppError>;
