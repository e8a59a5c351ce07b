//! Front-end response envelopes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::backoff::BackendCallResult;
use crate::error::AppError;

/// Uniform `{success, message}` shape returned to the front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub success: bool,
    pub message: String,
}

/// Error body returned by the backend, e.g.
/// `{"errors":[{"message":"Invalid key","value":"XYZ"}]}`.
#[derive(Debug, Deserialize)]
struct BackendErrorBody {
    errors: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct BackendErrorDetail {
    message: Value,
    value: Value,
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Extract `"<message>: <value>"` from the first error of a backend body.
pub fn extract_backend_error(body: &str) -> Option<String> {
    let parsed: BackendErrorBody = serde_json::from_str(body).ok()?;
    let first = parsed.errors.into_iter().next()?;
    let detail: BackendErrorDetail = serde_json::from_value(first).ok()?;
    Some(format!("{}: {}", render(&detail.message), render(&detail.value)))
}

impl ResponseEnvelope {
    pub fn new(success: bool, message: impl Into<String>) -> Self {
        Self {
            success,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(true, message)
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(false, message)
    }

    /// Build the envelope for a backend call. Never fails: an unreadable error
    /// body falls back to `generic_failure`.
    pub fn from_backend(
        result: &BackendCallResult,
        success_message: &str,
        generic_failure: &str,
    ) -> Self {
        if result.success {
            return Self::success(success_message);
        }
        let message = result
            .message
            .as_deref()
            .and_then(extract_backend_error)
            .unwrap_or_else(|| generic_failure.to_string());
        Self::failure(message)
    }

    /// Reduce an error to something safe to show the front end.
    pub fn from_error(error: &AppError, generic_failure: &str) -> Self {
        let message = error
            .backend_body()
            .and_then(extract_backend_error)
            .unwrap_or_else(|| generic_failure.to_string());
        Self::failure(message)
    }

    pub fn to_json_pretty(&self) -> String {
        // A struct of a bool and a string always serializes
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
