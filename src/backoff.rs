//! Bounded retry of backend calls.
//!
//! Delays grow linearly with the attempt number (`attempt * base_delay`),
//! which is what the LicenseSpring integration has always done even though it
//! is usually called exponential backoff. With the defaults the waits are
//! 100ms, 200ms, ... 900ms, 4.5s in total before the tenth and final attempt.

use std::time::Duration;

use crate::error::AppError;
use crate::transport::{HttpRequest, HttpTransport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Total number of transport calls, including the first one
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl BackoffPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;
    pub const DEFAULT_BASE_DELAY_MS: u64 = 100;

    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Wait after the failed `attempt` (1-indexed) before trying again.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }

    /// Sum of every wait when all attempts fail.
    pub fn worst_case_delay(&self) -> Duration {
        (1..self.max_attempts).map(|attempt| self.delay_after(attempt)).sum()
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_MAX_ATTEMPTS,
            Duration::from_millis(Self::DEFAULT_BASE_DELAY_MS),
        )
    }
}

/// Outcome of one logical backend call, after retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendCallResult {
    pub success: bool,
    /// Response body on success, diagnostic or error body on failure
    pub message: Option<String>,
    /// HTTP status, absent when the transport itself failed
    pub status: Option<u16>,
}

impl BackendCallResult {
    pub fn succeeded(status: u16, body: String) -> Self {
        Self {
            success: true,
            message: Some(body),
            status: Some(status),
        }
    }

    pub fn rejected(status: u16, body: String) -> Self {
        Self {
            success: false,
            message: Some(body),
            status: Some(status),
        }
    }

    pub fn transport_failed(diagnostic: String) -> Self {
        Self {
            success: false,
            message: Some(diagnostic),
            status: None,
        }
    }

    pub fn message_or_empty(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }

    /// Convert a failed call into the matching error. Successful calls map to
    /// `Ok` with their body.
    pub fn into_result(self) -> Result<String, AppError> {
        match (self.success, self.status) {
            (true, _) => Ok(self.message.unwrap_or_default()),
            (false, Some(status)) => Err(AppError::BackendRejected {
                status,
                body: self.message.unwrap_or_default(),
            }),
            (false, None) => Err(AppError::TransportFailure(self.message.unwrap_or_default())),
        }
    }
}

fn is_accepted(status: u16) -> bool {
    status == 200 || status == 201
}

async fn attempt<T>(transport: &T, request: &HttpRequest) -> BackendCallResult
where
    T: HttpTransport + ?Sized,
{
    match transport.send(request).await {
        Ok(response) if is_accepted(response.status) => {
            BackendCallResult::succeeded(response.status, response.body)
        }
        Ok(response) => BackendCallResult::rejected(response.status, response.body),
        Err(e) => BackendCallResult::transport_failed(e.0),
    }
}

/// Send `request`, retrying failures until one succeeds or `policy` runs out
/// of attempts. The last failure is returned unchanged.
pub async fn deliver<T>(
    transport: &T,
    policy: &BackoffPolicy,
    request: &HttpRequest,
) -> BackendCallResult
where
    T: HttpTransport + ?Sized,
{
    let mut attempt_no = 1;
    loop {
        let result = attempt(transport, request).await;
        if result.success {
            if attempt_no > 1 {
                tracing::info!(
                    "{} {} succeeded on attempt {}",
                    request.method,
                    request.url,
                    attempt_no
                );
            }
            return result;
        }

        if attempt_no >= policy.max_attempts {
            tracing::error!(
                "{} {} failed after {} attempts: status={:?}",
                request.method,
                request.url,
                attempt_no,
                result.status
            );
            return result;
        }

        let delay = policy.delay_after(attempt_no);
        tracing::warn!(
            "{} {} attempt {} failed (status={:?}), retrying in {:?}",
            request.method,
            request.url,
            attempt_no,
            result.status,
            delay
        );
        tokio::time::sleep(delay).await;
        attempt_no += 1;
    }
}
