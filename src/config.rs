use std::env;
use std::fmt;
use std::time::Duration;

use crate::backoff::BackoffPolicy;
use crate::error::{AppError, Result};

pub const DEFAULT_API_HOST: &str = "https://api.licensespring.com";
pub const LICENSE_ENDPOINT: &str = "/api/v3/webhook/license";
pub const ORDER_ENDPOINT: &str = "/api/v3/webhook/order";

pub const ORDER_SUCCESS_MESSAGE: &str = "License keys successfuly activated.";
pub const ORDER_ERROR_MESSAGE: &str =
    "There was a problem activating your license keys. Please contact LicenseSpring.";
pub const LICENSE_ERROR_MESSAGE: &str =
    "There was a problem obtaining your license keys. Please contact LicenseSpring.";

/// Immutable settings held by the connector for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorSettings {
    pub api_host: String,
    pub license_endpoint: String,
    pub order_endpoint: String,
    pub backoff: BackoffPolicy,
    /// Envelope message for a successful order
    pub order_success_message: String,
    /// Envelope message when the backend error body has no usable detail
    pub order_error_message: String,
    /// Envelope message for a license request that could not be resolved
    pub license_error_message: String,
}

impl Default for ConnectorSettings {
    fn default() -> Self {
        Self {
            api_host: DEFAULT_API_HOST.to_string(),
            license_endpoint: LICENSE_ENDPOINT.to_string(),
            order_endpoint: ORDER_ENDPOINT.to_string(),
            backoff: BackoffPolicy::default(),
            order_success_message: ORDER_SUCCESS_MESSAGE.to_string(),
            order_error_message: ORDER_ERROR_MESSAGE.to_string(),
            license_error_message: LICENSE_ERROR_MESSAGE.to_string(),
        }
    }
}

impl ConnectorSettings {
    pub fn with_api_host(mut self, api_host: impl Into<String>) -> Self {
        self.api_host = api_host.into();
        self
    }

    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn order_url(&self) -> String {
        format!("{}{}", self.api_host.trim_end_matches('/'), self.order_endpoint)
    }

    pub fn license_url(&self) -> String {
        format!("{}{}", self.api_host.trim_end_matches('/'), self.license_endpoint)
    }
}

#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    /// HMAC secret, never transmitted
    pub shared_key: String,
    pub api_host: String,
    pub backoff_steps: u32,
    pub backoff_wait_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| AppError::Config(format!("{} is not set", name)))
        };

        let api_key = required("LICENSESPRING_API_KEY")?;
        let shared_key = required("LICENSESPRING_SHARED_KEY")?;

        let api_host = lookup("LICENSESPRING_API_HOST")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_HOST.to_string());

        let backoff_steps: u32 = match lookup("LICENSESPRING_BACKOFF_STEPS") {
            Some(v) => v.parse().map_err(|_| {
                AppError::Config(format!("LICENSESPRING_BACKOFF_STEPS is not a number: {}", v))
            })?,
            None => BackoffPolicy::DEFAULT_MAX_ATTEMPTS,
        };
        if backoff_steps == 0 {
            return Err(AppError::Config(
                "LICENSESPRING_BACKOFF_STEPS must be at least 1".into(),
            ));
        }

        let backoff_wait_ms: u64 = match lookup("LICENSESPRING_BACKOFF_WAIT_MS") {
            Some(v) => v.parse().map_err(|_| {
                AppError::Config(format!("LICENSESPRING_BACKOFF_WAIT_MS is not a number: {}", v))
            })?,
            None => BackoffPolicy::DEFAULT_BASE_DELAY_MS,
        };

        Ok(Self {
            api_key,
            shared_key,
            api_host,
            backoff_steps,
            backoff_wait_ms,
        })
    }

    pub fn settings(&self) -> ConnectorSettings {
        ConnectorSettings::default()
            .with_api_host(self.api_host.clone())
            .with_backoff(BackoffPolicy::new(
                self.backoff_steps,
                Duration::from_millis(self.backoff_wait_ms),
            ))
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key)
            .field("shared_key", &"<redacted>")
            .field("api_host", &self.api_host)
            .field("backoff_steps", &self.backoff_steps)
            .field("backoff_wait_ms", &self.backoff_wait_ms)
            .finish()
    }
}
