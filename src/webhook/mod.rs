//! LicenseSpring webhook connector.
//!
//! Two flows are supported:
//! 1. Order: a PayPal capture is turned into an order document and POSTed to
//!    the order webhook, appending its licenses to the backend order.
//! 2. Licenses: a front-end request lists products and quantities; each
//!    product is resolved with one GET to the license webhook.

mod license;
mod order;

pub use license::*;
pub use order::*;

use crate::backoff::{BackendCallResult, deliver};
use crate::config::{Config, ConnectorSettings};
use crate::envelope::ResponseEnvelope;
use crate::error::{AppError, Result};
use crate::signing::{SignedHeaders, Signer};
use crate::transport::{HttpRequest, HttpTransport, ReqwestTransport};

#[derive(Debug, Clone)]
pub struct LicenseSpringWebhook<T = ReqwestTransport> {
    signer: Signer,
    settings: ConnectorSettings,
    transport: T,
}

impl LicenseSpringWebhook<ReqwestTransport> {
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.api_key.clone(),
            config.shared_key.clone(),
            config.settings(),
            ReqwestTransport::new(),
        )
    }
}

impl<T: HttpTransport> LicenseSpringWebhook<T> {
    pub fn new(
        api_key: impl Into<String>,
        secret_key: impl Into<String>,
        settings: ConnectorSettings,
        transport: T,
    ) -> Self {
        Self {
            signer: Signer::new(api_key, secret_key),
            settings,
            transport,
        }
    }

    pub fn settings(&self) -> &ConnectorSettings {
        &self.settings
    }

    pub fn signer(&self) -> &Signer {
        &self.signer
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Pretty JSON `{success, message}` for the front end.
    pub fn generate_response(success: bool, message: impl Into<String>) -> String {
        ResponseEnvelope::new(success, message).to_json_pretty()
    }

    /// PayPal capture to the JSON body of the order webhook.
    pub fn generate_order_from_paypal(&self, payload: &str) -> Result<String> {
        let request = build_order_request(payload)?;
        serde_json::to_string(&request)
            .map_err(|e| AppError::Internal(format!("Failed to serialize order: {}", e)))
    }

    pub fn to_frontend_envelope(&self, result: &BackendCallResult) -> ResponseEnvelope {
        ResponseEnvelope::from_backend(
            result,
            &self.settings.order_success_message,
            &self.settings.order_error_message,
        )
    }

    /// POST an order document to the backend. Never fails; problems end up
    /// in the envelope.
    pub async fn create_order(&self, order_json: &str) -> ResponseEnvelope {
        let headers = match self.signer.signed_headers() {
            Ok(headers) => headers,
            Err(e) => {
                tracing::error!("Failed to sign order request: {}", e);
                return ResponseEnvelope::failure(self.settings.order_error_message.clone());
            }
        };
        let request = HttpRequest::post(self.settings.order_url(), order_json)
            .with_headers(headers.to_pairs());

        let result = deliver(&self.transport, &self.settings.backoff, &request).await;
        if result.success {
            tracing::info!("Order accepted by LicenseSpring");
        } else {
            tracing::error!(
                "Order rejected by LicenseSpring: status={:?}",
                result.status
            );
        }
        self.to_frontend_envelope(&result)
    }

    /// Full order flow: translate the capture, then submit it.
    pub async fn process_paypal_order(&self, payload: &str) -> ResponseEnvelope {
        let order_json = match self.generate_order_from_paypal(payload) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to build order from PayPal capture: {}", e);
                return ResponseEnvelope::failure(self.settings.order_error_message.clone());
            }
        };
        self.create_order(&order_json).await
    }

    /// Resolve license keys for every product in the request. The success
    /// envelope's message is the resolved document as JSON.
    pub async fn get_license_keys(&self, payload: &str) -> Result<ResponseEnvelope> {
        let document = parse_license_request(payload)?;

        // One signature covers every product call
        let headers: SignedHeaders = self.signer.signed_headers()?;
        let resolved = resolve_licenses(
            &self.transport,
            &self.settings.backoff,
            &self.settings.license_url(),
            document,
            &headers,
        )
        .await?;

        tracing::info!("Resolved licenses for {} products", resolved.products().len());

        let message = resolved
            .to_json()
            .map_err(|e| AppError::Internal(format!("Failed to serialize licenses: {}", e)))?;
        Ok(ResponseEnvelope::success(message))
    }

    /// Like `get_license_keys`, but reduces errors to a failure envelope.
    pub async fn license_envelope(&self, payload: &str) -> ResponseEnvelope {
        match self.get_license_keys(payload).await {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::error!("License request failed: {}", e);
                ResponseEnvelope::from_error(&e, &self.settings.license_error_message)
            }
        }
    }
}
