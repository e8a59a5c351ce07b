mod paypal;

pub use paypal::*;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentProvider {
    PayPal,
}

impl PaymentProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentProvider::PayPal => "paypal",
        }
    }

    /// Backend order id for an order placed through this provider.
    pub fn order_id(&self, reference: &str, provider_order_id: &str) -> String {
        format!("{}_{}_{}", reference, self.as_str(), provider_order_id)
    }
}
