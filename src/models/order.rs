use serde::{Deserialize, Serialize};

/// Order document accepted by the backend's order webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCreationRequest {
    /// `<reference>_paypal_<provider order id>`
    pub id: String,
    /// `YYYY-MM-DD HH:MM:SS`, empty when the provider gave no timestamp
    pub created: String,
    /// Always true: licenses are appended to an existing backend order
    pub append: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_code: String,
    pub licenses: Vec<LicenseKey>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseKey {
    pub key: String,
}

impl OrderCreationRequest {
    /// Add a license key, merging it into the existing entry for its product.
    pub fn push_license(&mut self, product_code: &str, key: &str) {
        let license = LicenseKey {
            key: key.to_string(),
        };
        match self
            .items
            .iter_mut()
            .find(|item| item.product_code == product_code)
        {
            Some(item) => item.licenses.push(license),
            None => self.items.push(OrderItem {
                product_code: product_code.to_string(),
                licenses: vec![license],
            }),
        }
    }

    pub fn license_count(&self) -> usize {
        self.items.iter().map(|item| item.licenses.len()).sum()
    }
}
