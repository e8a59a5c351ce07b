use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// A `code` or `quantity` as the front end sent it. Forwarded to the backend
/// as-is, so `"2"` and `2` are both accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Text(String),
    Number(Number),
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Text(s) => f.write_str(s),
            ScalarValue::Number(n) => write!(f, "{}", n),
        }
    }
}

/// The fields of one product entry the backend needs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductRequest {
    pub code: ScalarValue,
    pub quantity: ScalarValue,
}

impl ProductRequest {
    /// Query parameters for the backend license webhook.
    pub fn license_query(&self) -> Vec<(String, String)> {
        vec![
            ("product".to_string(), self.code.to_string()),
            ("quantity".to_string(), self.quantity.to_string()),
        ]
    }
}

/// License request sent by the front end. The parsed document is kept as
/// received so the resolved response mirrors it field for field.
#[derive(Debug, Clone, PartialEq)]
pub struct LicenseRequestDocument {
    pub products: Vec<ProductRequest>,
    document: Map<String, Value>,
}

impl LicenseRequestDocument {
    /// `products` must be read from `document["products"]`, in order.
    pub fn new(document: Map<String, Value>, products: Vec<ProductRequest>) -> Self {
        Self { products, document }
    }

    pub fn document(&self) -> &Map<String, Value> {
        &self.document
    }

    /// Set `licenses` on the product entry at `index`, in place.
    pub fn set_licenses(&mut self, index: usize, licenses: Value) {
        if let Some(Value::Object(product)) = self
            .document
            .get_mut("products")
            .and_then(Value::as_array_mut)
            .and_then(|products| products.get_mut(index))
        {
            product.insert("licenses".to_string(), licenses);
        }
    }

    pub fn into_document(self) -> Map<String, Value> {
        self.document
    }
}

/// A request whose every product carries backend license data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LicenseResponseDocument(pub Map<String, Value>);

impl LicenseResponseDocument {
    pub fn products(&self) -> &[Value] {
        self.0
            .get("products")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
