//! PayPal order capture documents, as handed to us by the checkout front end.
//!
//! Only the fields the order webhook needs are modelled; everything else in
//! the capture is ignored.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::Deserialize;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct PayPalOrderCapture {
    pub id: Option<String>,
    pub create_time: Option<String>,
    pub payer: Option<PayPalPayer>,
    pub purchase_units: Option<Vec<PayPalPurchaseUnit>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PayPalPayer {
    pub email_address: Option<String>,
    pub name: Option<PayPalPayerName>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PayPalPayerName {
    pub given_name: Option<String>,
    pub surname: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PayPalPurchaseUnit {
    pub reference_id: Option<String>,
    pub items: Option<Vec<PayPalItem>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PayPalItem {
    pub name: Option<String>,
    pub sku: Option<String>,
}

/// A capture that passed structural validation: it has a first purchase unit
/// with at least one item.
#[derive(Debug, Clone)]
pub struct CapturedOrder {
    pub id: Option<String>,
    pub create_time: Option<String>,
    pub payer: Option<PayPalPayer>,
    pub reference_id: Option<String>,
    pub items: Vec<PayPalItem>,
}

impl PayPalOrderCapture {
    /// Parse and validate a raw capture payload.
    pub fn parse(payload: &str) -> Result<CapturedOrder> {
        let capture: PayPalOrderCapture = serde_json::from_str(payload).map_err(|e| {
            AppError::MalformedUpstreamPayload(format!("PayPal response has invalid JSON format: {}", e))
        })?;
        capture.validate()
    }

    pub fn validate(self) -> Result<CapturedOrder> {
        let units = self.purchase_units.ok_or_else(|| {
            AppError::MalformedUpstreamPayload("PayPal response missing 'purchase_units' object.".into())
        })?;

        // Additional purchase units are not forwarded to the backend
        let unit = units.into_iter().next().ok_or_else(|| {
            AppError::MalformedUpstreamPayload("PayPal response missing 'purchase_units' data.".into())
        })?;

        let items = unit.items.ok_or_else(|| {
            AppError::MalformedUpstreamPayload("PayPal response missing 'items' object.".into())
        })?;
        if items.is_empty() {
            return Err(AppError::MalformedUpstreamPayload(
                "PayPal response has an empty 'items' list.".into(),
            ));
        }

        Ok(CapturedOrder {
            id: self.id,
            create_time: self.create_time,
            payer: self.payer,
            reference_id: unit.reference_id,
            items,
        })
    }
}

/// Standard alphabet, accepting tokens with or without `=` padding.
const SKU_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// License assignment smuggled through an item's SKU as
/// base64(`"<product_code>;<license_key>"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkuToken {
    pub product_code: String,
    pub license_key: String,
}

impl SkuToken {
    /// Decode a SKU. Whitespace and missing padding are tolerated. Returns
    /// `None` for anything that is not exactly `code;key` once decoded.
    pub fn decode(sku: &str) -> Option<Self> {
        let compact: String = sku.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        let bytes = SKU_ENGINE.decode(compact).ok()?;
        let decoded = String::from_utf8(bytes).ok()?;
        let mut parts = decoded.split(';');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(product_code), Some(license_key), None) => Some(Self {
                product_code: product_code.to_string(),
                license_key: license_key.to_string(),
            }),
            _ => None,
        }
    }

    pub fn encode(&self) -> String {
        STANDARD.encode(format!("{};{}", self.product_code, self.license_key))
    }
}
