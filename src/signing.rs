//! Request signing for the LicenseSpring webhook API.
//!
//! Every request carries a `Date` header and an `Authorization` header whose
//! signature is an HMAC-SHA256 over that exact date string. The backend
//! recomputes the signature from the received `Date` header, so both headers
//! must be produced from the same stamp.

use std::fmt;

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::{AppError, Result};

type HmacSha256 = Hmac<Sha256>;

const SIGNING_PREFIX: &str = "licenseSpring\ndate: ";

/// Render a timestamp the way the backend expects in the `Date` header,
/// e.g. `Sat, 3 Oct 2026 09:05:07 GMT`.
pub fn format_date_header(at: DateTime<Utc>) -> String {
    at.format("%a, %-d %b %Y %H:%M:%S GMT").to_string()
}

/// Headers attached to every backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub date: String,
    pub authorization: String,
}

impl SignedHeaders {
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        vec![
            ("Date".to_string(), self.date.clone()),
            ("Authorization".to_string(), self.authorization.clone()),
            ("Content-Type".to_string(), "application/json".to_string()),
        ]
    }
}

#[derive(Clone)]
pub struct Signer {
    api_key: String,
    secret_key: String,
}

impl Signer {
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: secret_key.into(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Base64 HMAC-SHA256 of `"licenseSpring\ndate: <date_stamp>"`.
    pub fn sign(&self, date_stamp: &str) -> Result<String> {
        Ok(STANDARD.encode(self.digest(date_stamp)?))
    }

    /// Check a signature for `date_stamp` in constant time.
    pub fn verify(&self, date_stamp: &str, signature: &str) -> bool {
        let Ok(provided) = STANDARD.decode(signature) else {
            return false;
        };
        let Ok(expected) = self.digest(date_stamp) else {
            return false;
        };
        provided.len() == expected.len() && bool::from(expected.as_slice().ct_eq(&provided))
    }

    pub fn authorization_header(&self, date_stamp: &str) -> Result<String> {
        Ok(format!(
            "algorithm=\"hmac-sha256\",headers=\"date\",signature=\"{}\",apiKey=\"{}\"",
            self.sign(date_stamp)?,
            self.api_key
        ))
    }

    /// Sign for the current time.
    pub fn signed_headers(&self) -> Result<SignedHeaders> {
        self.signed_headers_at(Utc::now())
    }

    pub fn signed_headers_at(&self, at: DateTime<Utc>) -> Result<SignedHeaders> {
        let date = format_date_header(at);
        let authorization = self.authorization_header(&date)?;
        Ok(SignedHeaders { date, authorization })
    }

    fn digest(&self, date_stamp: &str) -> Result<Vec<u8>> {
        let mut mac = HmacSha256::new_from_slice(self.secret_key.as_bytes())
            .map_err(|_| AppError::Internal("Invalid signing secret".into()))?;
        mac.update(SIGNING_PREFIX.as_bytes());
        mac.update(date_stamp.as_bytes());
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("api_key", &self.api_key)
            .finish_non_exhaustive()
    }
}
