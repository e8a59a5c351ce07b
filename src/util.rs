//! Shared utility functions for the webhook connector.

use chrono::{DateTime, Utc};
use rand::RngCore;

/// Length in bytes of generated order references (26 hex characters).
const ORDER_REFERENCE_BYTES: usize = 13;

/// Random hex token used as an order reference when the provider gave none.
pub fn random_hex_token() -> String {
    let mut bytes = [0u8; ORDER_REFERENCE_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Convert an RFC 3339 timestamp (e.g. `2026-10-03T09:05:07Z`) to the
/// backend's `YYYY-MM-DD HH:MM:SS` form in UTC.
///
/// Returns None if the input is not RFC 3339.
pub fn format_backend_timestamp(rfc3339: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(rfc3339.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc).format("%Y-%m-%d %H:%M:%S").to_string())
}
