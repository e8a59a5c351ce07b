//! Connector between a PayPal checkout front end and the LicenseSpring
//! license backend.
//!
//! Requests to the backend are signed with a date-based HMAC
//! ([`signing`]), delivered with bounded retries ([`backoff`]) and
//! translated to and from the front end's documents ([`webhook`]).

pub mod backoff;
pub mod config;
pub mod envelope;
pub mod error;
pub mod models;
pub mod payments;
pub mod signing;
pub mod transport;
pub mod util;
pub mod webhook;

pub use config::{Config, ConnectorSettings};
pub use envelope::ResponseEnvelope;
pub use error::{AppError, Result};
pub use webhook::LicenseSpringWebhook;
