use crate::error::Result;
use crate::models::{Customer, OrderCreationRequest};
use crate::payments::{CapturedOrder, PayPalOrderCapture, PaymentProvider, SkuToken};
use crate::util::{format_backend_timestamp, random_hex_token};

/// Used in place of the PayPal order id when the capture has none.
const MISSING_PROVIDER_ORDER_ID: &str = "id";

/// Translate a raw PayPal capture into the backend's order document.
pub fn build_order_request(payload: &str) -> Result<OrderCreationRequest> {
    let captured = PayPalOrderCapture::parse(payload)?;
    Ok(order_request_from_capture(captured))
}

pub fn order_request_from_capture(captured: CapturedOrder) -> OrderCreationRequest {
    let reference = captured.reference_id.unwrap_or_else(random_hex_token);
    let provider_order_id = captured
        .id
        .unwrap_or_else(|| MISSING_PROVIDER_ORDER_ID.to_string());

    let created = match captured.create_time.as_deref() {
        Some(raw) => format_backend_timestamp(raw).unwrap_or_else(|| {
            tracing::warn!("Unparseable PayPal create_time {:?}, sending empty timestamp", raw);
            String::new()
        }),
        None => String::new(),
    };

    let customer = captured.payer.map(|payer| {
        let (first_name, last_name) = match payer.name {
            Some(name) => (
                Some(name.given_name.unwrap_or_default()),
                Some(name.surname.unwrap_or_default()),
            ),
            None => (None, None),
        };
        Customer {
            email: payer.email_address.unwrap_or_default(),
            first_name,
            last_name,
        }
    });

    let mut request = OrderCreationRequest {
        id: PaymentProvider::PayPal.order_id(&reference, &provider_order_id),
        created,
        append: true,
        customer,
        items: Vec::new(),
    };

    for item in &captured.items {
        let Some(sku) = item.sku.as_deref() else {
            continue;
        };
        match SkuToken::decode(sku) {
            Some(token) => request.push_license(&token.product_code, &token.license_key),
            None => tracing::debug!("Skipping item {:?} with unsupported sku", item.name),
        }
    }

    request
}
