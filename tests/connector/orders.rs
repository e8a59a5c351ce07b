//! PayPal capture to order webhook tests

use licensespring_webhook::AppError;
use licensespring_webhook::models::{LicenseKey, OrderCreationRequest};
use licensespring_webhook::transport::{HttpMethod, Payload};
use licensespring_webhook::webhook::build_order_request;

use crate::common::*;

fn keys(request: &OrderCreationRequest, product_code: &str) -> Vec<String> {
    request
        .items
        .iter()
        .find(|item| item.product_code == product_code)
        .map(|item| item.licenses.iter().map(|l| l.key.clone()).collect())
        .unwrap_or_default()
}

#[test]
fn test_builds_full_order() {
    let request = build_order_request(&paypal_capture(&[SKU_A1, SKU_B1])).unwrap();

    assert_eq!(request.id, "ref-42_paypal_5O190127TN364715T");
    assert_eq!(request.created, "2026-10-03 09:05:07");
    assert!(request.append);

    let customer = request.customer.as_ref().unwrap();
    assert_eq!(customer.email, "buyer@example.com");
    assert_eq!(customer.first_name.as_deref(), Some("Ada"));
    assert_eq!(customer.last_name.as_deref(), Some("Lovelace"));

    assert_eq!(request.items.len(), 2);
    assert_eq!(keys(&request, "PROD-A"), vec!["KEY-AAAA-1111"]);
    assert_eq!(keys(&request, "PROD-B"), vec!["KEY-BBBB-1111"]);
}

#[test]
fn test_same_product_code_merged_in_first_seen_order() {
    let request = build_order_request(&paypal_capture(&[SKU_A1, SKU_B1, SKU_A2])).unwrap();

    let codes: Vec<&str> = request.items.iter().map(|i| i.product_code.as_str()).collect();
    assert_eq!(codes, vec!["PROD-A", "PROD-B"]);
    assert_eq!(keys(&request, "PROD-A"), vec!["KEY-AAAA-1111", "KEY-AAAA-2222"]);
    assert_eq!(request.license_count(), 3);
}

#[test]
fn test_malformed_skus_are_skipped() {
    let request =
        build_order_request(&paypal_capture(&[SKU_NO_SEPARATOR, "%%%", SKU_B1])).unwrap();

    assert_eq!(request.items.len(), 1);
    assert_eq!(keys(&request, "PROD-B"), vec!["KEY-BBBB-1111"]);
}

#[test]
fn test_unpadded_sku_is_decoded() {
    let request = build_order_request(&paypal_capture(&[SKU_A1_UNPADDED, SKU_A2])).unwrap();

    assert_eq!(request.items.len(), 1);
    assert_eq!(keys(&request, "PROD-A"), vec!["KEY-AAAA-1111", "KEY-AAAA-2222"]);
}

#[test]
fn test_only_first_purchase_unit_used() {
    let payload = serde_json::json!({
        "id": "ORDER",
        "purchase_units": [
            {"reference_id": "first", "items": [{"sku": SKU_A1}]},
            {"reference_id": "second", "items": [{"sku": SKU_B1}]}
        ]
    })
    .to_string();

    let request = build_order_request(&payload).unwrap();
    assert_eq!(request.id, "first_paypal_ORDER");
    assert_eq!(request.items.len(), 1);
    assert_eq!(request.items[0].product_code, "PROD-A");
}

#[test]
fn test_payer_without_name_has_email_only() {
    let payload = serde_json::json!({
        "id": "ORDER",
        "payer": {"email_address": "a@b.c"},
        "purchase_units": [{"reference_id": "r", "items": [{"sku": SKU_A1}]}]
    })
    .to_string();

    let request = build_order_request(&payload).unwrap();
    let json: serde_json::Value = serde_json::to_value(&request).unwrap();
    assert_eq!(json["customer"], serde_json::json!({"email": "a@b.c"}));
}

#[test]
fn test_partial_name_fills_empty_strings() {
    let payload = serde_json::json!({
        "payer": {"name": {"given_name": "Ada"}},
        "purchase_units": [{"reference_id": "r", "items": [{"sku": SKU_A1}]}]
    })
    .to_string();

    let customer = build_order_request(&payload).unwrap().customer.unwrap();
    assert_eq!(customer.email, "");
    assert_eq!(customer.first_name.as_deref(), Some("Ada"));
    assert_eq!(customer.last_name.as_deref(), Some(""));
}

#[test]
fn test_structural_errors() {
    let cases = [
        "not json",
        r#"{"id":"X"}"#,
        r#"{"id":"X","purchase_units":[]}"#,
        r#"{"id":"X","purchase_units":[{"reference_id":"r"}]}"#,
        r#"{"id":"X","purchase_units":[{"reference_id":"r","items":[]}]}"#,
    ];
    for payload in cases {
        let err = build_order_request(payload).unwrap_err();
        assert!(
            matches!(err, AppError::MalformedUpstreamPayload(_)),
            "{} should be malformed, got {:?}",
            payload,
            err
        );
        assert!(err.is_structural());
    }
}

#[test]
fn test_order_request_json_round_trip() {
    let request = build_order_request(&paypal_capture(&[SKU_B1, SKU_A1, SKU_A2])).unwrap();

    let json = serde_json::to_string(&request).unwrap();
    let parsed: OrderCreationRequest = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed, request);
    assert_eq!(parsed.items[0].product_code, "PROD-B");
    assert_eq!(
        parsed.items[1].licenses,
        vec![
            LicenseKey { key: "KEY-AAAA-1111".into() },
            LicenseKey { key: "KEY-AAAA-2222".into() },
        ]
    );
}

#[tokio::test]
async fn test_process_order_posts_signed_body() {
    let transport = MockTransport::always(201, "{}");
    let webhook = test_webhook(transport);

    let envelope = webhook.process_paypal_order(&paypal_capture(&[SKU_A1])).await;

    assert!(envelope.success);
    assert_eq!(envelope.message, "License keys successfuly activated.");

    let calls = webhook.transport().calls();
    assert_eq!(calls.len(), 1);
    let call = &calls[0];
    assert_eq!(call.method, HttpMethod::Post);
    assert_eq!(call.url, "https://licensespring.test/api/v3/webhook/order");
    assert_eq!(call.header("Content-Type"), Some("application/json"));

    let date = call.header("Date").unwrap();
    let authorization = call.header("Authorization").unwrap();
    let signature = webhook.signer().sign(date).unwrap();
    assert!(authorization.contains(&format!("signature=\"{}\"", signature)));
    assert!(authorization.ends_with(&format!("apiKey=\"{}\"", TEST_API_KEY)));
    assert!(date.ends_with(" GMT"));

    let Payload::Body(body) = &call.payload else {
        panic!("order must be sent as a body");
    };
    let sent: OrderCreationRequest = serde_json::from_str(body).unwrap();
    assert_eq!(sent.id, "ref-42_paypal_5O190127TN364715T");
    assert_eq!(sent.items[0].licenses[0].key, "KEY-AAAA-1111");
}

#[tokio::test]
async fn test_malformed_capture_makes_no_backend_call() {
    let webhook = test_webhook(MockTransport::always(200, "{}"));

    let envelope = webhook
        .process_paypal_order(r#"{"id":"X","purchase_units":[]}"#)
        .await;

    assert!(!envelope.success);
    assert_eq!(
        envelope.message,
        "There was a problem activating your license keys. Please contact LicenseSpring."
    );
    assert_eq!(webhook.transport().call_count(), 0);
}

#[tokio::test]
async fn test_missing_items_makes_no_backend_call() {
    let webhook = test_webhook(MockTransport::always(200, "{}"));

    let err = webhook
        .generate_order_from_paypal(r#"{"purchase_units":[{"reference_id":"r"}]}"#)
        .unwrap_err();

    assert!(matches!(err, AppError::MalformedUpstreamPayload(_)));
    assert_eq!(webhook.transport().call_count(), 0);
}

#[tokio::test]
async fn test_rejected_order_surfaces_backend_error() {
    let transport = MockTransport::always(
        400,
        r#"{"errors":[{"message":"License key already exists","value":"KEY-AAAA-1111"}]}"#,
    );
    let webhook = test_webhook(transport);

    let envelope = webhook.process_paypal_order(&paypal_capture(&[SKU_A1])).await;

    assert!(!envelope.success);
    assert_eq!(envelope.message, "License key already exists: KEY-AAAA-1111");
    assert_eq!(webhook.transport().call_count(), 10);
}
