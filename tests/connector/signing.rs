//! Request signature tests

use chrono::{TimeZone, Utc};
use licensespring_webhook::signing::Signer;

use crate::common::*;

const DATE: &str = "Sat, 3 Oct 2026 09:05:07 GMT";

#[test]
fn test_sign_known_vector() {
    let signer = Signer::new(TEST_API_KEY, "test-secret");
    assert_eq!(
        signer.sign(DATE).unwrap(),
        "R37GKeGDynlerKhJiaEtzM4KS0JwyU0Jx6Lb7PYjAhU="
    );
}

#[test]
fn test_sign_is_deterministic() {
    let signer = Signer::new(TEST_API_KEY, TEST_SHARED_KEY);
    assert_eq!(signer.sign(DATE).unwrap(), signer.sign(DATE).unwrap());
}

#[test]
fn test_sign_depends_on_secret_key() {
    let signer = Signer::new(TEST_API_KEY, "other-secret");
    assert_eq!(
        signer.sign(DATE).unwrap(),
        "36jQoN3N+qvvcjKQHiIBlVvw53T8H3pPI33UGCG77Ec="
    );
    assert_ne!(
        signer.sign(DATE).unwrap(),
        Signer::new(TEST_API_KEY, TEST_SHARED_KEY).sign(DATE).unwrap()
    );
}

#[test]
fn test_sign_depends_on_date() {
    let signer = Signer::new(TEST_API_KEY, "test-secret");
    assert_eq!(
        signer.sign("Sun, 4 Oct 2026 09:05:07 GMT").unwrap(),
        "dxwYQ4L/VdFj8gfYtYD3M9t97kFwt4YBArNAnDHrzdg="
    );
}

#[test]
fn test_api_key_does_not_affect_signature() {
    let a = Signer::new("key-one", TEST_SHARED_KEY);
    let b = Signer::new("key-two", TEST_SHARED_KEY);
    assert_eq!(a.sign(DATE).unwrap(), b.sign(DATE).unwrap());
}

#[test]
fn test_verify_accepts_own_signature_only() {
    let signer = Signer::new(TEST_API_KEY, TEST_SHARED_KEY);
    let signature = signer.sign(DATE).unwrap();

    assert!(signer.verify(DATE, &signature));
    assert!(!signer.verify("Sun, 4 Oct 2026 09:05:07 GMT", &signature));
    assert!(!Signer::new(TEST_API_KEY, "other-secret").verify(DATE, &signature));
    assert!(!signer.verify(DATE, "not-base64!"));
    assert!(!signer.verify(DATE, ""));
}

#[test]
fn test_empty_secret_still_signs() {
    let signer = Signer::new(TEST_API_KEY, "");
    let signature = signer.sign(DATE).unwrap();

    assert!(signer.verify(DATE, &signature));
    assert_ne!(signature, Signer::new(TEST_API_KEY, TEST_SHARED_KEY).sign(DATE).unwrap());
}

#[test]
fn test_authorization_header_format() {
    let signer = Signer::new("my-api-key", "test-secret");
    assert_eq!(
        signer.authorization_header(DATE).unwrap(),
        "algorithm=\"hmac-sha256\",headers=\"date\",\
         signature=\"R37GKeGDynlerKhJiaEtzM4KS0JwyU0Jx6Lb7PYjAhU=\",apiKey=\"my-api-key\""
    );
}

#[test]
fn test_signed_headers_share_date_stamp() {
    let signer = Signer::new("my-api-key", "test-secret");
    let at = Utc.with_ymd_and_hms(2026, 10, 3, 9, 5, 7).unwrap();
    let headers = signer.signed_headers_at(at).unwrap();

    assert_eq!(headers.date, DATE);
    assert!(headers.authorization.contains(&signer.sign(&headers.date).unwrap()));

    let pairs = headers.to_pairs();
    assert!(pairs.contains(&("Date".to_string(), DATE.to_string())));
    assert!(pairs.contains(&("Content-Type".to_string(), "application/json".to_string())));
}
