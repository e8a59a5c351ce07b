use serde_json::Value;

use crate::backoff::{BackoffPolicy, deliver};
use crate::error::{AppError, Result};
use crate::models::{LicenseRequestDocument, LicenseResponseDocument, ProductRequest};
use crate::signing::SignedHeaders;
use crate::transport::{HttpRequest, HttpTransport};

const MISSING_PRODUCT_FIELDS: &str = "Product must have quantity and code values.";

/// Parse a front-end license request, rejecting it before any backend call if
/// `products` or a product's `code`/`quantity` is missing.
pub fn parse_license_request(payload: &str) -> Result<LicenseRequestDocument> {
    let value: Value = serde_json::from_str(payload)
        .map_err(|e| AppError::MalformedUpstreamPayload(format!("Invalid JSON format: {}", e)))?;

    let Value::Object(document) = value else {
        return Err(AppError::MissingRequiredField(
            "Data is missing 'products' object.".into(),
        ));
    };

    let entries = document
        .get("products")
        .ok_or_else(|| AppError::MissingRequiredField("Data is missing 'products' object.".into()))?
        .as_array()
        .ok_or_else(|| AppError::MissingRequiredField("'products' must be a list.".into()))?;

    let mut products = Vec::with_capacity(entries.len());
    for entry in entries {
        let complete = entry.get("code").is_some() && entry.get("quantity").is_some();
        if !complete {
            return Err(AppError::MissingRequiredField(MISSING_PRODUCT_FIELDS.into()));
        }
        let product: ProductRequest = serde_json::from_value(entry.clone()).map_err(|e| {
            AppError::MalformedUpstreamPayload(format!(
                "Product code and quantity must be strings or numbers: {}",
                e
            ))
        })?;
        products.push(product);
    }

    Ok(LicenseRequestDocument::new(document, products))
}

/// Fetch licenses for every product in document order. The first failure
/// aborts the whole request and the partially resolved document is dropped.
pub async fn resolve_licenses<T>(
    transport: &T,
    policy: &BackoffPolicy,
    license_url: &str,
    mut document: LicenseRequestDocument,
    headers: &SignedHeaders,
) -> Result<LicenseResponseDocument>
where
    T: HttpTransport + ?Sized,
{
    for index in 0..document.products.len() {
        let product = &document.products[index];
        let request =
            HttpRequest::get(license_url, product.license_query()).with_headers(headers.to_pairs());

        let result = deliver(transport, policy, &request).await;
        if !result.success {
            tracing::error!(
                "License fetch failed for product={} quantity={}",
                product.code,
                product.quantity
            );
            return Err(AppError::UpstreamLicenseFetchFailed(
                result.message_or_empty().to_string(),
            ));
        }

        let body = result.message.unwrap_or_default();
        let licenses = serde_json::from_str(&body).unwrap_or_else(|_| {
            tracing::warn!("License response for product={} is not JSON", product.code);
            Value::String(body)
        });
        document.set_licenses(index, licenses);
    }

    Ok(LicenseResponseDocument(document.into_document()))
}
