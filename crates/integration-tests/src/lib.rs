//! Integration tests for the Shopfront client.
//!
//! Every test stands up a `wiremock` server in place of the store API, so
//! no real network traffic is made.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `api_client` - Envelope decoding, query parameters, headers, error mapping
//! - `api_cache` - Product cache hits and invalidation
//! - `session` - Cart, wishlist, and checkout flows through a session

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::time::Duration;

use serde_json::{Value, json};
use shopfront_core::ShippingDetails;
use shopfront_storefront::{ApiConfig, StorefrontConfig};
use url::Url;

/// Session config pointing at a mock API.
///
/// # Panics
///
/// Panics if `api_base` is not a valid URL.
#[must_use]
pub fn test_config(api_base: &str, data_dir: PathBuf) -> StorefrontConfig {
    let mut api = ApiConfig::new(Url::parse(api_base).expect("mock server URL"));
    api.timeout = Duration::from_secs(5);

    StorefrontConfig {
        api,
        storefront_url: Url::parse("https://shop.test").expect("static URL"),
        data_dir,
        filter_debounce: Duration::from_millis(300),
        page_size: 12,
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// A product as the API returns it.
#[must_use]
pub fn product_json(id: &str, name: &str, price: &str, stock: Option<u32>) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": format!("{name}, freshly stocked"),
        "price": price,
        "category": "tea",
        "stock": stock,
        "image": format!("https://cdn.shop.test/{id}.jpg"),
        "rating": 4.5
    })
}

/// Wrap `data` in the response envelope.
#[must_use]
pub fn envelope(data: Value) -> Value {
    json!({ "data": data })
}

/// Wrap a list in the envelope with page metadata.
#[must_use]
pub fn paged(data: Value, page: u32, limit: u32, total: u64) -> Value {
    let total_pages = total.div_ceil(u64::from(limit.max(1)));
    json!({
        "data": data,
        "meta": {
            "total": total,
            "page": page,
            "limit": limit,
            "totalPages": total_pages
        }
    })
}

/// An order as the API returns it after creation.
#[must_use]
pub fn order_json(id: &str, lines: &Value, total: &str) -> Value {
    json!({
        "id": id,
        "items": lines,
        "totalPrice": total,
        "status": "pending",
        "createdAt": "2026-10-18T09:30:00Z"
    })
}

/// Valid shipping details.
#[must_use]
pub fn shipping() -> ShippingDetails {
    ShippingDetails {
        full_name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        phone: "+44 20 7946 0000".to_string(),
        address: "12 Analytical Row".to_string(),
        city: "London".to_string(),
        postal_code: "N1 9GU".to_string(),
        notes: None,
    }
}
