//! Client for the store's REST API.
//!
//! # Architecture
//!
//! - `reqwest` for HTTP, one client per session
//! - Every response is a `{ data, meta? }` envelope
//! - Product reads are cached via `moka` (TTL from config); any product
//!   mutation made through the client drops the whole product cache
//! - Each request carries a fresh `x-request-id` for log correlation
//! - No automatic retry; callers decide what to offer the user
//!
//! # Example
//!
//! ```rust,ignore
//! use shopfront_storefront::api::ApiClient;
//!
//! let client = ApiClient::new(&config.api)?;
//! let page = client.list_products(&FilterState::default(), 12).await?;
//! let product = client.get_product(&page.items[0].id).await?;
//! ```

mod orders;
mod products;
mod types;
mod users;

pub use types::{ApiResponse, Page, PageMeta};

use std::sync::Arc;

use moka::future::Cache;
use reqwest::{RequestBuilder, StatusCode};
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use shopfront_core::Product;
use thiserror::Error;
use url::Url;
use uuid::Uuid;

use crate::config::{ApiConfig, bearer};

/// Header carrying the per-request correlation ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const CACHE_CAPACITY: u64 = 500;

/// Errors that can occur when talking to the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// An endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Whether retrying the same request later might succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Http(_) | Self::RateLimited(_) => true,
            Self::Status { status, .. } => *status >= 500,
            Self::NotFound(_) | Self::Parse(_) | Self::InvalidUrl(_) => false,
        }
    }
}

/// Cached product responses.
#[derive(Debug, Clone)]
enum CacheValue {
    Product(Box<Product>),
    Products(Page<Product>),
}

/// Client for the store's REST API.
///
/// Cheap to clone; clones share the HTTP connection pool and the cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    token: Option<SecretString>,
    cache: Cache<String, CacheValue>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("cached_entries", &self.inner.cache.entry_count())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for the configured API.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the HTTP client cannot be built, or
    /// [`ApiError::InvalidUrl`] if the base URL cannot carry a path.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        if config.base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(config.base_url.to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("shopfront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
                token: config.token.clone(),
                cache,
            }),
        })
    }

    /// Drop every cached product response.
    pub fn invalidate_products(&self) {
        tracing::debug!("product cache invalidated");
        self.inner.cache.invalidate_all();
    }

    /// Build `<base>/<segments...>?<query>`. Segments are percent-encoded.
    fn endpoint(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        url.set_query(None);
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    /// Send a request and return the body of a successful response.
    async fn send(&self, request: RequestBuilder, resource: &str) -> Result<String, ApiError> {
        let request_id = Uuid::new_v4().to_string();
        let mut request = request.header(REQUEST_ID_HEADER, &request_id);
        if let Some(token) = &self.inner.token {
            request = request.bearer_auth(bearer(token));
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok())
                .unwrap_or(1);
            tracing::warn!(%request_id, retry_after, "rate limited");
            return Err(ApiError::RateLimited(retry_after));
        }

        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(resource.to_string()));
        }

        if !status.is_success() {
            let message = error_message(status, &body);
            tracing::warn!(
                %request_id,
                status = status.as_u16(),
                %message,
                "API returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        tracing::debug!(%request_id, status = status.as_u16(), "API request complete");
        Ok(body)
    }

    /// Send a request and decode the `data` envelope.
    async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        resource: &str,
    ) -> Result<ApiResponse<T>, ApiError> {
        let body = self.send(request, resource).await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse API response"
            );
            ApiError::Parse(e)
        })
    }
}

/// Prefer the body's `message` field, then the raw body, then the reason phrase.
fn error_message(status: StatusCode, body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        message: String,
    }

    if let Ok(ErrorBody { message }) = serde_json::from_str(body)
        && !message.trim().is_empty()
    {
        return message;
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status.canonical_reason().unwrap_or("request failed").to_string()
    } else {
        trimmed.chars().take(200).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(&ApiConfig::new(Url::parse(base).unwrap())).unwrap()
    }

    #[test]
    fn test_endpoint_appends_segments() {
        let api = client("https://api.shop.test/v1/");
        let url = api.endpoint(&["products", "p 1"], &[]).unwrap();
        assert_eq!(url.as_str(), "https://api.shop.test/v1/products/p%201");

        let api = client("https://api.shop.test");
        let url = api
            .endpoint(&["orders"], &[("page", "2".to_string()), ("limit", "10".to_string())])
            .unwrap();
        assert_eq!(url.as_str(), "https://api.shop.test/orders?page=2&limit=10");
    }

    #[test]
    fn test_error_message_sources() {
        assert_eq!(
            error_message(StatusCode::UNPROCESSABLE_ENTITY, r#"{"message":"Out of stock"}"#),
            "Out of stock"
        );
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, "upstream down"), "upstream down");
        assert_eq!(error_message(StatusCode::INTERNAL_SERVER_ERROR, ""), "Internal Server Error");
    }

    #[test]
    fn test_transient_classification() {
        assert!(ApiError::RateLimited(2).is_transient());
        assert!(
            ApiError::Status {
                status: 503,
                message: String::new()
            }
            .is_transient()
        );
        assert!(
            !ApiError::Status {
                status: 400,
                message: String::new()
            }
            .is_transient()
        );
        assert!(!ApiError::NotFound("p1".to_string()).is_transient());
    }
}
