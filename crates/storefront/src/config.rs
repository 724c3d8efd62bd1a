//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPFRONT_API_URL` - Base URL of the store's REST API
//!
//! ## Optional
//! - `SHOPFRONT_API_TOKEN` - Bearer token for the API (validated, never logged)
//! - `SHOPFRONT_STOREFRONT_URL` - Public storefront URL for shareable links (default: http://localhost:3000)
//! - `SHOPFRONT_DATA_DIR` - Directory for the device-local store (default: .shopfront)
//! - `SHOPFRONT_FILTER_DEBOUNCE_MS` - Filter debounce window (default: 300)
//! - `SHOPFRONT_PAGE_SIZE` - Products per listing page, 1-100 (default: 12)
//! - `SHOPFRONT_REQUEST_TIMEOUT_SECS` - HTTP request timeout (default: 10)
//! - `SHOPFRONT_CACHE_TTL_SECS` - Product cache lifetime (default: 60)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.0;
const MAX_PAGE_SIZE: u32 = 100;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Remote API settings
    pub api: ApiConfig,
    /// Public storefront URL; listing links are built under it
    pub storefront_url: Url,
    /// Directory holding the device-local store
    pub data_dir: PathBuf,
    /// Debounce window for filter edits
    pub filter_debounce: Duration,
    /// Products per listing page
    pub page_size: u32,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Remote API configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL; endpoint paths are appended to it
    pub base_url: Url,
    /// Bearer token sent with every request
    pub token: Option<SecretString>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Lifetime of cached product responses
    pub cache_ttl: Duration,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

impl ApiConfig {
    /// Settings for `base_url` with default timeout and cache lifetime and no token.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            token: None,
            timeout: Duration::from_secs(10),
            cache_ttl: Duration::from_secs(60),
        }
    }
}

impl StorefrontConfig {
    /// URL of the product listing page, without a query.
    #[must_use]
    pub fn listing_url(&self) -> Url {
        let base = with_trailing_slash(self.storefront_url.clone());
        base.join("products").unwrap_or(base)
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid, or
    /// if the API token looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process environment.
    ///
    /// # Errors
    ///
    /// Same as [`Self::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(&lookup);

        let base_url = env.required("SHOPFRONT_API_URL")?;
        let base_url = Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("SHOPFRONT_API_URL".to_string(), e.to_string())
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                "SHOPFRONT_API_URL".to_string(),
                format!("unsupported scheme '{}'", base_url.scheme()),
            ));
        }

        let storefront_url = env.or_default("SHOPFRONT_STOREFRONT_URL", "http://localhost:3000");
        let storefront_url = Url::parse(&storefront_url)
            .map(with_trailing_slash)
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SHOPFRONT_STOREFRONT_URL".to_string(), e.to_string())
            })?;

        let token = env
            .optional("SHOPFRONT_API_TOKEN")
            .map(|value| {
                validate_secret_strength(&value, "SHOPFRONT_API_TOKEN")?;
                Ok::<_, ConfigError>(SecretString::from(value))
            })
            .transpose()?;

        let api = ApiConfig {
            base_url,
            token,
            timeout: Duration::from_secs(env.parsed("SHOPFRONT_REQUEST_TIMEOUT_SECS", 10)?),
            cache_ttl: Duration::from_secs(env.parsed("SHOPFRONT_CACHE_TTL_SECS", 60)?),
        };

        let page_size: u32 = env.parsed("SHOPFRONT_PAGE_SIZE", 12)?;
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(ConfigError::InvalidEnvVar(
                "SHOPFRONT_PAGE_SIZE".to_string(),
                format!("must be between 1 and {MAX_PAGE_SIZE} (got {page_size})"),
            ));
        }

        Ok(Self {
            api,
            storefront_url,
            data_dir: PathBuf::from(env.or_default("SHOPFRONT_DATA_DIR", ".shopfront")),
            filter_debounce: Duration::from_millis(env.parsed("SHOPFRONT_FILTER_DEBOUNCE_MS", 300)?),
            page_size,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<'a, F>(&'a F);

impl<F> Env<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get a required variable; empty counts as missing.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get an optional variable; empty counts as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parsed<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.optional(key).map_or(Ok(default), |value| {
            value
                .parse()
                .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a token is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ),
        ));
    }

    Ok(())
}

/// Expose the token for an outgoing request header.
/// Relative joins replace the last path segment unless the path ends in `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.cannot_be_a_base() && !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

pub(crate) fn bearer(token: &SecretString) -> &str {
    token.expose_secret()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TOKEN: &str = "tk_9fQ2x7LmZ4pR8vB1nW6c";

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("SHOPFRONT_API_URL", "https://api.shop.test/v1")]).unwrap();

        assert_eq!(config.api.base_url.as_str(), "https://api.shop.test/v1");
        assert!(config.api.token.is_none());
        assert_eq!(config.api.timeout, Duration::from_secs(10));
        assert_eq!(config.api.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.storefront_url.as_str(), "http://localhost:3000/");
        assert_eq!(config.data_dir, PathBuf::from(".shopfront"));
        assert_eq!(config.filter_debounce, Duration::from_millis(300));
        assert_eq!(config.page_size, 12);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_listing_url_keeps_storefront_path() {
        let config = load(&[
            ("SHOPFRONT_API_URL", "https://api.shop.test/v1"),
            ("SHOPFRONT_STOREFRONT_URL", "https://shop.test/en-gb"),
        ])
        .unwrap();

        assert_eq!(config.storefront_url.as_str(), "https://shop.test/en-gb/");
        assert_eq!(config.listing_url().as_str(), "https://shop.test/en-gb/products");

        let mut built = config.clone();
        built.storefront_url = Url::parse("https://shop.test/fr").unwrap();
        assert_eq!(built.listing_url().as_str(), "https://shop.test/fr/products");
    }

    #[test]
    fn test_missing_api_url() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref key) if key == "SHOPFRONT_API_URL"));

        let err = load(&[("SHOPFRONT_API_URL", "  ")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(_)));
    }

    #[test]
    fn test_invalid_values() {
        let err = load(&[("SHOPFRONT_API_URL", "not a url")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));

        let err = load(&[("SHOPFRONT_API_URL", "ftp://shop.test")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));

        let err = load(&[
            ("SHOPFRONT_API_URL", "https://shop.test"),
            ("SHOPFRONT_FILTER_DEBOUNCE_MS", "soon"),
        ])
        .unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "SHOPFRONT_FILTER_DEBOUNCE_MS")
        );
    }

    #[test]
    fn test_page_size_bounds() {
        for bad in ["0", "101"] {
            let err = load(&[
                ("SHOPFRONT_API_URL", "https://shop.test"),
                ("SHOPFRONT_PAGE_SIZE", bad),
            ])
            .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
        }

        let config = load(&[
            ("SHOPFRONT_API_URL", "https://shop.test"),
            ("SHOPFRONT_PAGE_SIZE", "100"),
        ])
        .unwrap();
        assert_eq!(config.page_size, 100);
    }

    #[test]
    fn test_placeholder_token_rejected() {
        let err = load(&[
            ("SHOPFRONT_API_URL", "https://shop.test"),
            ("SHOPFRONT_API_TOKEN", "your-api-token-here"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));

        let err = load(&[
            ("SHOPFRONT_API_URL", "https://shop.test"),
            ("SHOPFRONT_API_TOKEN", "aaaaaaaaaaaaaaaa"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_token_is_redacted_in_debug() {
        let config = load(&[
            ("SHOPFRONT_API_URL", "https://shop.test"),
            ("SHOPFRONT_API_TOKEN", TOKEN),
        ])
        .unwrap();

        assert_eq!(bearer(config.api.token.as_ref().unwrap()), TOKEN);
        let debug = format!("{config:?}");
        assert!(!debug.contains(TOKEN));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_shannon_entropy() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("ab") - 1.0).abs() < 0.01);
        assert!(shannon_entropy(TOKEN) > MIN_ENTROPY_BITS_PER_CHAR);
    }
}
