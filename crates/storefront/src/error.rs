//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type for everything the storefront surfaces
//! to a front end. Expected conditions (storage off, validation, network) are
//! logged and turned into user messages; unexpected ones (corrupt data,
//! internal failures) are also captured to Sentry.

use shopfront_core::CheckoutError;
use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::store::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Local store operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Remote API operation failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Checkout input was rejected before reaching the API.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// A stored blob could not be decoded.
    #[error("Corrupt data under '{key}': {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad input from the user.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this error indicates a bug or corruption rather than an
    /// expected runtime condition.
    #[must_use]
    pub const fn is_unexpected(&self) -> bool {
        matches!(
            self,
            Self::Corrupt { .. } | Self::Internal(_) | Self::Api(ApiError::Parse(_))
        )
    }

    /// Log the error and capture unexpected ones to Sentry.
    pub fn report(&self) {
        if self.is_unexpected() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Unexpected error"
            );
        } else {
            tracing::warn!(error = %self, "Operation failed");
        }
    }

    /// Message safe to show the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Storage(_) => {
                "Your cart can't be saved on this device right now. Changes will last until you close the app."
                    .to_string()
            }
            Self::Api(ApiError::NotFound(what)) | Self::NotFound(what) => {
                format!("{what} could not be found")
            }
            Self::Api(ApiError::RateLimited(secs)) => {
                format!("Too many requests, please retry in {secs} seconds")
            }
            Self::Api(ApiError::Status { message, .. }) if !message.is_empty() => message.clone(),
            Self::Api(_) => "The store is unreachable right now. Please retry.".to_string(),
            Self::Checkout(err) => err.to_string(),
            Self::Config(err) => err.to_string(),
            Self::BadRequest(msg) => msg.clone(),
            Self::Corrupt { .. } | Self::Internal(_) => "Something went wrong".to_string(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added item", Some(&[("product_id", "p1")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product-123".to_string());
        assert_eq!(err.to_string(), "Not found: product-123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_unexpected_classification() {
        let corrupt = AppError::Corrupt {
            key: "cart".to_string(),
            source: serde_json::from_str::<u8>("x").unwrap_err(),
        };
        assert!(corrupt.is_unexpected());
        assert!(AppError::Internal("boom".to_string()).is_unexpected());

        let storage = AppError::Storage(StorageError::Unavailable("off".to_string()));
        assert!(!storage.is_unexpected());
        assert!(!AppError::Api(ApiError::RateLimited(3)).is_unexpected());
    }

    #[test]
    fn test_user_messages_hide_internals() {
        let corrupt = AppError::Corrupt {
            key: "cart".to_string(),
            source: serde_json::from_str::<u8>("x").unwrap_err(),
        };
        assert_eq!(corrupt.user_message(), "Something went wrong");

        let status = AppError::Api(ApiError::Status {
            status: 422,
            message: "Out of stock".to_string(),
        });
        assert_eq!(status.user_message(), "Out of stock");

        let empty = AppError::Checkout(CheckoutError::EmptyCart);
        assert_eq!(empty.user_message(), "cart is empty");
    }

    #[test]
    fn test_report_does_not_panic_without_sentry() {
        AppError::Internal("no client bound".to_string()).report();
        AppError::NotFound("p1".to_string()).report();
    }
}
