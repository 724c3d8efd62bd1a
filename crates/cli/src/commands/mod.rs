//! Subcommand implementations.
//!
//! Each command works on an open [`shopfront_storefront::StorefrontSession`]
//! and prints through [`crate::output`]. Notices published while a command
//! runs are printed by the caller once it returns.

pub mod admin;
pub mod browse;
pub mod cart;
pub mod checkout;
pub mod products;
pub mod wishlist;

use shopfront_storefront::{ApiError, AppError};
use thiserror::Error;

/// Errors that can end a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    App(#[from] AppError),

    /// Reading interactive input failed.
    #[error("Failed to read input: {0}")]
    Input(#[from] std::io::Error),
}

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        Self::App(AppError::Api(err))
    }
}
