//! Shopfront Core - Shared domain types and client-side state logic.
//!
//! This crate provides the types used across all Shopfront components:
//! - `storefront` - Local store, cart/wishlist aggregates, filter sync, API client
//! - `cli` - Command-line storefront and back-office front end
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no filesystem
//! access, no HTTP clients. Persistence and notification are layered on top by
//! the storefront crate.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, cart lines, wishlist entries, filter
//!   state, catalog/order/account payloads

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
