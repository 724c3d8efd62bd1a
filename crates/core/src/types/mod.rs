//! Core types for Shopfront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod account;
pub mod cart;
pub mod catalog;
pub mod filter;
pub mod id;
pub mod order;
pub mod price;
pub mod shipping;
pub mod status;
pub mod wishlist;

pub use account::{Branch, User, UserUpdate};
pub use cart::{CartLineItem, CartLines, LineChange};
pub use catalog::{NewProduct, Product, ProductUpdate};
pub use filter::{FilterChange, FilterState, SortDirection, SortField};
pub use id::*;
pub use order::{CheckoutError, NewOrder, Order, OrderLine};
pub use price::{Price, PriceError};
pub use shipping::{ShippingDetails, ShippingError, ShippingField};
pub use status::*;
pub use wishlist::{WishlistEntries, WishlistItem};
