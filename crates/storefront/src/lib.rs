//! Shopfront storefront library.
//!
//! Client-side state for a shop front end: the device-local store, the cart
//! and wishlist with write-through persistence, URL-synchronized listing
//! filters, the REST API client, and the session that ties them together.
//! Front ends (the `shopfront` CLI, tests) drive everything through
//! [`StorefrontSession`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod config;
pub mod error;
pub mod filters;
pub mod lifecycle;
pub mod notify;
pub mod session;
pub mod store;
pub mod wishlist;

pub use api::{ApiClient, ApiError, Page, PageMeta};
pub use cart::Cart;
pub use config::{ApiConfig, ConfigError, StorefrontConfig};
pub use error::{AppError, Result};
pub use filters::{FilterSynchronizer, HistoryNavigator, Navigator, SyncPhase};
pub use lifecycle::{ScopeGuard, ViewScope};
pub use notify::{Notice, NoticeLevel, Notifier, StoreEvent, Topic};
pub use session::StorefrontSession;
pub use store::{FileStore, LocalStore, MemoryStore, StorageError};
pub use wishlist::{Wishlist, WishlistAdd};
