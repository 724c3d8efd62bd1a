//! The storefront session: everything one running front end owns.
//!
//! Replaces ambient globals with one explicit container. The session owns
//! the local store, the notifier, the cart and wishlist aggregates, and the
//! API client with its product cache. Front ends pass it (or parts of it)
//! to whatever needs them and close it on exit.

use std::sync::Arc;

use shopfront_core::{LineChange, NewOrder, Order, ProductId, ShippingDetails, WishlistItem};
use tokio::sync::broadcast;
use tracing::instrument;

use crate::api::ApiClient;
use crate::cart::Cart;
use crate::config::StorefrontConfig;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters::{FilterSynchronizer, Navigator};
use crate::notify::{Notifier, StoreEvent, Topic};
use crate::store::{FileStore, LocalStore, MemoryStore};
use crate::wishlist::{Wishlist, WishlistAdd};

/// One storefront session.
pub struct StorefrontSession {
    config: StorefrontConfig,
    notifier: Notifier,
    cart: Cart,
    wishlist: Wishlist,
    api: ApiClient,
    persistent: bool,
}

impl std::fmt::Debug for StorefrontSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontSession")
            .field("cart", &self.cart)
            .field("wishlist", &self.wishlist)
            .field("api", &self.api)
            .field("persistent", &self.persistent)
            .finish_non_exhaustive()
    }
}

impl StorefrontSession {
    /// Open a session backed by files in `config.data_dir`.
    ///
    /// If the directory cannot be used the session falls back to memory and
    /// publishes a warning on `notifier`; subscribe before opening to see it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Api`] if the API client cannot be built.
    pub fn open(config: StorefrontConfig, notifier: Notifier) -> Result<Self> {
        let (store, persistent): (Arc<dyn LocalStore>, bool) =
            match FileStore::open(&config.data_dir) {
                Ok(store) => {
                    tracing::info!(dir = %store.dir().display(), "local store opened");
                    (Arc::new(store), true)
                }
                Err(e) => {
                    tracing::warn!(
                        dir = %config.data_dir.display(),
                        error = %e,
                        "local store unavailable, keeping state in memory"
                    );
                    notifier.warning(
                        "Your cart and wishlist can't be saved on this device; \
                         changes will last until you close the app.",
                    );
                    (Arc::new(MemoryStore::new()), false)
                }
            };

        let mut session = Self::with_store(config, store, notifier)?;
        session.persistent = persistent;
        Ok(session)
    }

    /// Open a session on an explicit store.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Api`] if the API client cannot be built.
    pub fn with_store(
        config: StorefrontConfig,
        store: Arc<dyn LocalStore>,
        notifier: Notifier,
    ) -> Result<Self> {
        let api = ApiClient::new(&config.api)?;
        let cart = Cart::load(Arc::clone(&store), notifier.clone());
        let wishlist = Wishlist::load(store, notifier.clone());

        Ok(Self {
            config,
            notifier,
            cart,
            wishlist,
            api,
            persistent: true,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    pub const fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    #[must_use]
    pub const fn wishlist(&self) -> &Wishlist {
        &self.wishlist
    }

    pub const fn wishlist_mut(&mut self) -> &mut Wishlist {
        &mut self.wishlist
    }

    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub const fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Events published by the session's aggregates.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.notifier.subscribe()
    }

    /// Whether state survives the session (false after a fallback to memory).
    #[must_use]
    pub const fn is_persistent(&self) -> bool {
        self.persistent
    }

    /// Mount a filter synchronizer for a listing at `query`, using the
    /// configured debounce window.
    #[must_use]
    pub fn mount_filters(&self, query: &str, navigator: Arc<dyn Navigator>) -> FilterSynchronizer {
        FilterSynchronizer::mount(query, navigator, self.config.filter_debounce)
    }

    /// Fetch a product and add `quantity` units of it to the cart.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Api`] if the product cannot be fetched and
    /// [`AppError::BadRequest`] if it is sold out. An error notice is
    /// published in both cases.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn add_product_to_cart(&mut self, id: &ProductId, quantity: u32) -> Result<LineChange> {
        let product = match self.api.get_product(id).await {
            Ok(product) => product,
            Err(e) => return Err(self.fail(e)),
        };
        if product.is_sold_out() {
            return Err(self.fail(AppError::BadRequest(format!("{} is sold out", product.name))));
        }
        Ok(self.cart.add_item(product.to_cart_line(quantity)))
    }

    /// Fetch a product and save it to the wishlist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Api`] if the product cannot be fetched; an error
    /// notice is published.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn add_product_to_wishlist(&mut self, id: &ProductId) -> Result<WishlistAdd> {
        let product = match self.api.get_product(id).await {
            Ok(product) => product,
            Err(e) => return Err(self.fail(e)),
        };
        Ok(self
            .wishlist
            .add_item(WishlistItem::from_product(&product, chrono::Utc::now())))
    }

    /// Move a saved product into the cart.
    pub fn move_to_cart(&mut self, id: &ProductId) -> bool {
        self.wishlist.move_to_cart(id, &mut self.cart)
    }

    /// Submit the cart as an order.
    ///
    /// The cart is cleared only once the API has accepted the order; on any
    /// failure it is left exactly as it was and an error notice is published.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Checkout`] for an empty cart or invalid shipping
    /// details, and [`AppError::Api`] if the order is rejected or the API is
    /// unreachable.
    #[instrument(skip(self, shipping))]
    pub async fn checkout(&mut self, shipping: ShippingDetails) -> Result<Order> {
        let order = match NewOrder::from_cart(self.cart.lines(), shipping) {
            Ok(order) => order,
            Err(e) => return Err(self.fail(e)),
        };

        let lines = order.items.len().to_string();
        let total = order.total_price.to_string();
        add_breadcrumb(
            "checkout",
            "Submitting order",
            Some(&[("lines", lines.as_str()), ("total", total.as_str())]),
        );

        match self.api.create_order(&order).await {
            Ok(created) => {
                tracing::info!(order_id = %created.id, total = %created.total_price, "order placed");
                add_breadcrumb(
                    "checkout",
                    "Order placed",
                    Some(&[("order_id", created.id.as_str())]),
                );
                self.cart.clear();
                self.notifier
                    .success(format!("Order {} placed. Thank you!", created.id));
                Ok(created)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Tear the session down.
    ///
    /// Cart and wishlist are already persisted; this drops cached API
    /// responses and tells subscribers the product data is gone.
    pub fn close(self) {
        self.api.invalidate_products();
        self.notifier.invalidate(Topic::Products);
        tracing::info!(
            cart_items = self.cart.total_items(),
            wishlist_items = self.wishlist.total_items(),
            "session closed"
        );
    }

    fn fail(&self, err: impl Into<AppError>) -> AppError {
        let err = err.into();
        err.report();
        self.notifier.error(err.user_message());
        err
    }
}
