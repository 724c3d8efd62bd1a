//! Cart aggregate with write-through persistence.
//!
//! Wraps [`CartLines`] with the local store: every mutation that changes the
//! lines is written to the `cart` key before the call returns, and then
//! announced to subscribers as a notice plus a [`Topic::Cart`] invalidation.
//!
//! Storage failures never surface as errors. The in-memory lines stay the
//! record for the session and the user is warned through the notifier.

use std::sync::Arc;

use shopfront_core::{CartLineItem, CartLines, LineChange, Price, ProductId};
use tracing::instrument;

use crate::error::add_breadcrumb;
use crate::notify::{Notifier, Topic};
use crate::store::{LocalStore, WriteThrough, keys};

/// The shopping cart of the current session.
pub struct Cart {
    lines: CartLines,
    persistence: WriteThrough,
}

impl std::fmt::Debug for Cart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cart")
            .field("lines", &self.lines)
            .field("degraded", &self.persistence.is_degraded())
            .finish()
    }
}

impl Cart {
    /// Load the cart stored on this device.
    ///
    /// Missing, unreadable, or corrupt data yields an empty cart.
    pub fn load(store: Arc<dyn LocalStore>, notifier: Notifier) -> Self {
        let mut persistence = WriteThrough::new(keys::CART, "cart", store, notifier);
        let lines: CartLines = persistence.load();
        tracing::debug!(lines = lines.len(), "cart loaded");
        Self { lines, persistence }
    }

    /// Add an item, merging its quantity into an existing line for the same
    /// product.
    #[instrument(skip(self, item), fields(product_id = %item.product_id, quantity = item.quantity))]
    pub fn add_item(&mut self, item: CartLineItem) -> LineChange {
        let name = item.display_name.clone();
        let product_id = item.product_id.clone();

        let change = self.lines.add(item);
        if change.is_change() {
            self.commit();
            add_breadcrumb("cart", "Added item", Some(&[("product_id", product_id.as_str())]));
            self.persistence
                .notifier()
                .success(format!("Added {name} to your cart"));
        }
        change
    }

    /// Set a line's quantity; zero or less removes the line.
    #[instrument(skip(self))]
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) -> LineChange {
        let change = self.lines.update_quantity(product_id, quantity);
        if change.is_change() {
            self.commit();
            add_breadcrumb(
                "cart",
                "Updated quantity",
                Some(&[("product_id", product_id.as_str())]),
            );
        }
        change
    }

    /// Remove a line. Removing an absent product does nothing.
    #[instrument(skip(self))]
    pub fn remove_item(&mut self, product_id: &ProductId) -> LineChange {
        let change = self.lines.remove(product_id);
        if change.is_change() {
            self.commit();
            add_breadcrumb("cart", "Removed item", Some(&[("product_id", product_id.as_str())]));
            self.persistence.notifier().info("Item removed from your cart");
        }
        change
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.commit();
        add_breadcrumb("cart", "Cleared cart", None);
    }

    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        self.lines.items()
    }

    #[must_use]
    pub const fn lines(&self) -> &CartLines {
        &self.lines
    }

    #[must_use]
    pub fn total_price(&self) -> Price {
        self.lines.total_price()
    }

    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.lines.total_items()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether changes are currently only held in memory.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        self.persistence.is_degraded()
    }

    fn commit(&mut self) {
        self.persistence.save(&self.lines);
        self.persistence.notifier().invalidate(Topic::Cart);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::notify::{NoticeLevel, StoreEvent, drain};
    use crate::store::MemoryStore;

    fn line(id: &str, quantity: u32, cents: u64) -> CartLineItem {
        CartLineItem::new(id, quantity, Price::from_cents(cents), format!("Item {id}"), "")
    }

    fn cart_on(store: &Arc<MemoryStore>) -> (Cart, Notifier) {
        let notifier = Notifier::new();
        let store: Arc<dyn LocalStore> = store.clone();
        (Cart::load(store, notifier.clone()), notifier)
    }

    #[test]
    fn test_merge_example_totals() {
        let store = Arc::new(MemoryStore::new());
        let (mut cart, _) = cart_on(&store);

        cart.add_item(line("p1", 2, 10_000));
        cart.add_item(line("p1", 3, 10_000));

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 5);
        assert_eq!(cart.items()[0].unit_price, Price::from_cents(10_000));
        assert_eq!(cart.total_price(), Price::from_cents(50_000));
        assert_eq!(cart.total_items(), 5);
    }

    #[test]
    fn test_every_mutation_is_written_through() {
        let store = Arc::new(MemoryStore::new());
        let (mut cart, _) = cart_on(&store);

        cart.add_item(line("a", 1, 100));
        cart.add_item(line("b", 2, 250));
        cart.update_quantity(&ProductId::new("a"), 4);

        let (reloaded, _) = cart_on(&store);
        assert_eq!(reloaded.items(), cart.items());

        cart.update_quantity(&ProductId::new("a"), 0);
        let (reloaded, _) = cart_on(&store);
        assert_eq!(reloaded.items().len(), 1);
        assert_eq!(reloaded.items()[0].product_id.as_str(), "b");

        cart.clear();
        let (reloaded, _) = cart_on(&store);
        assert!(reloaded.is_empty());
    }

    #[test]
    fn test_add_publishes_success_and_invalidation() {
        let store = Arc::new(MemoryStore::new());
        let (mut cart, notifier) = cart_on(&store);
        let mut rx = notifier.subscribe();

        cart.add_item(line("p1", 1, 100));

        let events = drain(&mut rx);
        assert!(events.contains(&StoreEvent::Invalidated(Topic::Cart)));
        assert!(events.iter().any(|e| matches!(
            e,
            StoreEvent::Notice(n) if n.level == NoticeLevel::Success
        )));
    }

    #[test]
    fn test_remove_absent_is_silent_noop() {
        let store = Arc::new(MemoryStore::new());
        let (mut cart, notifier) = cart_on(&store);
        cart.add_item(line("p1", 1, 100));
        let mut rx = notifier.subscribe();

        assert_eq!(cart.remove_item(&ProductId::new("zzz")), LineChange::Unchanged);
        assert_eq!(cart.items().len(), 1);
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_storage_failure_degrades_to_memory_and_warns_once() {
        let store = Arc::new(MemoryStore::new());
        let (mut cart, notifier) = cart_on(&store);
        let mut rx = notifier.subscribe();

        store.set_available(false);
        cart.add_item(line("p1", 1, 100));
        cart.add_item(line("p2", 1, 100));

        assert!(cart.is_degraded());
        assert_eq!(cart.total_items(), 2);

        let warnings = drain(&mut rx)
            .into_iter()
            .filter(|e| matches!(e, StoreEvent::Notice(n) if n.level == NoticeLevel::Warning))
            .count();
        assert_eq!(warnings, 1);

        store.set_available(true);
        cart.add_item(line("p3", 1, 100));
        assert!(!cart.is_degraded());

        let (reloaded, _) = cart_on(&store);
        assert_eq!(reloaded.items().len(), 3);
    }

    #[test]
    fn test_quota_exceeded_keeps_in_memory_state() {
        let store = Arc::new(MemoryStore::with_quota(16));
        let (mut cart, _) = cart_on(&store);

        cart.add_item(line("p1", 1, 100));

        assert!(cart.is_degraded());
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_corrupt_blob_loads_empty() {
        let store = Arc::new(MemoryStore::new());
        store.set(keys::CART, b"{\"oops\":").unwrap();

        let (cart, _) = cart_on(&store);
        assert!(cart.is_empty());
        assert!(!cart.is_degraded());
    }

    #[test]
    fn test_stored_huge_price_totals_without_panicking() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(
                keys::CART,
                br#"[{"productId":"p1","quantity":3,"unitPrice":"40000000000000000000000000000","displayName":"Yacht","imageRef":""}]"#,
            )
            .unwrap();

        let (cart, _) = cart_on(&store);
        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_price(), Price::MAX);
    }

    #[test]
    fn test_disabled_store_loads_empty_and_degraded() {
        let store = Arc::new(MemoryStore::disabled());
        let (cart, _) = cart_on(&store);
        assert!(cart.is_empty());
        assert!(cart.is_degraded());
    }
}
