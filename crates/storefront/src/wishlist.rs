//! Wishlist aggregate with write-through persistence.
//!
//! Same persistence contract as [`crate::cart::Cart`], under the `wishlist`
//! key. Entries are unique by product and keep insertion order.

use std::sync::Arc;

use chrono::Utc;
use shopfront_core::{ProductId, WishlistEntries, WishlistItem};
use tracing::instrument;

use crate::cart::Cart;
use crate::error::add_breadcrumb;
use crate::notify::{Notifier, Topic};
use crate::store::{LocalStore, WriteThrough, keys};

/// Result of [`Wishlist::add_item`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WishlistAdd {
    Added,
    /// The product was already saved; nothing changed.
    AlreadyPresent,
}

/// The wishlist of the current session.
pub struct Wishlist {
    entries: WishlistEntries,
    persistence: WriteThrough,
}

impl std::fmt::Debug for Wishlist {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wishlist")
            .field("entries", &self.entries)
            .field("degraded", &self.persistence.is_degraded())
            .finish()
    }
}

impl Wishlist {
    /// Load the wishlist stored on this device.
    pub fn load(store: Arc<dyn LocalStore>, notifier: Notifier) -> Self {
        let mut persistence = WriteThrough::new(keys::WISHLIST, "wishlist", store, notifier);
        let entries: WishlistEntries = persistence.load();
        tracing::debug!(entries = entries.len(), "wishlist loaded");
        Self {
            entries,
            persistence,
        }
    }

    /// Save a product. `added_at` is stamped with the current time.
    ///
    /// Saving a product twice leaves the original entry in place and only
    /// informs the user.
    #[instrument(skip(self, item), fields(product_id = %item.product_id))]
    pub fn add_item(&mut self, mut item: WishlistItem) -> WishlistAdd {
        if self.entries.contains(&item.product_id) {
            self.persistence
                .notifier()
                .info(format!("{} is already in your wishlist", item.display_name));
            return WishlistAdd::AlreadyPresent;
        }

        item.added_at = Utc::now();
        let name = item.display_name.clone();
        let product_id = item.product_id.clone();
        self.entries.add(item);
        self.commit();

        add_breadcrumb(
            "wishlist",
            "Added item",
            Some(&[("product_id", product_id.as_str())]),
        );
        self.persistence
            .notifier()
            .success(format!("Added {name} to your wishlist"));
        WishlistAdd::Added
    }

    /// Remove a product. Returns the removed entry, `None` if it was absent.
    #[instrument(skip(self))]
    pub fn remove_item(&mut self, product_id: &ProductId) -> Option<WishlistItem> {
        let removed = self.entries.remove(product_id)?;
        self.commit();
        add_breadcrumb(
            "wishlist",
            "Removed item",
            Some(&[("product_id", product_id.as_str())]),
        );
        Some(removed)
    }

    /// Move a saved product into `cart` as a single unit.
    ///
    /// The cart add happens first; the entry is only removed from the wishlist
    /// once the cart holds the product. Returns `false` if the product is not
    /// in the wishlist.
    #[instrument(skip(self, cart))]
    pub fn move_to_cart(&mut self, product_id: &ProductId, cart: &mut Cart) -> bool {
        let Some(line) = self.entries.get(product_id).map(WishlistItem::to_cart_line) else {
            return false;
        };

        cart.add_item(line);
        if !cart.lines().contains(product_id) {
            tracing::warn!(%product_id, "cart did not accept wishlist item");
            return false;
        }

        self.remove_item(product_id);
        true
    }

    #[must_use]
    pub fn is_in_wishlist(&self, product_id: &ProductId) -> bool {
        self.entries.contains(product_id)
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.commit();
        add_breadcrumb("wishlist", "Cleared wishlist", None);
    }

    #[must_use]
    pub fn items(&self) -> &[WishlistItem] {
        self.entries.items()
    }

    /// Number of saved products.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        self.persistence.is_degraded()
    }

    fn commit(&mut self) {
        self.persistence.save(&self.entries);
        self.persistence.notifier().invalidate(Topic::Wishlist);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::DateTime;
    use shopfront_core::Price;

    use super::*;
    use crate::notify::{NoticeLevel, StoreEvent, drain};
    use crate::store::MemoryStore;

    fn entry(id: &str) -> WishlistItem {
        WishlistItem {
            product_id: ProductId::new(id),
            display_name: format!("Item {id}"),
            unit_price: Price::from_cents(1500),
            image_ref: format!("{id}.png"),
            stock_hint: None,
            added_at: DateTime::UNIX_EPOCH,
        }
    }

    fn session(store: &Arc<MemoryStore>) -> (Wishlist, Cart, Notifier) {
        let notifier = Notifier::new();
        let store: Arc<dyn LocalStore> = store.clone();
        (
            Wishlist::load(store.clone(), notifier.clone()),
            Cart::load(store, notifier.clone()),
            notifier,
        )
    }

    #[test]
    fn test_duplicate_add_keeps_single_entry_and_informs() {
        let store = Arc::new(MemoryStore::new());
        let (mut wishlist, _, notifier) = session(&store);
        let mut rx = notifier.subscribe();

        assert_eq!(wishlist.add_item(entry("p1")), WishlistAdd::Added);
        assert_eq!(wishlist.add_item(entry("p1")), WishlistAdd::AlreadyPresent);

        assert_eq!(wishlist.items().len(), 1);
        let infos = drain(&mut rx)
            .into_iter()
            .filter(|e| matches!(e, StoreEvent::Notice(n) if n.level == NoticeLevel::Info))
            .count();
        assert_eq!(infos, 1);
    }

    #[test]
    fn test_added_at_is_stamped_on_insert() {
        let store = Arc::new(MemoryStore::new());
        let (mut wishlist, _, _) = session(&store);
        let before = Utc::now();

        wishlist.add_item(entry("p1"));

        assert!(wishlist.items()[0].added_at >= before);
    }

    #[test]
    fn test_move_to_cart_transfers_one_unit() {
        let store = Arc::new(MemoryStore::new());
        let (mut wishlist, mut cart, _) = session(&store);
        wishlist.add_item(entry("p1"));
        wishlist.add_item(entry("p2"));

        assert!(wishlist.move_to_cart(&ProductId::new("p1"), &mut cart));

        let line = cart.lines().get(&ProductId::new("p1")).unwrap();
        assert_eq!(line.quantity, 1);
        assert_eq!(line.image_ref, "p1.png");
        assert!(!wishlist.is_in_wishlist(&ProductId::new("p1")));
        assert!(wishlist.is_in_wishlist(&ProductId::new("p2")));
    }

    #[test]
    fn test_move_to_cart_merges_with_existing_line() {
        let store = Arc::new(MemoryStore::new());
        let (mut wishlist, mut cart, _) = session(&store);
        cart.add_item(entry("p1").to_cart_line());
        wishlist.add_item(entry("p1"));

        wishlist.move_to_cart(&ProductId::new("p1"), &mut cart);
        assert_eq!(cart.total_items(), 2);
        assert!(wishlist.is_empty());
    }

    #[test]
    fn test_move_absent_product_is_noop() {
        let store = Arc::new(MemoryStore::new());
        let (mut wishlist, mut cart, _) = session(&store);
        assert!(!wishlist.move_to_cart(&ProductId::new("ghost"), &mut cart));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_clear_example() {
        let store = Arc::new(MemoryStore::new());
        let (mut wishlist, _, _) = session(&store);
        wishlist.add_item(entry("p1"));
        wishlist.add_item(entry("p2"));

        wishlist.clear();

        assert!(wishlist.items().is_empty());
        assert_eq!(wishlist.total_items(), 0);
    }

    #[test]
    fn test_cart_and_wishlist_use_disjoint_keys() {
        let store = Arc::new(MemoryStore::new());
        let (mut wishlist, mut cart, _) = session(&store);
        wishlist.add_item(entry("w1"));
        cart.add_item(entry("c1").to_cart_line());

        let (reloaded_wishlist, reloaded_cart, _) = session(&store);
        assert_eq!(reloaded_wishlist.items().len(), 1);
        assert_eq!(reloaded_wishlist.items()[0].product_id.as_str(), "w1");
        assert_eq!(reloaded_cart.items().len(), 1);
        assert_eq!(reloaded_cart.items()[0].product_id.as_str(), "c1");
    }

    #[test]
    fn test_removal_persists_order() {
        let store = Arc::new(MemoryStore::new());
        let (mut wishlist, _, _) = session(&store);
        for id in ["a", "b", "c"] {
            wishlist.add_item(entry(id));
        }
        wishlist.remove_item(&ProductId::new("b"));
        assert!(wishlist.remove_item(&ProductId::new("b")).is_none());

        let (reloaded, _, _) = session(&store);
        let ids: Vec<&str> = reloaded
            .items()
            .iter()
            .map(|i| i.product_id.as_str())
            .collect();
        assert_eq!(ids, ["a", "c"]);
    }
}
