//! Wishlist entries.
//!
//! Unlike the cart, the wishlist never merges: adding a product that is
//! already present is rejected and the existing entry (with its original
//! `added_at`) is kept.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cart::CartLineItem;
use super::catalog::Product;
use super::id::ProductId;
use super::price::Price;

/// A saved product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    pub product_id: ProductId,
    pub display_name: String,
    pub unit_price: Price,
    #[serde(default)]
    pub image_ref: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_hint: Option<u32>,
    /// Set once when the entry is created.
    pub added_at: DateTime<Utc>,
}

impl WishlistItem {
    /// Entry for `product`, saved at `added_at`.
    #[must_use]
    pub fn from_product(product: &Product, added_at: DateTime<Utc>) -> Self {
        Self {
            product_id: product.id.clone(),
            display_name: product.name.clone(),
            unit_price: product.price,
            image_ref: product.image.clone(),
            stock_hint: product.stock,
            added_at,
        }
    }

    /// The cart line a "move to cart" produces: one unit at the saved price.
    #[must_use]
    pub fn to_cart_line(&self) -> CartLineItem {
        CartLineItem::new(
            self.product_id.clone(),
            1,
            self.unit_price,
            self.display_name.clone(),
            self.image_ref.clone(),
        )
    }
}

/// Ordered wishlist with unique product IDs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<WishlistItem>", into = "Vec<WishlistItem>")]
pub struct WishlistEntries {
    items: Vec<WishlistItem>,
}

impl WishlistEntries {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build from raw entries; later duplicates of a product are dropped.
    #[must_use]
    pub fn from_items(items: Vec<WishlistItem>) -> Self {
        let mut list = Self::new();
        for item in items {
            list.add(item);
        }
        list
    }

    /// Append an entry. Returns `false` if the product is already saved.
    pub fn add(&mut self, item: WishlistItem) -> bool {
        if self.contains(&item.product_id) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Remove and return the entry for `product_id`, if present.
    pub fn remove(&mut self, product_id: &ProductId) -> Option<WishlistItem> {
        let index = self
            .items
            .iter()
            .position(|item| &item.product_id == product_id)?;
        Some(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn get(&self, product_id: &ProductId) -> Option<&WishlistItem> {
        self.items.iter().find(|item| &item.product_id == product_id)
    }

    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.get(product_id).is_some()
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn items(&self) -> &[WishlistItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<Vec<WishlistItem>> for WishlistEntries {
    fn from(items: Vec<WishlistItem>) -> Self {
        Self::from_items(items)
    }
}

impl From<WishlistEntries> for Vec<WishlistItem> {
    fn from(list: WishlistEntries) -> Self {
        list.items
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn entry(id: &str, day: u32) -> WishlistItem {
        WishlistItem {
            product_id: ProductId::new(id),
            display_name: format!("Item {id}"),
            unit_price: Price::from_cents(2500),
            image_ref: String::new(),
            stock_hint: Some(3),
            added_at: Utc.with_ymd_and_hms(2026, 1, day, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_duplicate_add_is_rejected_and_keeps_original() {
        let mut list = WishlistEntries::new();
        assert!(list.add(entry("p1", 1)));
        assert!(!list.add(entry("p1", 9)));

        assert_eq!(list.len(), 1);
        assert_eq!(list.items()[0].added_at, entry("p1", 1).added_at);
    }

    #[test]
    fn test_remove_absent_is_none() {
        let mut list = WishlistEntries::new();
        list.add(entry("p1", 1));
        assert!(list.remove(&ProductId::new("p2")).is_none());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_clear_empties() {
        let mut list = WishlistEntries::from_items(vec![entry("p1", 1), entry("p2", 2)]);
        list.clear();
        assert!(list.is_empty());
    }

    #[test]
    fn test_to_cart_line_uses_single_unit() {
        let line = entry("p7", 1).to_cart_line();
        assert_eq!(line.quantity, 1);
        assert_eq!(line.unit_price, Price::from_cents(2500));
        assert_eq!(line.display_name, "Item p7");
    }

    #[test]
    fn test_stock_hint_omitted_when_absent() {
        let mut item = entry("p1", 1);
        item.stock_hint = None;
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("stockHint").is_none());
        assert!(json.get("addedAt").is_some());
    }
}
