//! Cart line items and the pure cart aggregate.
//!
//! [`CartLines`] owns the ordered list of line items and enforces the cart
//! invariants:
//!
//! - at most one line per product (adds merge by product ID)
//! - a stored line never has a quantity of zero (it is removed instead)
//! - totals are derived from the lines on every call, never stored
//!
//! Persistence and notifications live in the storefront crate.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A single product line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Price,
    pub display_name: String,
    #[serde(default)]
    pub image_ref: String,
}

impl CartLineItem {
    /// Create a line item. A quantity of zero is raised to one.
    #[must_use]
    pub fn new(
        product_id: impl Into<ProductId>,
        quantity: u32,
        unit_price: Price,
        display_name: impl Into<String>,
        image_ref: impl Into<String>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            quantity: quantity.max(1),
            unit_price,
            display_name: display_name.into(),
            image_ref: image_ref.into(),
        }
    }

    /// Price of this line (`unit_price * quantity`).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// What a cart mutation did to the line list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineChange {
    /// A new line was appended.
    Added,
    /// An existing line absorbed the quantity; holds the new quantity.
    Merged(u32),
    /// An existing line's quantity was replaced in place.
    Updated(u32),
    /// The line was deleted.
    Removed,
    /// Nothing matched or nothing needed to change.
    Unchanged,
}

impl LineChange {
    /// Whether the line list was modified.
    #[must_use]
    pub const fn is_change(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Ordered, de-duplicated list of cart lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CartLineItem>", into = "Vec<CartLineItem>")]
pub struct CartLines {
    items: Vec<CartLineItem>,
}

impl CartLines {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from raw lines, restoring the invariants.
    ///
    /// Duplicate products are merged into the first occurrence and
    /// zero-quantity lines are dropped.
    #[must_use]
    pub fn from_items(items: Vec<CartLineItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            cart.add(item);
        }
        cart
    }

    /// Add a line, merging into an existing line with the same product.
    ///
    /// A zero-quantity input is ignored.
    pub fn add(&mut self, item: CartLineItem) -> LineChange {
        if item.quantity == 0 {
            return LineChange::Unchanged;
        }

        if let Some(existing) = self.find_mut(&item.product_id) {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
            return LineChange::Merged(existing.quantity);
        }

        self.items.push(item);
        LineChange::Added
    }

    /// Replace a line's quantity in place. Non-positive quantities remove it.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) -> LineChange {
        if quantity <= 0 {
            return self.remove(product_id);
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        match self.find_mut(product_id) {
            Some(line) if line.quantity == quantity => LineChange::Unchanged,
            Some(line) => {
                line.quantity = quantity;
                LineChange::Updated(quantity)
            }
            None => LineChange::Unchanged,
        }
    }

    /// Delete the line for `product_id`. Absent products are a no-op.
    pub fn remove(&mut self, product_id: &ProductId) -> LineChange {
        let before = self.items.len();
        self.items.retain(|line| &line.product_id != product_id);
        if self.items.len() == before {
            LineChange::Unchanged
        } else {
            LineChange::Removed
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Look up the line for a product.
    #[must_use]
    pub fn get(&self, product_id: &ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|line| &line.product_id == product_id)
    }

    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.get(product_id).is_some()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Sum of `unit_price * quantity` over all lines.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity)).sum()
    }

    fn find_mut(&mut self, product_id: &ProductId) -> Option<&mut CartLineItem> {
        self.items
            .iter_mut()
            .find(|line| &line.product_id == product_id)
    }
}

impl From<Vec<CartLineItem>> for CartLines {
    fn from(items: Vec<CartLineItem>) -> Self {
        Self::from_items(items)
    }
}

impl From<CartLines> for Vec<CartLineItem> {
    fn from(cart: CartLines) -> Self {
        cart.items
    }
}
