//! Order payloads and the cart-to-order snapshot used at checkout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cart::{CartLineItem, CartLines};
use super::id::{OrderId, ProductId, UserId};
use super::price::Price;
use super::shipping::{ShippingDetails, ShippingError};
use super::status::OrderStatus;

/// Errors building an order from the cart.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,
    #[error(transparent)]
    Shipping(#[from] ShippingError),
}

/// One product line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Price,
}

impl From<&CartLineItem> for OrderLine {
    fn from(line: &CartLineItem) -> Self {
        Self {
            product_id: line.product_id.clone(),
            name: line.display_name.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price,
        }
    }
}

/// Order submission payload: a snapshot of the cart plus shipping details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub items: Vec<OrderLine>,
    pub total_price: Price,
    pub shipping: ShippingDetails,
}

impl NewOrder {
    /// Snapshot `cart` into an order after validating `shipping`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] for an empty cart and
    /// [`CheckoutError::Shipping`] when the shipping details are invalid.
    pub fn from_cart(cart: &CartLines, shipping: ShippingDetails) -> Result<Self, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let shipping = shipping.validate()?;

        Ok(Self {
            items: cart.items().iter().map(OrderLine::from).collect(),
            total_price: cart.total_price(),
            shipping,
        })
    }
}

/// An order as returned by the order API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    #[serde(default)]
    pub user: Option<UserId>,
    pub items: Vec<OrderLine>,
    pub total_price: Price,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub shipping: Option<ShippingDetails>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn shipping() -> ShippingDetails {
        ShippingDetails {
            full_name: "Grace Hopper".to_string(),
            email: "grace@example.com".to_string(),
            phone: "555 010 9999".to_string(),
            address: "1 Compiler Way".to_string(),
            city: "Arlington".to_string(),
            postal_code: "22201".to_string(),
            notes: None,
        }
    }

    #[test]
    fn test_empty_cart_cannot_check_out() {
        let err = NewOrder::from_cart(&CartLines::new(), shipping()).unwrap_err();
        assert_eq!(err, CheckoutError::EmptyCart);
    }

    #[test]
    fn test_snapshot_copies_lines_and_total() {
        let mut cart = CartLines::new();
        cart.add(CartLineItem::new("p1", 2, Price::from_cents(1000), "Tea", ""));
        cart.add(CartLineItem::new("p2", 1, Price::from_cents(250), "Cup", ""));

        let order = NewOrder::from_cart(&cart, shipping()).unwrap();
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].name, "Tea");
        assert_eq!(order.total_price, Price::from_cents(2250));
    }

    #[test]
    fn test_invalid_shipping_is_reported() {
        let mut cart = CartLines::new();
        cart.add(CartLineItem::new("p1", 1, Price::from_cents(1000), "Tea", ""));
        let mut bad = shipping();
        bad.email = "nope".to_string();

        assert!(matches!(
            NewOrder::from_cart(&cart, bad),
            Err(CheckoutError::Shipping(_))
        ));
    }
}
