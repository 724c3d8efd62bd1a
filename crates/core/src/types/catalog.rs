//! Product catalog payloads exchanged with the product API.

use serde::{Deserialize, Serialize};

use super::cart::CartLineItem;
use super::id::ProductId;
use super::price::Price;

/// A product as returned by the product API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub stock: Option<u32>,
    /// Primary image reference (URL or asset key).
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub rating: Option<f64>,
}

impl Product {
    /// A cart line for `quantity` units of this product.
    #[must_use]
    pub fn to_cart_line(&self, quantity: u32) -> CartLineItem {
        CartLineItem::new(
            self.id.clone(),
            quantity,
            self.price,
            self.name.clone(),
            self.image.clone(),
        )
    }

    /// Whether the API reports the product as sold out.
    #[must_use]
    pub fn is_sold_out(&self) -> bool {
        self.stock == Some(0)
    }
}

/// Payload for creating a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub category: String,
    pub stock: u32,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub image: String,
}

/// Partial product update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_product_tolerates_missing_optional_fields() {
        let product: Product = serde_json::from_value(json!({
            "id": "p1",
            "name": "Lamp",
            "price": 45.5
        }))
        .unwrap();

        assert_eq!(product.id.as_str(), "p1");
        assert!(product.category.is_empty());
        assert!(!product.is_sold_out());
    }

    #[test]
    fn test_to_cart_line() {
        let product: Product = serde_json::from_value(json!({
            "id": "p1",
            "name": "Lamp",
            "price": "45.50",
            "image": "lamp.jpg",
            "stock": 0
        }))
        .unwrap();

        let line = product.to_cart_line(2);
        assert_eq!(line.quantity, 2);
        assert_eq!(line.image_ref, "lamp.jpg");
        assert!(product.is_sold_out());
    }

    #[test]
    fn test_product_update_skips_unset_fields() {
        let update = ProductUpdate {
            stock: Some(3),
            ..ProductUpdate::default()
        };
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({"stock": 3}));
    }
}
