//! `shopfront cart ...`

use shopfront_core::{LineChange, ProductId};
use shopfront_storefront::StorefrontSession;

use super::CliError;
use crate::output;

pub fn show(session: &StorefrontSession) {
    output::cart(session.cart());
}

/// Add `quantity` units of a product, fetching its details first.
pub async fn add(
    session: &mut StorefrontSession,
    product: &ProductId,
    quantity: u32,
) -> Result<(), CliError> {
    session.add_product_to_cart(product, quantity).await?;
    output::cart(session.cart());
    Ok(())
}

pub fn update(session: &mut StorefrontSession, product: &ProductId, quantity: i64) {
    if session.cart_mut().update_quantity(product, quantity) == LineChange::Unchanged {
        output::line(&format!("{product} is not in your cart"));
    }
    output::cart(session.cart());
}

pub fn remove(session: &mut StorefrontSession, product: &ProductId) {
    if session.cart_mut().remove_item(product) == LineChange::Unchanged {
        output::line(&format!("{product} is not in your cart"));
    }
    output::cart(session.cart());
}

pub fn clear(session: &mut StorefrontSession) {
    session.cart_mut().clear();
    output::cart(session.cart());
}
