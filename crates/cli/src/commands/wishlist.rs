//! `shopfront wishlist ...`

use shopfront_core::ProductId;
use shopfront_storefront::StorefrontSession;

use super::CliError;
use crate::output;

pub fn show(session: &StorefrontSession) {
    output::wishlist(session.wishlist());
}

/// Save a product, fetching its details first.
pub async fn add(session: &mut StorefrontSession, product: &ProductId) -> Result<(), CliError> {
    session.add_product_to_wishlist(product).await?;
    output::wishlist(session.wishlist());
    Ok(())
}

pub fn remove(session: &mut StorefrontSession, product: &ProductId) {
    if session.wishlist_mut().remove_item(product).is_none() {
        output::line(&format!("{product} is not in your wishlist"));
    }
    output::wishlist(session.wishlist());
}

pub fn move_to_cart(session: &mut StorefrontSession, product: &ProductId) {
    if session.move_to_cart(product) {
        output::cart(session.cart());
    } else {
        output::line(&format!("{product} is not in your wishlist"));
    }
}

pub fn clear(session: &mut StorefrontSession) {
    session.wishlist_mut().clear();
    output::wishlist(session.wishlist());
}
