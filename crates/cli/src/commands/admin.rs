//! `shopfront admin ...`
//!
//! Back-office commands. They talk to the API directly and never touch the
//! local cart or wishlist.

use shopfront_core::{OrderId, OrderStatus, ProductId};
use shopfront_storefront::StorefrontSession;

use super::CliError;
use crate::output;

pub async fn orders(session: &StorefrontSession, page: u32) -> Result<(), CliError> {
    let page = session
        .api()
        .list_orders(page, session.config().page_size)
        .await?;
    output::orders(&page);
    Ok(())
}

pub async fn order_status(
    session: &StorefrontSession,
    order: &OrderId,
    status: OrderStatus,
) -> Result<(), CliError> {
    let order = session.api().update_order_status(order, status).await?;
    tracing::info!(order_id = %order.id, status = %order.status, "order status updated");
    output::order(&order);
    Ok(())
}

pub async fn users(session: &StorefrontSession, page: u32) -> Result<(), CliError> {
    let page = session
        .api()
        .list_users(page, session.config().page_size)
        .await?;
    output::users(&page);
    Ok(())
}

pub async fn branches(session: &StorefrontSession) -> Result<(), CliError> {
    let branches = session.api().list_branches().await?;
    output::branches(&branches);
    Ok(())
}

pub async fn delete_product(session: &StorefrontSession, product: &ProductId) -> Result<(), CliError> {
    session.api().delete_product(product).await?;
    tracing::info!(product_id = %product, "product deleted");
    output::line(&format!("Deleted product {product}"));
    Ok(())
}
