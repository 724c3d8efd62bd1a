//! Order endpoints.

use serde::Serialize;
use shopfront_core::{NewOrder, Order, OrderId, OrderStatus};
use tracing::instrument;

use super::{ApiClient, ApiError, Page};

#[derive(Serialize)]
struct StatusChange {
    status: OrderStatus,
}

impl ApiClient {
    /// Get one page of orders, newest first as the API returns them.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_orders(&self, page: u32, page_size: u32) -> Result<Page<Order>, ApiError> {
        let page = page.max(1);
        let url = self.endpoint(
            &["orders"],
            &[("page", page.to_string()), ("limit", page_size.to_string())],
        )?;
        let response = self
            .fetch::<Vec<Order>>(self.inner.client.get(url), "orders")
            .await?;
        Ok(Page::from_response(response, page, page_size))
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the order does not exist, or an
    /// error if the API request fails.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn get_order(&self, id: &OrderId) -> Result<Order, ApiError> {
        let url = self.endpoint(&["orders", id.as_str()], &[])?;
        Ok(self
            .fetch::<Order>(self.inner.client.get(url), &format!("order {id}"))
            .await?
            .data)
    }

    /// Submit an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the order or the request fails.
    #[instrument(skip(self, order), fields(lines = order.items.len(), total = %order.total_price))]
    pub async fn create_order(&self, order: &NewOrder) -> Result<Order, ApiError> {
        let url = self.endpoint(&["orders"], &[])?;
        Ok(self
            .fetch::<Order>(self.inner.client.post(url).json(order), "orders")
            .await?
            .data)
    }

    /// Move an order to a new status.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the order does not exist, or an
    /// error if the API rejects the transition.
    #[instrument(skip(self), fields(order_id = %id, status = %status))]
    pub async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, ApiError> {
        let url = self.endpoint(&["orders", id.as_str(), "status"], &[])?;
        Ok(self
            .fetch::<Order>(
                self.inner.client.patch(url).json(&StatusChange { status }),
                &format!("order {id}"),
            )
            .await?
            .data)
    }
}
