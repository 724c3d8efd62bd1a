//! Product endpoints.

use shopfront_core::{FilterState, NewProduct, Product, ProductId, ProductUpdate};
use tracing::{debug, instrument};

use super::{ApiClient, ApiError, CacheValue, Page};

impl ApiClient {
    /// Get one page of products matching `filter`.
    ///
    /// The filter's query parameters are passed through unchanged, with
    /// `page` and `limit` always present.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, filter), fields(query = %filter.to_query()))]
    pub async fn list_products(
        &self,
        filter: &FilterState,
        page_size: u32,
    ) -> Result<Page<Product>, ApiError> {
        let mut query: Vec<(&str, String)> = filter
            .query_pairs()
            .into_iter()
            .filter(|(key, _)| *key != FilterState::PAGE)
            .collect();
        query.push(("page", filter.page.to_string()));
        query.push(("limit", page_size.to_string()));

        let url = self.endpoint(&["products"], &query)?;
        let cache_key = url.to_string();

        if let Some(CacheValue::Products(page)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(page);
        }

        let response = self
            .fetch::<Vec<Product>>(self.inner.client.get(url), "products")
            .await?;
        let page = Page::from_response(response, filter.page, page_size);

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(page.clone()))
            .await;

        Ok(page)
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the product does not exist, or an
    /// error if the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let url = self.endpoint(&["products", id.as_str()], &[])?;
        let cache_key = url.to_string();

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product = self
            .fetch::<Product>(self.inner.client.get(url), &format!("product {id}"))
            .await?
            .data;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the product or the request fails.
    /// The product cache is dropped whether or not the create succeeds.
    #[instrument(skip(self, product), fields(name = %product.name))]
    pub async fn create_product(&self, product: &NewProduct) -> Result<Product, ApiError> {
        let url = self.endpoint(&["products"], &[])?;
        let result = self
            .fetch::<Product>(self.inner.client.post(url).json(product), "products")
            .await;
        self.invalidate_products();
        Ok(result?.data)
    }

    /// Apply a partial update to a product.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the product does not exist, or an
    /// error if the API request fails.
    #[instrument(skip(self, update), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        id: &ProductId,
        update: &ProductUpdate,
    ) -> Result<Product, ApiError> {
        let url = self.endpoint(&["products", id.as_str()], &[])?;
        let result = self
            .fetch::<Product>(self.inner.client.put(url).json(update), &format!("product {id}"))
            .await;
        self.invalidate_products();
        Ok(result?.data)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the product does not exist, or an
    /// error if the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<(), ApiError> {
        let url = self.endpoint(&["products", id.as_str()], &[])?;
        let result = self
            .send(self.inner.client.delete(url), &format!("product {id}"))
            .await;
        self.invalidate_products();
        result.map(|_| ())
    }
}
