//! User and branch endpoints.

use shopfront_core::{Branch, User, UserId, UserUpdate};
use tracing::instrument;

use super::{ApiClient, ApiError, Page};

impl ApiClient {
    /// Get one page of users.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_users(&self, page: u32, page_size: u32) -> Result<Page<User>, ApiError> {
        let page = page.max(1);
        let url = self.endpoint(
            &["users"],
            &[("page", page.to_string()), ("limit", page_size.to_string())],
        )?;
        let response = self
            .fetch::<Vec<User>>(self.inner.client.get(url), "users")
            .await?;
        Ok(Page::from_response(response, page, page_size))
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the user does not exist, or an
    /// error if the API request fails.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn get_user(&self, id: &UserId) -> Result<User, ApiError> {
        let url = self.endpoint(&["users", id.as_str()], &[])?;
        Ok(self
            .fetch::<User>(self.inner.client.get(url), &format!("user {id}"))
            .await?
            .data)
    }

    /// Apply a partial update to a user.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the user does not exist, or an
    /// error if the API request fails.
    #[instrument(skip(self, update), fields(user_id = %id))]
    pub async fn update_user(&self, id: &UserId, update: &UserUpdate) -> Result<User, ApiError> {
        let url = self.endpoint(&["users", id.as_str()], &[])?;
        Ok(self
            .fetch::<User>(self.inner.client.put(url).json(update), &format!("user {id}"))
            .await?
            .data)
    }

    /// List every store branch.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_branches(&self) -> Result<Vec<Branch>, ApiError> {
        let url = self.endpoint(&["branches"], &[])?;
        Ok(self
            .fetch::<Vec<Branch>>(self.inner.client.get(url), "branches")
            .await?
            .data)
    }
}
