//! Response envelope shared by every endpoint.

use serde::{Deserialize, Serialize};

/// Pagination details returned with list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

/// `{ "data": T, "meta": {...} }`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
    #[serde(default)]
    pub meta: Option<PageMeta>,
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Page<T> {
    /// Build a page from a list envelope. A response without `meta` is
    /// treated as a single complete page.
    pub(crate) fn from_response(response: ApiResponse<Vec<T>>, page: u32, limit: u32) -> Self {
        let meta = response.meta.unwrap_or_else(|| PageMeta {
            total: response.data.len() as u64,
            page,
            limit,
            total_pages: 1,
        });
        Self {
            items: response.data,
            meta,
        }
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.meta.page < self.meta.total_pages
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.meta.page > 1
    }
}
