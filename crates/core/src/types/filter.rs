//! Product listing filter state and its URL query encoding.
//!
//! The listing page keeps its filters in the shareable URL. Parameters:
//!
//! | Parameter   | Field        | Default     |
//! |-------------|--------------|-------------|
//! | `search`    | `search`     | empty       |
//! | `category`  | `category`   | empty       |
//! | `minPrice`  | `min_price`  | unbounded   |
//! | `maxPrice`  | `max_price`  | unbounded   |
//! | `sortBy`    | `sort_by`    | `createdAt` |
//! | `sortOrder` | `sort_order` | `desc`      |
//! | `page`      | `page`       | `1`         |
//!
//! Parameters equal to their default are never written, and malformed values
//! read back as the default.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use super::price::Price;

/// Field the listing is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    CreatedAt,
    Price,
    Name,
    Rating,
}

impl SortField {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreatedAt => "createdAt",
            Self::Price => "price",
            Self::Name => "name",
            Self::Rating => "rating",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "createdAt" => Ok(Self::CreatedAt),
            "price" => Ok(Self::Price),
            "name" => Ok(Self::Name),
            "rating" => Ok(Self::Rating),
            _ => Err(format!("invalid sort field: {s}")),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(format!("invalid sort direction: {s}")),
        }
    }
}

/// A single user edit to the filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChange {
    Search(String),
    Category(String),
    MinPrice(Option<Price>),
    MaxPrice(Option<Price>),
    PriceRange {
        min: Option<Price>,
        max: Option<Price>,
    },
    Sort {
        field: SortField,
        direction: SortDirection,
    },
    Page(u32),
    /// Reset every field to its default.
    Clear,
}

impl FilterChange {
    /// Page navigation is the only edit that keeps the current page.
    #[must_use]
    pub const fn is_page_only(&self) -> bool {
        matches!(self, Self::Page(_))
    }
}

/// Filters, sort order, and page of the product listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub search: String,
    pub category: String,
    pub min_price: Option<Price>,
    pub max_price: Option<Price>,
    pub sort_by: SortField,
    pub sort_order: SortDirection,
    pub page: u32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: String::new(),
            min_price: None,
            max_price: None,
            sort_by: SortField::default(),
            sort_order: SortDirection::default(),
            page: 1,
        }
    }
}

impl FilterState {
    pub const SEARCH: &'static str = "search";
    pub const CATEGORY: &'static str = "category";
    pub const MIN_PRICE: &'static str = "minPrice";
    pub const MAX_PRICE: &'static str = "maxPrice";
    pub const SORT_BY: &'static str = "sortBy";
    pub const SORT_ORDER: &'static str = "sortOrder";
    pub const PAGE: &'static str = "page";

    /// Parse filters from a URL query string (with or without the leading `?`).
    ///
    /// Unknown parameters are ignored; when a parameter repeats, the last
    /// value wins. Values that fail to parse fall back to the field default.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut state = Self::default();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let value = value.trim();
            match key.as_ref() {
                Self::SEARCH => value.clone_into(&mut state.search),
                Self::CATEGORY => value.clone_into(&mut state.category),
                Self::MIN_PRICE => state.min_price = value.parse().ok(),
                Self::MAX_PRICE => state.max_price = value.parse().ok(),
                Self::SORT_BY => state.sort_by = value.parse().unwrap_or_default(),
                Self::SORT_ORDER => state.sort_order = value.parse().unwrap_or_default(),
                Self::PAGE => state.page = value.parse().ok().filter(|&p| p >= 1).unwrap_or(1),
                _ => {}
            }
        }

        if let (Some(min), Some(max)) = (state.min_price, state.max_price)
            && min > max
        {
            state.max_price = None;
        }

        state
    }

    /// Non-default parameters in canonical order.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if !self.search.is_empty() {
            pairs.push((Self::SEARCH, self.search.clone()));
        }
        if !self.category.is_empty() {
            pairs.push((Self::CATEGORY, self.category.clone()));
        }
        if let Some(min) = self.min_price {
            pairs.push((Self::MIN_PRICE, min.amount().normalize().to_string()));
        }
        if let Some(max) = self.max_price {
            pairs.push((Self::MAX_PRICE, max.amount().normalize().to_string()));
        }
        if self.sort_by != SortField::default() {
            pairs.push((Self::SORT_BY, self.sort_by.as_str().to_owned()));
        }
        if self.sort_order != SortDirection::default() {
            pairs.push((Self::SORT_ORDER, self.sort_order.as_str().to_owned()));
        }
        if self.page > 1 {
            pairs.push((Self::PAGE, self.page.to_string()));
        }

        pairs
    }

    /// Encode as a query string without the leading `?`. Defaults encode as "".
    #[must_use]
    pub fn to_query(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.query_pairs() {
            serializer.append_pair(key, &value);
        }
        serializer.finish()
    }

    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Apply one edit. Returns whether anything changed.
    ///
    /// Any change other than a page change sends the listing back to page 1.
    pub fn apply(&mut self, change: FilterChange) -> bool {
        let before = self.clone();

        match change {
            FilterChange::Search(search) => search.trim().clone_into(&mut self.search),
            FilterChange::Category(category) => category.trim().clone_into(&mut self.category),
            FilterChange::MinPrice(min) => self.set_price_range(min, self.max_price),
            FilterChange::MaxPrice(max) => self.set_price_range(self.min_price, max),
            FilterChange::PriceRange { min, max } => self.set_price_range(min, max),
            FilterChange::Sort { field, direction } => {
                self.sort_by = field;
                self.sort_order = direction;
            }
            FilterChange::Page(page) => {
                self.page = page.max(1);
                return *self != before;
            }
            FilterChange::Clear => *self = Self::default(),
        }

        if *self == before {
            return false;
        }
        self.page = 1;
        true
    }

    fn set_price_range(&mut self, min: Option<Price>, max: Option<Price>) {
        match (min, max) {
            (Some(lo), Some(hi)) if lo > hi => {
                self.min_price = Some(hi);
                self.max_price = Some(lo);
            }
            _ => {
                self.min_price = min;
                self.max_price = max;
            }
        }
    }
}
