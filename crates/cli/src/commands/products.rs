//! `shopfront products ...`

use clap::Args;
use shopfront_core::{FilterChange, FilterState, Price, SortDirection, SortField};
use shopfront_storefront::StorefrontSession;

use super::CliError;
use crate::output;

/// Listing filters, named like their URL parameters.
#[derive(Debug, Default, Args)]
pub struct ListingArgs {
    /// Free-text search
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub min_price: Option<Price>,
    #[arg(long)]
    pub max_price: Option<Price>,
    /// createdAt, price, name, or rating
    #[arg(long)]
    pub sort_by: Option<SortField>,
    /// asc or desc
    #[arg(long)]
    pub sort_order: Option<SortDirection>,
    #[arg(long)]
    pub page: Option<u32>,
}

impl ListingArgs {
    /// The filters these flags describe, applied the way a user would edit
    /// them: the page is set last so it survives the other edits.
    pub fn to_filter(&self) -> FilterState {
        let mut filter = FilterState::default();
        if let Some(search) = &self.search {
            filter.apply(FilterChange::Search(search.clone()));
        }
        if let Some(category) = &self.category {
            filter.apply(FilterChange::Category(category.clone()));
        }
        if self.min_price.is_some() || self.max_price.is_some() {
            filter.apply(FilterChange::PriceRange {
                min: self.min_price,
                max: self.max_price,
            });
        }
        if self.sort_by.is_some() || self.sort_order.is_some() {
            filter.apply(FilterChange::Sort {
                field: self.sort_by.unwrap_or_default(),
                direction: self.sort_order.unwrap_or_default(),
            });
        }
        if let Some(page) = self.page {
            filter.apply(FilterChange::Page(page));
        }
        filter
    }
}

/// Print the shareable listing URL, then the fetched page.
pub async fn list(session: &StorefrontSession, args: &ListingArgs) -> Result<(), CliError> {
    let filter = args.to_filter();

    let mut url = session.config().listing_url();
    let query = filter.to_query();
    url.set_query((!query.is_empty()).then_some(query.as_str()));
    output::url(&url);

    let page = session
        .api()
        .list_products(&filter, session.config().page_size)
        .await?;
    output::products(&page);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_page_survives_other_flags() {
        let args = ListingArgs {
            category: Some("tea".to_string()),
            page: Some(3),
            ..ListingArgs::default()
        };
        assert_eq!(args.to_filter().to_query(), "category=tea&page=3");
    }

    #[test]
    fn test_inverted_price_flags_are_swapped() {
        let args = ListingArgs {
            min_price: Some("40".parse().unwrap()),
            max_price: Some("10".parse().unwrap()),
            ..ListingArgs::default()
        };
        assert_eq!(args.to_filter().to_query(), "minPrice=10&maxPrice=40");
    }

    #[test]
    fn test_no_flags_is_default_listing() {
        assert!(ListingArgs::default().to_filter().is_default());
    }
}
