//! Product search handler.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use gaspass_core::catalog::{Product, SortOrder};

use super::parse_optional;
use super::products::parse_category;
use crate::db::{ProductRepository, SearchFilter};
use crate::error::Result;
use crate::state::AppState;

/// Query parameters for `/search/products`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub sort: Option<String>,
}

impl SearchQuery {
    /// Convert the raw query into a repository filter.
    ///
    /// Unknown sort values fall back to ID order.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for malformed categories or prices.
    pub fn into_filter(self) -> Result<SearchFilter> {
        let category = self
            .category
            .as_deref()
            .map(parse_category)
            .transpose()?
            .and_then(|filter| filter.category());

        Ok(SearchFilter {
            query: self
                .q
                .map(|q| q.trim().to_string())
                .filter(|q| !q.is_empty()),
            category,
            min_price: parse_optional(self.min_price.as_deref(), "min_price")?,
            max_price: parse_optional(self.max_price.as_deref(), "max_price")?,
            sort: self.sort.as_deref().and_then(SortOrder::parse),
        })
    }
}

/// Search products.
pub async fn products(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Product>>> {
    let filter = query.into_filter()?;
    let products = ProductRepository::new(state.pool()).search(&filter).await?;
    Ok(Json(products))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_into_filter() {
        let filter = SearchQuery {
            q: Some("  casque ".to_string()),
            category: Some("All".to_string()),
            min_price: Some("1000".to_string()),
            max_price: None,
            sort: Some("price_desc".to_string()),
        }
        .into_filter()
        .unwrap();

        assert_eq!(filter.query.as_deref(), Some("casque"));
        assert!(filter.category.is_none());
        assert_eq!(filter.min_price, Some(Decimal::from(1000)));
        assert!(filter.max_price.is_none());
        assert_eq!(filter.sort, Some(SortOrder::PriceDesc));
    }

    #[test]
    fn test_unknown_sort_orders_by_id() {
        let filter = SearchQuery {
            sort: Some("popularity".to_string()),
            ..SearchQuery::default()
        }
        .into_filter()
        .unwrap();
        assert!(filter.sort.is_none());
        assert!(filter.query.is_none());
    }

    #[test]
    fn test_bad_price_rejected() {
        let result = SearchQuery {
            max_price: Some("lots".to_string()),
            ..SearchQuery::default()
        }
        .into_filter();
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
