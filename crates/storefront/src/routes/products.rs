//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use gaspass_core::ProductId;
use gaspass_core::catalog::{CategoryFilter, Product};

use super::{parse_optional, parse_param};
use crate::db::{Pagination, ProductFilter, ProductRepository};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Query parameters for the product listing.
///
/// Values arrive as raw strings so malformed input yields the API's JSON
/// error body instead of the extractor's plain-text rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub category: Option<String>,
    pub featured: Option<String>,
}

impl ListQuery {
    /// Convert the raw query into a repository filter.
    ///
    /// Pagination applies only when both `page` and `limit` are present.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for non-numeric pages, limits or
    /// categories.
    pub fn into_filter(self) -> Result<ProductFilter> {
        let page: Option<u32> = parse_optional(self.page.as_deref(), "page")?;
        let limit: Option<u32> = parse_optional(self.limit.as_deref(), "limit")?;
        let category = self
            .category
            .as_deref()
            .map(parse_category)
            .transpose()?
            .and_then(|filter| filter.category());

        Ok(ProductFilter {
            category,
            featured_only: self.featured.as_deref() == Some("true"),
            pagination: page.zip(limit).map(|(p, l)| Pagination::new(p, l)),
        })
    }
}

/// Parse a `category` query value (`All` or a category ID).
pub(crate) fn parse_category(value: &str) -> Result<CategoryFilter> {
    CategoryFilter::parse(value.trim())
        .map_err(|_| AppError::bad_request(format!("Invalid category: {value}")))
}

/// List products.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Product>>> {
    let filter = query.into_filter()?;
    let products = ProductRepository::new(state.pool()).list(&filter).await?;
    Ok(Json(products))
}

/// Featured products.
pub async fn featured(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool()).featured().await?;
    Ok(Json(products))
}

/// Product detail.
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Product>> {
    let id: ProductId = parse_param(&id, "product id")?;
    ProductRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Product not found"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use gaspass_core::CategoryId;

    use super::*;

    fn query(page: Option<&str>, limit: Option<&str>, category: Option<&str>) -> ListQuery {
        ListQuery {
            page: page.map(String::from),
            limit: limit.map(String::from),
            category: category.map(String::from),
            featured: None,
        }
    }

    #[test]
    fn test_pagination_requires_page_and_limit() {
        let filter = query(Some("2"), None, None).into_filter().unwrap();
        assert!(filter.pagination.is_none());

        let filter = query(Some("2"), Some("5"), None).into_filter().unwrap();
        assert_eq!(filter.pagination, Some(Pagination::new(2, 5)));
        assert_eq!(filter.pagination.unwrap().offset(), 5);
    }

    #[test]
    fn test_category_all_disables_filter() {
        let filter = query(None, None, Some("All")).into_filter().unwrap();
        assert!(filter.category.is_none());

        let filter = query(None, None, Some("3")).into_filter().unwrap();
        assert_eq!(filter.category, Some(CategoryId::new(3)));
    }

    #[test]
    fn test_invalid_values_are_bad_requests() {
        assert!(matches!(
            query(Some("one"), Some("5"), None).into_filter(),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            query(None, None, Some("shoes")).into_filter(),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_featured_flag() {
        let featured = |value: &str| ListQuery {
            featured: Some(value.to_string()),
            ..ListQuery::default()
        };
        assert!(featured("true").into_filter().unwrap().featured_only);
        assert!(!featured("false").into_filter().unwrap().featured_only);
    }
}
