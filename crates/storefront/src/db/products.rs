//! Product repository.
//!
//! Listing and search build their `WHERE` clause dynamically with
//! [`QueryBuilder`]; every user-supplied value is bound, never interpolated.

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use gaspass_core::catalog::{Product, SortOrder};
use gaspass_core::{CategoryId, ProductId};

use super::RepositoryError;

/// Columns shared by every product query.
const PRODUCT_SELECT: &str = r"
    SELECT
        p.id,
        p.name,
        p.price,
        p.description,
        p.image,
        p.category_id AS category,
        p.rating,
        p.stock,
        p.featured,
        c.name AS category_name
    FROM product p
    LEFT JOIN category c ON p.category_id = c.id
";

/// Default page size when `limit` is zero.
const DEFAULT_PAGE_SIZE: u32 = 10;

/// A page of results. Page numbers start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    /// Build a pagination window; a zero page becomes 1 and a zero limit
    /// becomes the default page size.
    #[must_use]
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: if limit == 0 { DEFAULT_PAGE_SIZE } else { limit },
        }
    }

    /// Rows to skip.
    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }
}

/// Filters for the product listing.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category: Option<CategoryId>,
    pub featured_only: bool,
    pub pagination: Option<Pagination>,
}

/// Filters for product search.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    /// Case-insensitive substring matched against name and description.
    pub query: Option<String>,
    pub category: Option<CategoryId>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    /// `None` orders by product ID.
    pub sort: Option<SortOrder>,
}

/// Repository for product queries.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        let mut query = QueryBuilder::<Postgres>::new(PRODUCT_SELECT);
        query.push(" WHERE 1=1");

        if let Some(category) = filter.category {
            query.push(" AND p.category_id = ").push_bind(category);
        }
        if filter.featured_only {
            query.push(" AND p.featured = true");
        }

        query.push(" ORDER BY p.id");

        if let Some(page) = filter.pagination {
            query
                .push(" LIMIT ")
                .push_bind(i64::from(page.limit))
                .push(" OFFSET ")
                .push_bind(page.offset());
        }

        let products = query
            .build_query_as::<Product>()
            .fetch_all(self.pool)
            .await?;
        Ok(products)
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let mut query = QueryBuilder::<Postgres>::new(PRODUCT_SELECT);
        query.push(" WHERE p.id = ").push_bind(id);

        let product = query
            .build_query_as::<Product>()
            .fetch_optional(self.pool)
            .await?;
        Ok(product)
    }

    /// Featured products, best rated first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn featured(&self) -> Result<Vec<Product>, RepositoryError> {
        let mut query = QueryBuilder::<Postgres>::new(PRODUCT_SELECT);
        query.push(" WHERE p.featured = true ORDER BY p.rating DESC NULLS LAST, p.id");

        let products = query
            .build_query_as::<Product>()
            .fetch_all(self.pool)
            .await?;
        Ok(products)
    }

    /// Search products by keyword, category and price range.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn search(&self, filter: &SearchFilter) -> Result<Vec<Product>, RepositoryError> {
        let mut query = QueryBuilder::<Postgres>::new(PRODUCT_SELECT);
        query.push(" WHERE 1=1");

        if let Some(term) = filter.query.as_deref().filter(|t| !t.is_empty()) {
            let pattern = format!("%{}%", escape_like(term));
            query
                .push(" AND (p.name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR p.description ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(category) = filter.category {
            query.push(" AND p.category_id = ").push_bind(category);
        }
        if let Some(min) = filter.min_price {
            query.push(" AND p.price >= ").push_bind(min);
        }
        if let Some(max) = filter.max_price {
            query.push(" AND p.price <= ").push_bind(max);
        }

        query.push(order_clause(filter.sort));

        let products = query
            .build_query_as::<Product>()
            .fetch_all(self.pool)
            .await?;
        Ok(products)
    }
}

/// `ORDER BY` clause for a search sort order.
const fn order_clause(sort: Option<SortOrder>) -> &'static str {
    match sort {
        Some(SortOrder::PriceAsc) => " ORDER BY p.price ASC, p.id",
        Some(SortOrder::PriceDesc) => " ORDER BY p.price DESC, p.id",
        Some(SortOrder::Rating) => " ORDER BY p.rating DESC NULLS LAST, p.id",
        Some(SortOrder::Name) => " ORDER BY p.name ASC",
        None => " ORDER BY p.id",
    }
}

/// Escape `LIKE` wildcards so the search term matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let page = Pagination::new(0, 0);
        assert_eq!(page, Pagination { page: 1, limit: 10 });
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_pagination_offset() {
        assert_eq!(Pagination::new(3, 12).offset(), 24);
    }

    #[test]
    fn test_order_clause() {
        assert_eq!(order_clause(None), " ORDER BY p.id");
        assert!(order_clause(Some(SortOrder::PriceDesc)).contains("p.price DESC"));
        assert!(order_clause(Some(SortOrder::Rating)).contains("p.rating DESC"));
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("casque"), "casque");
    }
}
