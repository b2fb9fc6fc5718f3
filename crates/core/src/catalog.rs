//! Catalog models served by the storefront API.
//!
//! These are the JSON shapes of the public `/api` endpoints. The server
//! decodes them straight from query rows (with the `postgres` feature) and
//! the client deserializes them from responses, so both sides share one
//! definition.
//!
//! Optional fields are skipped when absent: several endpoints select a
//! narrower column set than others (e.g. `/products/featured` has no
//! `featured` column, only `/reviews/:id` joins the product name).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{BlogPostId, CategoryId, Price, ProductId, ReviewId};

/// A product as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub description: String,
    pub image: String,
    /// Category ID, serialized as `category` on the wire.
    pub category: CategoryId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "postgres", sqlx(default))]
    pub rating: Option<Decimal>,
    pub stock: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "postgres", sqlx(default))]
    pub featured: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "postgres", sqlx(default))]
    pub category_name: Option<String>,
}

impl Product {
    /// Units available for purchase. Negative stock counts as sold out.
    #[must_use]
    pub fn available_stock(&self) -> u32 {
        u32::try_from(self.stock).unwrap_or(0)
    }

    /// Whether at least one unit can be added to a cart.
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Display name of the category, falling back to the numeric ID.
    #[must_use]
    pub fn category_label(&self) -> String {
        self.category_name
            .clone()
            .unwrap_or_else(|| self.category.to_string())
    }
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A customer review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Review {
    pub id: ReviewId,
    pub author: String,
    #[serde(default)]
    pub avatar: Option<String>,
    pub rating: i32,
    pub text: String,
    /// Formatted as `DD Mon YYYY` by the database.
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "postgres", sqlx(default))]
    pub product_id: Option<ProductId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "postgres", sqlx(default))]
    pub product_name: Option<String>,
}

/// A blog post with its aggregated tag names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct BlogPost {
    pub id: BlogPostId,
    pub title: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    /// Formatted as `DD Mon YYYY HH24:MI` by the database.
    pub date: String,
    pub image: String,
    #[serde(default)]
    pub image_caption: Option<String>,
    pub author: String,
    pub content: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub likes: Option<i32>,
    #[serde(default)]
    pub comments: Option<i32>,
    #[serde(default)]
    pub reading_time: Option<i32>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Row counts returned by `/stats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub products: i64,
    pub categories: i64,
    pub reviews: i64,
}

/// Response body of a successful `/health` check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub database: String,
    pub server_time: DateTime<Utc>,
    pub environment: String,
}

/// Sort orders accepted by `/search/products`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    PriceAsc,
    PriceDesc,
    Rating,
    Name,
}

impl SortOrder {
    /// Query-string value for this sort order.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
            Self::Rating => "rating",
            Self::Name => "name",
        }
    }

    /// Parse a query-string value. Unknown values yield `None`, which the
    /// API treats as "order by id".
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "price_asc" => Some(Self::PriceAsc),
            "price_desc" => Some(Self::PriceDesc),
            "rating" => Some(Self::Rating),
            "name" => Some(Self::Name),
            _ => None,
        }
    }
}

/// Category filter accepted by `/products` and `/search/products`.
///
/// The literal `All` disables filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Only(CategoryId),
}

impl CategoryFilter {
    /// Parse a query-string value.
    ///
    /// # Errors
    ///
    /// Returns the parse error when the value is neither `All` nor an integer.
    pub fn parse(value: &str) -> Result<Self, core::num::ParseIntError> {
        if value == "All" {
            return Ok(Self::All);
        }
        value.parse().map(Self::Only)
    }

    /// The category to filter on, if any.
    #[must_use]
    pub const fn category(&self) -> Option<CategoryId> {
        match self {
            Self::All => None,
            Self::Only(id) => Some(*id),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_from_api_json() {
        let json = r#"{
            "id": 3,
            "name": "Casque audio",
            "price": "45000.00",
            "description": "Sans fil",
            "image": "casque.png",
            "category": 2,
            "rating": "4.5",
            "stock": 4,
            "featured": true,
            "category_name": "Audio"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(3));
        assert_eq!(product.price, Price::from(45_000));
        assert_eq!(product.available_stock(), 4);
        assert_eq!(product.category_label(), "Audio");
    }

    #[test]
    fn test_featured_product_without_optional_columns() {
        let json = r#"{"id":1,"name":"n","price":10,"description":"d","image":"i","category":5,"stock":-2}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.featured.is_none());
        assert!(!product.in_stock());
        assert_eq!(product.available_stock(), 0);
        assert_eq!(product.category_label(), "5");

        let back = serde_json::to_value(&product).unwrap();
        assert!(back.get("featured").is_none());
    }

    #[test]
    fn test_blog_post_uses_camel_case() {
        let json = r#"{
            "id": 8, "title": "Tendances", "date": "15 Mar 2023 10:00",
            "image": "x.jpg", "imageCaption": "legende", "author": "Equipe",
            "content": "...", "readingTime": 4, "tags": ["tech"]
        }"#;
        let post: BlogPost = serde_json::from_str(json).unwrap();
        assert_eq!(post.image_caption.as_deref(), Some("legende"));
        assert_eq!(post.reading_time, Some(4));
        assert_eq!(post.tags, vec!["tech".to_owned()]);
    }

    #[test]
    fn test_sort_order_round_trip() {
        for sort in [
            SortOrder::PriceAsc,
            SortOrder::PriceDesc,
            SortOrder::Rating,
            SortOrder::Name,
        ] {
            assert_eq!(SortOrder::parse(sort.as_str()), Some(sort));
        }
        assert_eq!(SortOrder::parse("newest"), None);
    }

    #[test]
    fn test_category_filter() {
        assert_eq!(CategoryFilter::parse("All").unwrap(), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::parse("4").unwrap().category(),
            Some(CategoryId::new(4))
        );
        assert!(CategoryFilter::parse("audio").is_err());
    }
}
