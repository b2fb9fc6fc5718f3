//! Typed client for the Data Access API.
//!
//! Every call either yields the decoded body or an [`ApiError`]. Non-2xx
//! responses carry their status and the server's `error` message (or
//! `HTTP <status>` when the body has none); transport and decoding failures
//! are reported with status 0.

use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument, warn};
use url::Url;

use gaspass_core::catalog::{BlogPost, Category, Health, Product, Review, SortOrder, Stats};
use gaspass_core::{BlogPostId, CategoryId, ProductId, ReviewId};

/// Message used for every failure that never produced an HTTP status.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error or server unavailable";

/// Failure talking to the Data Access API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("API error {status}: {message}")]
pub struct ApiError {
    /// HTTP status, or 0 when no response was received.
    pub status: u16,
    pub message: String,
}

impl ApiError {
    /// Create an error for an HTTP response.
    #[must_use]
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// The error reported when the server could not be reached.
    #[must_use]
    pub fn network() -> Self {
        Self::new(0, NETWORK_ERROR_MESSAGE)
    }

    /// Whether no HTTP response was received.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        self.status == 0
    }

    /// Whether the server answered 404.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Filters for [`ApiClient::products`].
///
/// `category: None` lists every category.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub category: Option<CategoryId>,
    pub featured: bool,
}

/// Filters for [`ApiClient::search`].
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub category: Option<CategoryId>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub sort: Option<SortOrder>,
}

impl ProductQuery {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(category) = self.category {
            params.push(("category", category.to_string()));
        }
        if self.featured {
            params.push(("featured", "true".to_string()));
        }
        params
    }
}

impl SearchQuery {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(q) = self.q.as_deref().filter(|q| !q.is_empty()) {
            params.push(("q", q.to_string()));
        }
        if let Some(category) = self.category {
            params.push(("category", category.to_string()));
        }
        if let Some(min) = self.min_price {
            params.push(("min_price", min.to_string()));
        }
        if let Some(max) = self.max_price {
            params.push(("max_price", max.to_string()));
        }
        if let Some(sort) = self.sort {
            params.push(("sort", sort.as_str().to_string()));
        }
        params
    }
}

/// Data Access API client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client for the API rooted at `base_url`
    /// (e.g. `http://localhost:3000/api`).
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` if `base_url` is not an absolute
    /// hierarchical URL.
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase);
        }
        Ok(Self {
            client: Client::new(),
            base_url,
        })
    }

    /// The API base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// List products.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn products(&self, query: &ProductQuery) -> Result<Vec<Product>, ApiError> {
        self.get(&["products"], &query.params()).await
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` (status 404 for unknown products) if the request fails.
    #[instrument(skip(self))]
    pub async fn product(&self, id: ProductId) -> Result<Product, ApiError> {
        self.get(&["products", &id.to_string()], &[]).await
    }

    /// Featured products, best rated first.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn featured_products(&self) -> Result<Vec<Product>, ApiError> {
        self.get(&["products", "featured"], &[]).await
    }

    /// Search products.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<Product>, ApiError> {
        self.get(&["search", "products"], &query.params()).await
    }

    /// All categories.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        self.get(&["categories"], &[]).await
    }

    /// All reviews, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn reviews(&self) -> Result<Vec<Review>, ApiError> {
        self.get(&["reviews"], &[]).await
    }

    /// Get a review by ID.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn review(&self, id: ReviewId) -> Result<Review, ApiError> {
        self.get(&["reviews", &id.to_string()], &[]).await
    }

    /// Reviews for one product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn product_reviews(&self, id: ProductId) -> Result<Vec<Review>, ApiError> {
        self.get(&["products", &id.to_string(), "reviews"], &[])
            .await
    }

    /// All blog posts, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn blog_posts(&self) -> Result<Vec<BlogPost>, ApiError> {
        self.get(&["blogposts"], &[]).await
    }

    /// Get a blog post by ID.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn blog_post(&self, id: BlogPostId) -> Result<BlogPost, ApiError> {
        self.get(&["blogposts", &id.to_string()], &[]).await
    }

    /// Catalog counts.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn stats(&self) -> Result<Stats, ApiError> {
        self.get(&["stats"], &[]).await
    }

    /// Server and database health.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` (status 500 with the server's message) when the
    /// database is down.
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<Health, ApiError> {
        self.get(&["health"], &[]).await
    }

    /// Build `<base>/<segments...>?<params>`.
    fn endpoint(&self, segments: &[&str], params: &[(&str, String)]) -> Url {
        let mut url = self.base_url.clone();
        // cannot-be-a-base URLs are rejected in `new`
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        url
    }

    async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(segments, params);
        debug!(url = %url, "API request");

        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(error = %e, "API request failed");
            ApiError::network()
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            debug!(status = status.as_u16(), message = %message, "API error response");
            return Err(ApiError::new(status.as_u16(), message));
        }

        response.json::<T>().await.map_err(|e| {
            warn!(error = %e, "Failed to decode API response");
            ApiError::network()
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_segments() {
        let client = ApiClient::new("http://localhost:3000/api").unwrap();
        assert_eq!(
            client.endpoint(&["products", "7", "reviews"], &[]).as_str(),
            "http://localhost:3000/api/products/7/reviews"
        );

        let client = ApiClient::new("http://localhost:3000/api/").unwrap();
        assert_eq!(
            client.endpoint(&["stats"], &[]).as_str(),
            "http://localhost:3000/api/stats"
        );
    }

    #[test]
    fn test_product_query_params() {
        let query = ProductQuery {
            page: Some(2),
            limit: Some(12),
            category: Some(CategoryId::new(3)),
            featured: true,
        };
        let client = ApiClient::new("http://localhost:3000/api").unwrap();
        assert_eq!(
            client.endpoint(&["products"], &query.params()).as_str(),
            "http://localhost:3000/api/products?page=2&limit=12&category=3&featured=true"
        );
        assert!(ProductQuery::default().params().is_empty());
    }

    #[test]
    fn test_search_query_encodes_text() {
        let query = SearchQuery {
            q: Some("casque & micro".to_string()),
            max_price: Some(Decimal::new(50_000, 0)),
            sort: Some(SortOrder::PriceAsc),
            ..SearchQuery::default()
        };
        let client = ApiClient::new("http://localhost:3000/api").unwrap();
        assert_eq!(
            client.endpoint(&["search", "products"], &query.params()).as_str(),
            "http://localhost:3000/api/search/products?q=casque+%26+micro&max_price=50000&sort=price_asc"
        );
    }

    #[test]
    fn test_rejects_non_base_url() {
        assert!(ApiClient::new("mailto:shop@gaspass.shop").is_err());
        assert!(ApiClient::new("not a url").is_err());
    }

    #[test]
    fn test_network_error() {
        let err = ApiError::network();
        assert!(err.is_network());
        assert_eq!(err.message, "Network error or server unavailable");
        assert_eq!(err.to_string(), "API error 0: Network error or server unavailable");
    }
}
