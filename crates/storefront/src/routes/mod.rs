//! HTTP route handlers for the Data Access API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /api/products                   - Product listing (page, limit, category, featured)
//! GET  /api/products/featured          - Featured products, best rated first
//! GET  /api/products/{id}              - Product detail
//! GET  /api/products/{id}/reviews      - Reviews for one product
//! GET  /api/categories                 - Category listing
//! GET  /api/reviews                    - All reviews, newest first
//! GET  /api/reviews/{id}               - Review detail
//! GET  /api/search/products            - Search (q, category, min_price, max_price, sort)
//! GET  /api/blogposts                  - Blog posts, newest first
//! GET  /api/blogposts/{id}             - Blog post detail
//! GET  /api/stats                      - Catalog counts
//! GET  /api/health                     - Database connectivity check
//! ```
//!
//! Anything else answers 404 with `{"error": "Route not found"}`.

pub mod blog;
pub mod categories;
pub mod health;
pub mod products;
pub mod reviews;
pub mod search;
pub mod stats;

use std::str::FromStr;

use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::get};

use crate::error::{AppError, ErrorBody};
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/featured", get(products::featured))
        .route("/{id}", get(products::show))
        .route("/{id}/reviews", get(reviews::for_product))
}

/// Create the review routes router.
pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(reviews::index))
        .route("/{id}", get(reviews::show))
}

/// Create the blog routes router.
pub fn blog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(blog::index))
        .route("/{id}", get(blog::show))
}

/// Create all `/api` routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .route("/categories", get(categories::index))
        .nest("/reviews", review_routes())
        .route("/search/products", get(search::products))
        .nest("/blogposts", blog_routes())
        .route("/stats", get(stats::show))
        .route("/health", get(health::check))
}

/// Create the full router: `/api` plus the JSON 404 fallback.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api", api_routes())
        .fallback(not_found)
}

/// Fallback for unknown routes.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: "Route not found".to_string(),
        }),
    )
}

/// Parse a path or query value, mapping failures to a 400 naming the field.
pub(crate) fn parse_param<T: FromStr>(value: &str, field: &str) -> Result<T, AppError> {
    value
        .parse()
        .map_err(|_| AppError::bad_request(format!("Invalid {field}: {value}")))
}

/// Parse an optional query value; blank values count as absent.
pub(crate) fn parse_optional<T: FromStr>(
    value: Option<&str>,
    field: &str,
) -> Result<Option<T>, AppError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| parse_param(v, field))
        .transpose()
}
