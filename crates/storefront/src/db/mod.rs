//! Database operations for the catalog `PostgreSQL` database.
//!
//! # Database: `gaspass`
//!
//! ## Tables
//!
//! - `category` - Product categories
//! - `product` - Catalog products (price, stock, featured flag)
//! - `review` - Customer reviews, optionally attached to a product
//! - `blog_category`, `blog_post`, `tag`, `post_tag` - Blog content
//!
//! All repositories are read-only; the catalog is maintained outside the API.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p gaspass-cli -- migrate
//! ```

pub mod blog_posts;
pub mod categories;
pub mod products;
pub mod reviews;
pub mod stats;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use blog_posts::BlogPostRepository;
pub use categories::CategoryRepository;
pub use products::{Pagination, ProductFilter, ProductRepository, SearchFilter};
pub use reviews::ReviewRepository;
pub use stats::StatsRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
