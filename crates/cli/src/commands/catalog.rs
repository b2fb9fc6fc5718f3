//! Catalog browsing commands backed by the Data Access API.
//!
//! # Environment Variables
//!
//! - `GASPASS_API_URL` - API base URL (default: `http://localhost:3000/api`)

use gaspass_client::{ApiClient, ProductQuery, SearchQuery};
use gaspass_core::{BlogPostId, CategoryId, ProductId, ReviewId};

use super::{api_client, client_config};
use crate::output;

type Result = std::result::Result<(), Box<dyn std::error::Error>>;

fn api() -> std::result::Result<ApiClient, Box<dyn std::error::Error>> {
    api_client(&client_config()?)
}

/// List products.
pub async fn list_products(
    page: Option<u32>,
    limit: Option<u32>,
    category: Option<CategoryId>,
    featured: bool,
) -> Result {
    let query = ProductQuery {
        page,
        limit,
        category,
        featured,
    };
    let products = api()?.products(&query).await?;
    output::print(&output::products_table(&products));
    Ok(())
}

/// List featured products.
pub async fn featured_products() -> Result {
    let products = api()?.featured_products().await?;
    output::print(&output::products_table(&products));
    Ok(())
}

/// Show one product.
pub async fn show_product(id: ProductId) -> Result {
    let product = api()?.product(id).await?;
    output::print(&output::product_detail(&product));
    Ok(())
}

/// Show a product's reviews.
pub async fn product_reviews(id: ProductId) -> Result {
    let reviews = api()?.product_reviews(id).await?;
    output::print(&output::reviews_table(&reviews));
    Ok(())
}

/// Search products.
pub async fn search_products(query: &SearchQuery) -> Result {
    let products = api()?.search(query).await?;
    output::print(&output::products_table(&products));
    Ok(())
}

/// List categories.
pub async fn categories() -> Result {
    let categories = api()?.categories().await?;
    output::print(&output::categories_table(&categories));
    Ok(())
}

/// List all reviews.
pub async fn reviews() -> Result {
    let reviews = api()?.reviews().await?;
    output::print(&output::reviews_table(&reviews));
    Ok(())
}

/// Show one review.
pub async fn show_review(id: ReviewId) -> Result {
    let review = api()?.review(id).await?;
    output::print(&output::review_detail(&review));
    Ok(())
}

/// List blog posts.
pub async fn blog_posts() -> Result {
    let posts = api()?.blog_posts().await?;
    output::print(&output::blog_posts_table(&posts));
    Ok(())
}

/// Show one blog post.
pub async fn show_blog_post(id: BlogPostId) -> Result {
    let post = api()?.blog_post(id).await?;
    output::print(&output::blog_post_detail(&post));
    Ok(())
}

/// Show catalog counts.
pub async fn stats() -> Result {
    let stats = api()?.stats().await?;
    output::print(&output::stats_detail(&stats));
    Ok(())
}

/// Check API and database health.
pub async fn health() -> Result {
    let health = api()?.health().await?;
    output::print(&output::health_detail(&health));
    Ok(())
}
