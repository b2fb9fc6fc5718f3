//! Blog route handlers.

use axum::{
    Json,
    extract::{Path, State},
};

use gaspass_core::BlogPostId;
use gaspass_core::catalog::BlogPost;

use super::parse_param;
use crate::db::BlogPostRepository;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// All blog posts, newest first.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<BlogPost>>> {
    let posts = BlogPostRepository::new(state.pool()).list().await?;
    Ok(Json(posts))
}

/// Blog post detail.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BlogPost>> {
    let id: BlogPostId = parse_param(&id, "blog post id")?;
    BlogPostRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Blog post not found"))
}
