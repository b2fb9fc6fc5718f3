//! Review route handlers.

use axum::{
    Json,
    extract::{Path, State},
};

use gaspass_core::catalog::Review;
use gaspass_core::{ProductId, ReviewId};

use super::parse_param;
use crate::db::ReviewRepository;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// All reviews, newest first.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Review>>> {
    let reviews = ReviewRepository::new(state.pool()).list().await?;
    Ok(Json(reviews))
}

/// Reviews attached to one product. Unknown products yield an empty list.
pub async fn for_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Review>>> {
    let id: ProductId = parse_param(&id, "product id")?;
    let reviews = ReviewRepository::new(state.pool()).for_product(id).await?;
    Ok(Json(reviews))
}

/// Review detail, including the reviewed product's name.
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Review>> {
    let id: ReviewId = parse_param(&id, "review id")?;
    ReviewRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Review not found"))
}
