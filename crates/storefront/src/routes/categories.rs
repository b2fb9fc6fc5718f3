//! Category route handlers.

use axum::{Json, extract::State};

use gaspass_core::catalog::Category;

use crate::db::CategoryRepository;
use crate::error::Result;
use crate::state::AppState;

/// All categories, by name.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    let categories = CategoryRepository::new(state.pool()).list().await?;
    Ok(Json(categories))
}
