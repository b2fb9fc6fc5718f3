//! Catalog statistics handler.

use axum::{Json, extract::State};

use gaspass_core::catalog::Stats;

use crate::db::StatsRepository;
use crate::error::Result;
use crate::state::AppState;

/// Counts of products, categories and reviews.
pub async fn show(State(state): State<AppState>) -> Result<Json<Stats>> {
    let stats = StatsRepository::new(state.pool()).counts().await?;
    Ok(Json(stats))
}
