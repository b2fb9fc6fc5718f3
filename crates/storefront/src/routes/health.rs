//! Health check handler.
//!
//! Unlike the other endpoints, failure here has its own body shape so
//! monitors can tell a database outage from a server outage.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use gaspass_core::catalog::Health;

use crate::db::StatsRepository;
use crate::state::AppState;

/// Body returned when the database cannot be reached.
#[derive(Debug, Serialize)]
pub struct HealthFailure {
    pub status: &'static str,
    pub database: &'static str,
    pub error: String,
}

/// Check database connectivity.
///
/// Returns 200 with the database server time, or 500 when the query fails.
pub async fn check(State(state): State<AppState>) -> Response {
    match StatsRepository::new(state.pool()).server_time().await {
        Ok(server_time) => Json(Health {
            status: "OK".to_string(),
            database: "Connected".to_string(),
            server_time,
            environment: state.config().environment.clone(),
        })
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(failure())).into_response()
        }
    }
}

fn failure() -> HealthFailure {
    HealthFailure {
        status: "ERROR",
        database: "Disconnected",
        error: "Database connection failed".to_string(),
    }
}
