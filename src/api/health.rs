//! Health check endpoint

use axum::extract::State;
use serde::Serialize;

use super::middleware::{ApiError, AppState};
use super::responses::ApiResponse;
use crate::db;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

/// GET /healthcheck
pub async fn healthcheck(
    State(state): State<AppState>,
) -> Result<ApiResponse<HealthStatus>, ApiError> {
    db::ping(&state.pool).await.map_err(ApiError::internal)?;
    Ok(ApiResponse::with_message(
        HealthStatus { status: "ok" },
        "Service is healthy",
    ))
}
