//! Channel dashboard endpoints
//!
//! Stats and video listings for the authenticated channel owner.

use axum::{
    extract::{Query, State},
    Extension,
};
use serde::Deserialize;

use super::middleware::{ApiError, AppState, AuthenticatedUser};
use super::responses::ApiResponse;
use crate::models::{ListParams, PagedResult, TimeWindow, Video};
use crate::services::ChannelStatsSummary;

/// Default page size for dashboard stats
const DEFAULT_STATS_LIMIT: u32 = 5;

/// Dashboard stats query parameters
#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// Upload time window (week/month/year/alltime)
    pub upload_time: Option<String>,
    /// Cap on how many videos enter the aggregation
    pub video_count: Option<i64>,
}

/// GET /dashboard/stats
pub async fn stats(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<StatsQuery>,
) -> Result<ApiResponse<ChannelStatsSummary>, ApiError> {
    let window = match &query.upload_time {
        Some(raw) => Some(
            raw.parse::<TimeWindow>()
                .map_err(|_| ApiError::bad_request(format!("Invalid time window: {}", raw)))?,
        ),
        None => None,
    };
    let params = ListParams::new(
        query.page.unwrap_or(1),
        query.limit.unwrap_or(DEFAULT_STATS_LIMIT),
    );

    let summary = state
        .analytics_service
        .channel_stats(user.0.id, &params, window, query.video_count)
        .await?;
    Ok(ApiResponse::ok(summary))
}

/// GET /dashboard/videos
pub async fn videos(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<super::common::PaginationQuery>,
) -> Result<ApiResponse<PagedResult<Video>>, ApiError> {
    let params = query.to_params(10);
    let page = state.video_service.list_by_owner(user.0.id, &params).await?;
    Ok(ApiResponse::ok(page))
}
