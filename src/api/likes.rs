//! Like endpoints
//!
//! One toggle route per target kind; counts live on the same paths.

use axum::{
    extract::{Path, Query, State},
    Extension,
};
use serde::Serialize;

use super::middleware::{ApiError, AppState, AuthenticatedUser};
use super::responses::ApiResponse;
use crate::models::{LikeTarget, Video};

/// Toggle outcome: the new liked state plus the current count
#[derive(Debug, Serialize)]
pub struct LikeToggleResponse {
    pub liked: bool,
    pub like_count: i64,
}

async fn toggle(
    state: &AppState,
    user_id: i64,
    target: LikeTarget,
) -> Result<ApiResponse<LikeToggleResponse>, ApiError> {
    let liked = state.like_service.toggle(user_id, target).await?;
    let like_count = state.like_service.count(target).await?;
    Ok(ApiResponse::ok(LikeToggleResponse { liked, like_count }))
}

/// POST /likes/toggle/video/{id}
pub async fn toggle_video(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<ApiResponse<LikeToggleResponse>, ApiError> {
    toggle(&state, user.0.id, LikeTarget::Video(id)).await
}

/// POST /likes/toggle/comment/{id}
pub async fn toggle_comment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<ApiResponse<LikeToggleResponse>, ApiError> {
    toggle(&state, user.0.id, LikeTarget::Comment(id)).await
}

/// POST /likes/toggle/tweet/{id}
pub async fn toggle_tweet(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<ApiResponse<LikeToggleResponse>, ApiError> {
    toggle(&state, user.0.id, LikeTarget::Tweet(id)).await
}

/// GET /likes/videos
pub async fn liked_videos(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<super::common::PaginationQuery>,
) -> Result<ApiResponse<Vec<Video>>, ApiError> {
    let params = query.to_params(10);
    let videos = state
        .like_service
        .liked_videos(user.0.id, params.limit(), params.offset())
        .await?;
    Ok(ApiResponse::ok(videos))
}
