//! Video endpoints
//!
//! `GET /videos` is the feed entry point: with a `query` parameter it
//! runs the relevance-ranked search, without one it runs the
//! personalized four-source composition.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;

use super::middleware::{ApiError, AppState, AuthenticatedUser};
use super::responses::{ApiResponse, Created};
use crate::models::{
    CreateVideoInput, ListParams, PagedResult, SearchFilters, SortDirection, SortField,
    TimeWindow, UpdateVideoInput, Video,
};
use crate::services::FeedRequest;

/// Feed / search query parameters
#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    /// Search query; presence selects the search path
    pub query: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort_by: Option<SortField>,
    pub sort_direction: Option<SortDirection>,
    /// Upload-date window filter (week/month/year/alltime)
    pub upload_date: Option<String>,
    /// Maximum duration in seconds
    pub max_duration: Option<i64>,
    /// Restrict to one channel
    pub channel_id: Option<i64>,
}

/// GET /videos
pub async fn feed(
    State(state): State<AppState>,
    viewer: Option<Extension<AuthenticatedUser>>,
    Query(query): Query<FeedQuery>,
) -> Result<ApiResponse<Vec<Video>>, ApiError> {
    let viewer_id = viewer.map(|Extension(user)| user.0.id).unwrap_or(0);
    let params = ListParams::new(query.page.unwrap_or(1), query.limit.unwrap_or(10));

    let uploaded_after = match &query.upload_date {
        Some(raw) => {
            let window: TimeWindow = raw
                .parse()
                .map_err(|_| ApiError::bad_request(format!("Invalid upload date filter: {}", raw)))?;
            window.lower_bound(chrono::Utc::now())
        }
        None => None,
    };
    let filters = SearchFilters {
        uploaded_after,
        max_duration_secs: query.max_duration,
        channel_id: query.channel_id,
    };

    let request = FeedRequest::from_parts(
        viewer_id,
        query.query,
        params,
        filters,
        query.sort_by.unwrap_or_default(),
        query.sort_direction.unwrap_or_default(),
    );

    let videos = state.feed_service.compose(request).await?;
    Ok(ApiResponse::ok(videos))
}

/// Request body for publishing a video
#[derive(Debug, Deserialize)]
pub struct PublishVideoBody {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub video_url: String,
    #[serde(default)]
    pub thumbnail_url: String,
    pub duration_secs: i64,
    #[serde(default)]
    pub tags: Vec<String>,
    pub is_published: Option<bool>,
}

/// POST /videos
pub async fn publish(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(body): Json<PublishVideoBody>,
) -> Result<Created<Video>, ApiError> {
    let video = state
        .video_service
        .publish(CreateVideoInput {
            owner_id: user.0.id,
            title: body.title,
            description: body.description,
            video_url: body.video_url,
            thumbnail_url: body.thumbnail_url,
            duration_secs: body.duration_secs,
            tags: body.tags,
            is_published: body.is_published,
        })
        .await?;
    Ok(Created::new(video, "Video published"))
}

/// GET /videos/{id} (also mounted as POST /videos/{id}/view)
///
/// Counts a view and records watch history for signed-in viewers.
pub async fn watch(
    State(state): State<AppState>,
    viewer: Option<Extension<AuthenticatedUser>>,
    Path(id): Path<i64>,
) -> Result<ApiResponse<Video>, ApiError> {
    let viewer_id = viewer.map(|Extension(user)| user.0.id);
    let video = state.video_service.watch(id, viewer_id).await?;
    Ok(ApiResponse::ok(video))
}

/// Request body for updating a video
#[derive(Debug, Default, Deserialize)]
pub struct UpdateVideoBody {
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// PATCH /videos/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateVideoBody>,
) -> Result<ApiResponse<Video>, ApiError> {
    let video = state
        .video_service
        .update(
            id,
            user.0.id,
            UpdateVideoInput {
                title: body.title,
                description: body.description,
                thumbnail_url: body.thumbnail_url,
                tags: body.tags,
            },
        )
        .await?;
    Ok(ApiResponse::with_message(video, "Video updated"))
}

/// DELETE /videos/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<ApiResponse<()>, ApiError> {
    state.video_service.delete(id, user.0.id).await?;
    Ok(ApiResponse::with_message((), "Video deleted"))
}

/// PATCH /videos/{id}/toggle-publish
pub async fn toggle_publish(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<ApiResponse<bool>, ApiError> {
    let published = state.video_service.toggle_publish(id, user.0.id).await?;
    Ok(ApiResponse::with_message(published, "Publish state toggled"))
}

/// GET /videos/channel/{channel_id}
pub async fn list_by_channel(
    State(state): State<AppState>,
    Path(channel_id): Path<i64>,
    Query(query): Query<super::common::PaginationQuery>,
) -> Result<ApiResponse<PagedResult<Video>>, ApiError> {
    let params = query.to_params(10);
    let page = state
        .video_service
        .list_by_owner(channel_id, &params)
        .await?;
    Ok(ApiResponse::ok(page))
}
