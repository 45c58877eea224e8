//! Comment endpoints

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;

use super::middleware::{ApiError, AppState, AuthenticatedUser};
use super::responses::{ApiResponse, Created};
use crate::models::{Comment, CreateCommentInput, PagedResult};

/// Request body for posting a comment
#[derive(Debug, Deserialize)]
pub struct CreateCommentBody {
    pub content: String,
}

/// POST /comments/{video_id}
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(video_id): Path<i64>,
    Json(body): Json<CreateCommentBody>,
) -> Result<Created<Comment>, ApiError> {
    let comment = state
        .comment_service
        .add(CreateCommentInput {
            video_id,
            owner_id: user.0.id,
            content: body.content,
        })
        .await?;
    Ok(Created::new(comment, "Comment posted"))
}

/// GET /comments/{video_id}
pub async fn list_for_video(
    State(state): State<AppState>,
    Path(video_id): Path<i64>,
    Query(query): Query<super::common::PaginationQuery>,
) -> Result<ApiResponse<PagedResult<Comment>>, ApiError> {
    let params = query.to_params(10);
    let page = state.comment_service.list_for_video(video_id, &params).await?;
    Ok(ApiResponse::ok(page))
}

/// Request body for editing a comment
#[derive(Debug, Deserialize)]
pub struct UpdateCommentBody {
    pub content: String,
}

/// PATCH /comments/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateCommentBody>,
) -> Result<ApiResponse<Comment>, ApiError> {
    let comment = state
        .comment_service
        .update(id, user.0.id, &body.content)
        .await?;
    Ok(ApiResponse::with_message(comment, "Comment updated"))
}

/// DELETE /comments/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<ApiResponse<()>, ApiError> {
    state.comment_service.delete(id, user.0.id).await?;
    Ok(ApiResponse::with_message((), "Comment deleted"))
}
