//! Tweet (community post) endpoints

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;

use super::middleware::{ApiError, AppState, AuthenticatedUser};
use super::responses::{ApiResponse, Created};
use crate::models::{CreateTweetInput, Tweet, UpdateTweetInput};

/// Request body for posting a tweet
#[derive(Debug, Deserialize)]
pub struct CreateTweetBody {
    pub content: String,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
}

/// POST /tweets
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(body): Json<CreateTweetBody>,
) -> Result<Created<Tweet>, ApiError> {
    let tweet = state
        .tweet_service
        .create(CreateTweetInput {
            owner_id: user.0.id,
            content: body.content,
            image_url: body.image_url,
            video_url: body.video_url,
        })
        .await?;
    Ok(Created::new(tweet, "Tweet posted"))
}

/// GET /tweets/user/{user_id}
pub async fn list_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<super::common::PaginationQuery>,
) -> Result<ApiResponse<Vec<Tweet>>, ApiError> {
    let params = query.to_params(10);
    let tweets = state
        .tweet_service
        .list_for_user(user_id, params.limit(), params.offset())
        .await?;
    Ok(ApiResponse::ok(tweets))
}

/// Request body for editing a tweet
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTweetBody {
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
}

/// PATCH /tweets/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateTweetBody>,
) -> Result<ApiResponse<Tweet>, ApiError> {
    let tweet = state
        .tweet_service
        .update(
            id,
            user.0.id,
            UpdateTweetInput {
                content: body.content,
                image_url: body.image_url,
                video_url: body.video_url,
            },
        )
        .await?;
    Ok(ApiResponse::with_message(tweet, "Tweet updated"))
}

/// DELETE /tweets/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<ApiResponse<()>, ApiError> {
    state.tweet_service.delete(id, user.0.id).await?;
    Ok(ApiResponse::with_message((), "Tweet deleted"))
}
