//! User account and channel endpoints

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use super::middleware::{ApiError, AppState, AuthenticatedUser, SessionToken};
use super::responses::{ApiResponse, Created, LoginResponse, UserResponse};
use crate::models::CreateUserInput;

/// Request body for registration
#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub avatar_url: Option<String>,
    pub cover_image_url: Option<String>,
}

/// POST /users/register
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> Result<Created<UserResponse>, ApiError> {
    let user = state
        .user_service
        .register(CreateUserInput {
            username: body.username,
            email: body.email,
            full_name: body.full_name,
            password: body.password,
            avatar_url: body.avatar_url,
            cover_image_url: body.cover_image_url,
        })
        .await?;
    Ok(Created::new(user.into(), "User registered"))
}

/// Request body for login
#[derive(Debug, Deserialize)]
pub struct LoginBody {
    /// Username or email address
    pub identifier: String,
    pub password: String,
}

/// POST /users/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<ApiResponse<LoginResponse>, ApiError> {
    let (user, session) = state
        .user_service
        .login(&body.identifier, &body.password)
        .await?;
    Ok(ApiResponse::with_message(
        LoginResponse {
            user: user.into(),
            token: session.id,
        },
        "Logged in",
    ))
}

/// POST /users/logout
pub async fn logout(
    State(state): State<AppState>,
    Extension(token): Extension<SessionToken>,
) -> Result<ApiResponse<()>, ApiError> {
    state.user_service.logout(&token.0).await?;
    Ok(ApiResponse::with_message((), "Logged out"))
}

/// GET /users/me
pub async fn me(
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<ApiResponse<UserResponse>, ApiError> {
    Ok(ApiResponse::ok(user.0.into()))
}

/// GET /users/history
pub async fn watch_history(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<super::common::PaginationQuery>,
) -> Result<ApiResponse<Vec<i64>>, ApiError> {
    let params = query.to_params(20);
    let ids = state
        .user_service
        .watch_history(user.0.id, params.limit(), params.offset())
        .await?;
    Ok(ApiResponse::ok(ids))
}

/// POST /users/history/{video_id}
pub async fn record_watch(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(video_id): Path<i64>,
) -> Result<ApiResponse<()>, ApiError> {
    // 404 for a dangling video id instead of a foreign-key error.
    state.video_service.get(video_id).await?;
    state.user_service.record_watch(user.0.id, video_id).await?;
    Ok(ApiResponse::with_message((), "Watch recorded"))
}

/// DELETE /users/history
pub async fn clear_watch_history(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<ApiResponse<()>, ApiError> {
    state.user_service.clear_watch_history(user.0.id).await?;
    Ok(ApiResponse::with_message((), "Watch history cleared"))
}

/// Public channel page: profile, subscriber count and whether the
/// current viewer follows the channel.
#[derive(Debug, Serialize)]
pub struct ChannelResponse {
    pub user: UserResponse,
    pub subscriber_count: i64,
    pub is_subscribed: bool,
}

/// GET /users/{username}/channel
pub async fn channel(
    State(state): State<AppState>,
    viewer: Option<Extension<AuthenticatedUser>>,
    Path(username): Path<String>,
) -> Result<ApiResponse<ChannelResponse>, ApiError> {
    let user = state.user_service.get_by_username(&username).await?;
    let subscriber_count = state.subscription_service.subscriber_count(user.id).await?;
    let is_subscribed = match viewer {
        Some(Extension(viewer)) => {
            state
                .subscription_service
                .is_subscribed(viewer.0.id, user.id)
                .await?
        }
        None => false,
    };

    Ok(ApiResponse::ok(ChannelResponse {
        user: user.into(),
        subscriber_count,
        is_subscribed,
    }))
}
