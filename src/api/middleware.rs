//! API middleware
//!
//! Application state, the API error type and session authentication.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::cache::Cache;
use crate::db::repositories::{
    SqlxCommentRepository, SqlxLikeRepository, SqlxPlaylistRepository, SqlxSessionRepository,
    SqlxSubscriptionRepository, SqlxTweetRepository, SqlxUserRepository, SqlxVideoRepository,
    SqlxWatchHistoryRepository,
};
use crate::models::User;
use crate::services::{
    AnalyticsError, AnalyticsService, CommentError, CommentService, FeedError, FeedService,
    LikeError, LikeService, PlaylistError, PlaylistService, SubscriptionError,
    SubscriptionService, TweetError, TweetService, UserError, UserService, VideoError,
    VideoService,
};

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub cache: Arc<Cache>,
    pub user_service: Arc<UserService>,
    pub video_service: Arc<VideoService>,
    pub feed_service: Arc<FeedService>,
    pub analytics_service: Arc<AnalyticsService>,
    pub subscription_service: Arc<SubscriptionService>,
    pub like_service: Arc<LikeService>,
    pub comment_service: Arc<CommentService>,
    pub tweet_service: Arc<TweetService>,
    pub playlist_service: Arc<PlaylistService>,
}

impl AppState {
    /// Wire services and repositories over a pool and cache
    pub fn build(pool: SqlitePool, cache: Arc<Cache>) -> Self {
        let users = SqlxUserRepository::boxed(pool.clone());
        let sessions = SqlxSessionRepository::boxed(pool.clone());
        let videos = SqlxVideoRepository::boxed(pool.clone());
        let watch_history = SqlxWatchHistoryRepository::boxed(pool.clone());
        let subscriptions = SqlxSubscriptionRepository::boxed(pool.clone());
        let likes = SqlxLikeRepository::boxed(pool.clone());
        let comments = SqlxCommentRepository::boxed(pool.clone());
        let tweets = SqlxTweetRepository::boxed(pool.clone());
        let playlists = SqlxPlaylistRepository::boxed(pool.clone());

        Self {
            user_service: Arc::new(UserService::new(
                users.clone(),
                sessions,
                watch_history.clone(),
            )),
            video_service: Arc::new(VideoService::new(
                videos.clone(),
                watch_history.clone(),
                cache.clone(),
            )),
            feed_service: Arc::new(FeedService::new(videos.clone(), watch_history)),
            analytics_service: Arc::new(AnalyticsService::new(
                videos.clone(),
                subscriptions.clone(),
            )),
            subscription_service: Arc::new(SubscriptionService::new(
                subscriptions,
                users.clone(),
            )),
            like_service: Arc::new(LikeService::new(
                likes,
                videos.clone(),
                comments.clone(),
                tweets.clone(),
            )),
            comment_service: Arc::new(CommentService::new(comments, videos.clone())),
            tweet_service: Arc::new(TweetService::new(tweets, users)),
            playlist_service: Arc::new(PlaylistService::new(playlists, videos)),
            pool,
            cache,
        }
    }
}

/// Authenticated user extracted from request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

/// Session token that authenticated the current request
#[derive(Debug, Clone)]
pub struct SessionToken(pub String);

/// API error: a status code plus the standard error body.
///
/// Every error serializes as `{"success": false, "message": ..., "errors": []}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
    errors: Vec<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    /// Log the cause and return a generic 500; internals never leak.
    pub fn internal(cause: impl std::fmt::Display) -> Self {
        tracing::error!(error = %cause, "Internal error");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            message: self.message,
            errors: Vec::new(),
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound => ApiError::not_found("User not found"),
            UserError::AlreadyExists => ApiError::conflict("Username or email already taken"),
            UserError::InvalidCredentials => ApiError::unauthorized("Invalid credentials"),
            UserError::InvalidSession => ApiError::unauthorized("Invalid or expired session"),
            UserError::Validation(message) => ApiError::bad_request(message),
            UserError::Internal(cause) => ApiError::internal(cause),
        }
    }
}

impl From<VideoError> for ApiError {
    fn from(err: VideoError) -> Self {
        match err {
            VideoError::NotFound => ApiError::not_found("Video not found"),
            VideoError::Forbidden => ApiError::forbidden("Not the owner of this video"),
            VideoError::Validation(message) => ApiError::bad_request(message),
            VideoError::Internal(cause) => ApiError::internal(cause),
        }
    }
}

impl From<FeedError> for ApiError {
    fn from(err: FeedError) -> Self {
        match err {
            FeedError::NoResults => ApiError::not_found("No videos matched the search"),
            FeedError::Internal(cause) => ApiError::internal(cause),
        }
    }
}

impl From<AnalyticsError> for ApiError {
    fn from(err: AnalyticsError) -> Self {
        match err {
            AnalyticsError::InvalidChannel => ApiError::bad_request("Invalid channel id"),
            AnalyticsError::Internal(cause) => ApiError::internal(cause),
        }
    }
}

impl From<SubscriptionError> for ApiError {
    fn from(err: SubscriptionError) -> Self {
        match err {
            SubscriptionError::ChannelNotFound => ApiError::not_found("Channel not found"),
            SubscriptionError::SelfSubscription => {
                ApiError::bad_request("Cannot subscribe to your own channel")
            }
            SubscriptionError::Internal(cause) => ApiError::internal(cause),
        }
    }
}

impl From<LikeError> for ApiError {
    fn from(err: LikeError) -> Self {
        match err {
            LikeError::TargetNotFound => ApiError::not_found("Target not found"),
            LikeError::Internal(cause) => ApiError::internal(cause),
        }
    }
}

impl From<CommentError> for ApiError {
    fn from(err: CommentError) -> Self {
        match err {
            CommentError::NotFound => ApiError::not_found("Comment not found"),
            CommentError::VideoNotFound => ApiError::not_found("Video not found"),
            CommentError::Forbidden => ApiError::forbidden("Not the owner of this comment"),
            CommentError::Validation(message) => ApiError::bad_request(message),
            CommentError::Internal(cause) => ApiError::internal(cause),
        }
    }
}

impl From<TweetError> for ApiError {
    fn from(err: TweetError) -> Self {
        match err {
            TweetError::NotFound => ApiError::not_found("Tweet not found"),
            TweetError::UserNotFound => ApiError::not_found("User not found"),
            TweetError::Forbidden => ApiError::forbidden("Not the owner of this tweet"),
            TweetError::Validation(message) => ApiError::bad_request(message),
            TweetError::Internal(cause) => ApiError::internal(cause),
        }
    }
}

impl From<PlaylistError> for ApiError {
    fn from(err: PlaylistError) -> Self {
        match err {
            PlaylistError::NotFound => ApiError::not_found("Playlist not found"),
            PlaylistError::VideoNotFound => ApiError::not_found("Video not found"),
            PlaylistError::Forbidden => ApiError::forbidden("Not the owner of this playlist"),
            PlaylistError::Validation(message) => ApiError::bad_request(message),
            PlaylistError::Internal(cause) => ApiError::internal(cause),
        }
    }
}

/// Extract session token from the Authorization header or session cookie
fn extract_session_token(request: &Request) -> Option<String> {
    if let Some(auth_header) = request.headers().get(header::AUTHORIZATION) {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                return Some(token.to_string());
            }
        }
    }

    if let Some(cookie_header) = request.headers().get(header::COOKIE) {
        if let Ok(cookie_str) = cookie_header.to_str() {
            for cookie in cookie_str.split(';') {
                if let Some(token) = cookie.trim().strip_prefix("session=") {
                    return Some(token.to_string());
                }
            }
        }
    }

    None
}

/// Authentication middleware
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_session_token(&request)
        .ok_or_else(|| ApiError::unauthorized("Missing authentication token"))?;

    let user = state.user_service.authenticate(&token).await?;

    request.extensions_mut().insert(AuthenticatedUser(user));
    request.extensions_mut().insert(SessionToken(token));
    Ok(next.run(request).await)
}

/// Optional authentication middleware: attaches the user when a valid
/// session is present, passes through anonymously otherwise.
pub async fn optional_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = extract_session_token(&request) {
        if let Ok(user) = state.user_service.authenticate(&token).await {
            request.extensions_mut().insert(AuthenticatedUser(user));
        }
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_extract_token_from_bearer() {
        let request = Request::builder()
            .uri("/test")
            .header(header::AUTHORIZATION, "Bearer token-123")
            .body(Body::empty())
            .unwrap();
        assert_eq!(
            extract_session_token(&request),
            Some("token-123".to_string())
        );
    }

    #[test]
    fn test_extract_token_from_cookie() {
        let request = Request::builder()
            .uri("/test")
            .header(header::COOKIE, "theme=dark; session=token-456")
            .body(Body::empty())
            .unwrap();
        assert_eq!(
            extract_session_token(&request),
            Some("token-456".to_string())
        );
    }

    #[test]
    fn test_bearer_takes_priority_over_cookie() {
        let request = Request::builder()
            .uri("/test")
            .header(header::AUTHORIZATION, "Bearer bearer-token")
            .header(header::COOKIE, "session=cookie-token")
            .body(Body::empty())
            .unwrap();
        assert_eq!(
            extract_session_token(&request),
            Some("bearer-token".to_string())
        );
    }

    #[test]
    fn test_no_token() {
        let request = Request::builder()
            .uri("/test")
            .body(Body::empty())
            .unwrap();
        assert!(extract_session_token(&request).is_none());
    }

    #[test]
    fn test_error_mapping_statuses() {
        assert_eq!(
            ApiError::from(FeedError::NoResults).status,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(AnalyticsError::InvalidChannel).status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(UserError::InvalidCredentials).status,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(VideoError::Forbidden).status,
            StatusCode::FORBIDDEN
        );
    }
}
