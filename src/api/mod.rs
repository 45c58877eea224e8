//! API layer - HTTP handlers and routing
//!
//! This module contains all HTTP API endpoints for the vidtube backend:
//! - User/auth endpoints (register, login, sessions, channel pages)
//! - Video endpoints (feed/search, watch, publish, manage)
//! - Dashboard endpoints (channel stats, owner listings)
//! - Comment, like, subscription, tweet and playlist endpoints
//! - Health check

pub mod comments;
pub mod common;
pub mod dashboard;
pub mod health;
pub mod likes;
pub mod middleware;
pub mod playlists;
pub mod responses;
pub mod subscriptions;
pub mod tweets;
pub mod users;
pub mod videos;

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use middleware::{ApiError, AppState, AuthenticatedUser, SessionToken};
pub use responses::ApiResponse;

/// Build the main API router
pub fn build_api_router(state: AppState) -> Router<AppState> {
    // Routes that behave differently for signed-in viewers but never
    // require a session.
    let viewer_routes = Router::new()
        .route("/videos", get(videos::feed))
        .route("/videos/{id}", get(videos::watch))
        .route("/videos/{id}/view", post(videos::watch))
        .route("/users/{username}/channel", get(users::channel))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::optional_auth,
        ));

    // Routes that require a valid session
    let protected_routes = Router::new()
        .route("/users/logout", post(users::logout))
        .route("/users/me", get(users::me))
        .route("/users/history", get(users::watch_history))
        .route("/users/history", delete(users::clear_watch_history))
        .route("/users/history/{video_id}", post(users::record_watch))
        .route("/videos", post(videos::publish))
        .route("/videos/{id}", patch(videos::update))
        .route("/videos/{id}", delete(videos::delete))
        .route("/videos/{id}/toggle-publish", patch(videos::toggle_publish))
        .route("/dashboard/stats", get(dashboard::stats))
        .route("/dashboard/videos", get(dashboard::videos))
        // Same position as /comments/{id} below, so the param name
        // must match even though it holds a video id here.
        .route("/comments/{id}", post(comments::create))
        .route("/comments/{id}", patch(comments::update))
        .route("/comments/{id}", delete(comments::delete))
        .route("/likes/toggle/v/{video_id}", post(likes::toggle_video))
        .route("/likes/toggle/c/{comment_id}", post(likes::toggle_comment))
        .route("/likes/toggle/t/{tweet_id}", post(likes::toggle_tweet))
        .route("/likes/videos", get(likes::liked_videos))
        .route("/subscriptions/c/{channel_id}", post(subscriptions::toggle))
        .route("/tweets", post(tweets::create))
        .route("/tweets/{id}", patch(tweets::update))
        .route("/tweets/{id}", delete(tweets::delete))
        .route("/playlists", post(playlists::create))
        .route("/playlists/{id}", patch(playlists::update))
        .route("/playlists/{id}", delete(playlists::delete))
        .route(
            "/playlists/add/{video_id}/{playlist_id}",
            patch(playlists::add_video),
        )
        .route(
            "/playlists/remove/{video_id}/{playlist_id}",
            patch(playlists::remove_video),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    // Public routes
    Router::new()
        .route("/healthcheck", get(health::healthcheck))
        .route("/users/register", post(users::register))
        .route("/users/login", post(users::login))
        .route("/videos/channel/{channel_id}", get(videos::list_by_channel))
        .route("/comments/{id}", get(comments::list_for_video))
        .route(
            "/subscriptions/c/{channel_id}",
            get(subscriptions::channel_subscribers),
        )
        .route(
            "/subscriptions/u/{subscriber_id}",
            get(subscriptions::subscribed_channels),
        )
        .route("/tweets/user/{user_id}", get(tweets::list_for_user))
        .route("/playlists/{id}", get(playlists::get))
        .route("/playlists/user/{user_id}", get(playlists::list_for_user))
        .merge(viewer_routes)
        .merge(protected_routes)
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, cors_origin: &str) -> anyhow::Result<Router> {
    let cors = CorsLayer::new()
        .allow_origin(cors_origin.parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::COOKIE])
        .allow_credentials(true);

    Ok(Router::new()
        .nest("/api/v1", build_api_router(state.clone()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}
