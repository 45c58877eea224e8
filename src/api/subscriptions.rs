//! Subscription endpoints

use axum::{
    extract::{Path, State},
    Extension,
};
use serde::Serialize;

use super::middleware::{ApiError, AppState, AuthenticatedUser};
use super::responses::ApiResponse;
use crate::models::ChannelProfile;

/// Toggle outcome: whether the caller now follows the channel
#[derive(Debug, Serialize)]
pub struct SubscriptionToggleResponse {
    pub subscribed: bool,
    pub subscriber_count: i64,
}

/// POST /subscriptions/c/{channel_id}
pub async fn toggle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(channel_id): Path<i64>,
) -> Result<ApiResponse<SubscriptionToggleResponse>, ApiError> {
    let subscribed = state
        .subscription_service
        .toggle(user.0.id, channel_id)
        .await?;
    let subscriber_count = state
        .subscription_service
        .subscriber_count(channel_id)
        .await?;
    Ok(ApiResponse::ok(SubscriptionToggleResponse {
        subscribed,
        subscriber_count,
    }))
}

/// GET /subscriptions/u/{subscriber_id}
pub async fn subscribed_channels(
    State(state): State<AppState>,
    Path(subscriber_id): Path<i64>,
) -> Result<ApiResponse<Vec<ChannelProfile>>, ApiError> {
    let channels = state
        .subscription_service
        .subscribed_channels(subscriber_id)
        .await?;
    Ok(ApiResponse::ok(channels))
}

/// GET /subscriptions/c/{channel_id}
pub async fn channel_subscribers(
    State(state): State<AppState>,
    Path(channel_id): Path<i64>,
) -> Result<ApiResponse<Vec<ChannelProfile>>, ApiError> {
    let subscribers = state
        .subscription_service
        .channel_subscribers(channel_id)
        .await?;
    Ok(ApiResponse::ok(subscribers))
}
