//! Subscription service
//!
//! Toggling subscriptions and listing either side of the relation.

use crate::db::repositories::{SubscriptionRepository, UserRepository};
use crate::models::ChannelProfile;
use std::sync::Arc;
use thiserror::Error;

/// Subscription service errors
#[derive(Debug, Error)]
pub enum SubscriptionError {
    /// Channel does not exist
    #[error("Channel not found")]
    ChannelNotFound,

    /// Users cannot subscribe to themselves
    #[error("Cannot subscribe to your own channel")]
    SelfSubscription,

    /// Internal error (database, etc.)
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Subscription service
pub struct SubscriptionService {
    subscriptions: Arc<dyn SubscriptionRepository>,
    users: Arc<dyn UserRepository>,
}

impl SubscriptionService {
    /// Create a new subscription service
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            subscriptions,
            users,
        }
    }

    /// Toggle a subscription, returning whether the subscriber now
    /// follows the channel.
    pub async fn toggle(
        &self,
        subscriber_id: i64,
        channel_id: i64,
    ) -> Result<bool, SubscriptionError> {
        if subscriber_id == channel_id {
            return Err(SubscriptionError::SelfSubscription);
        }
        if !self.users.exists(channel_id).await? {
            return Err(SubscriptionError::ChannelNotFound);
        }

        let subscribed = self.subscriptions.toggle(subscriber_id, channel_id).await?;
        tracing::debug!(subscriber_id, channel_id, subscribed, "Subscription toggled");
        Ok(subscribed)
    }

    /// Whether a user follows a channel
    pub async fn is_subscribed(
        &self,
        subscriber_id: i64,
        channel_id: i64,
    ) -> Result<bool, SubscriptionError> {
        Ok(self
            .subscriptions
            .is_subscribed(subscriber_id, channel_id)
            .await?)
    }

    /// Subscriber count of a channel
    pub async fn subscriber_count(&self, channel_id: i64) -> Result<i64, SubscriptionError> {
        if !self.users.exists(channel_id).await? {
            return Err(SubscriptionError::ChannelNotFound);
        }
        Ok(self.subscriptions.count_subscribers(channel_id).await?)
    }

    /// Channels a user follows
    pub async fn subscribed_channels(
        &self,
        subscriber_id: i64,
    ) -> Result<Vec<ChannelProfile>, SubscriptionError> {
        Ok(self.subscriptions.subscribed_channels(subscriber_id).await?)
    }

    /// Subscribers of a channel
    pub async fn channel_subscribers(
        &self,
        channel_id: i64,
    ) -> Result<Vec<ChannelProfile>, SubscriptionError> {
        if !self.users.exists(channel_id).await? {
            return Err(SubscriptionError::ChannelNotFound);
        }
        Ok(self.subscriptions.channel_subscribers(channel_id).await?)
    }
}
