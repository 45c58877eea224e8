//! Subscription repository
//!
//! Database operations for channel subscriptions.

use crate::models::ChannelProfile;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Subscription repository trait
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Toggle a subscription, returning whether the subscriber now
    /// follows the channel.
    async fn toggle(&self, subscriber_id: i64, channel_id: i64) -> Result<bool>;

    /// Check whether a subscription exists
    async fn is_subscribed(&self, subscriber_id: i64, channel_id: i64) -> Result<bool>;

    /// Count subscribers of a channel
    async fn count_subscribers(&self, channel_id: i64) -> Result<i64>;

    /// Channels a user is subscribed to
    async fn subscribed_channels(&self, subscriber_id: i64) -> Result<Vec<ChannelProfile>>;

    /// Subscribers of a channel
    async fn channel_subscribers(&self, channel_id: i64) -> Result<Vec<ChannelProfile>>;
}

/// SQLx-based subscription repository implementation
pub struct SqlxSubscriptionRepository {
    pool: SqlitePool,
}

impl SqlxSubscriptionRepository {
    /// Create a new SQLx subscription repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn SubscriptionRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl SubscriptionRepository for SqlxSubscriptionRepository {
    async fn toggle(&self, subscriber_id: i64, channel_id: i64) -> Result<bool> {
        let deleted = sqlx::query(
            "DELETE FROM subscriptions WHERE subscriber_id = ? AND channel_id = ?",
        )
        .bind(subscriber_id)
        .bind(channel_id)
        .execute(&self.pool)
        .await
        .context("Failed to remove subscription")?;

        if deleted.rows_affected() > 0 {
            return Ok(false);
        }

        sqlx::query("INSERT INTO subscriptions (subscriber_id, channel_id) VALUES (?, ?)")
            .bind(subscriber_id)
            .bind(channel_id)
            .execute(&self.pool)
            .await
            .context("Failed to add subscription")?;
        Ok(true)
    }

    async fn is_subscribed(&self, subscriber_id: i64, channel_id: i64) -> Result<bool> {
        let row = sqlx::query(
            "SELECT COUNT(*) as count FROM subscriptions WHERE subscriber_id = ? AND channel_id = ?",
        )
        .bind(subscriber_id)
        .bind(channel_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to check subscription")?;
        let count: i64 = row.get("count");
        Ok(count > 0)
    }

    async fn count_subscribers(&self, channel_id: i64) -> Result<i64> {
        let row = sqlx::query(
            "SELECT COUNT(*) as count FROM subscriptions WHERE channel_id = ?",
        )
        .bind(channel_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to count subscribers")?;
        Ok(row.get("count"))
    }

    async fn subscribed_channels(&self, subscriber_id: i64) -> Result<Vec<ChannelProfile>> {
        let rows = sqlx::query(
            r#"
            SELECT u.id, u.username, u.full_name, u.avatar_url
            FROM subscriptions s
            JOIN users u ON u.id = s.channel_id
            WHERE s.subscriber_id = ?
            ORDER BY s.created_at DESC
            "#,
        )
        .bind(subscriber_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list subscribed channels")?;

        Ok(rows.iter().map(row_to_profile).collect())
    }

    async fn channel_subscribers(&self, channel_id: i64) -> Result<Vec<ChannelProfile>> {
        let rows = sqlx::query(
            r#"
            SELECT u.id, u.username, u.full_name, u.avatar_url
            FROM subscriptions s
            JOIN users u ON u.id = s.subscriber_id
            WHERE s.channel_id = ?
            ORDER BY s.created_at DESC
            "#,
        )
        .bind(channel_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list channel subscribers")?;

        Ok(rows.iter().map(row_to_profile).collect())
    }
}

fn row_to_profile(row: &sqlx::sqlite::SqliteRow) -> ChannelProfile {
    ChannelProfile {
        id: row.get("id"),
        username: row.get("username"),
        full_name: row.get("full_name"),
        avatar_url: row.try_get("avatar_url").ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> (SqlitePool, SqlxSubscriptionRepository) {
        let pool = create_test_pool().await.expect("Failed to create pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Migrations failed");
        for name in ["alice", "bob"] {
            sqlx::query("INSERT INTO users (username, email, password_hash) VALUES (?, ?, 'h')")
                .bind(name)
                .bind(format!("{}@example.com", name))
                .execute(&pool)
                .await
                .expect("Failed to insert user");
        }
        (pool.clone(), SqlxSubscriptionRepository::new(pool))
    }

    #[tokio::test]
    async fn test_toggle_round_trip() {
        let (_pool, repo) = setup().await;

        assert!(repo.toggle(1, 2).await.expect("Toggle failed"));
        assert!(repo.is_subscribed(1, 2).await.expect("Check failed"));
        assert_eq!(repo.count_subscribers(2).await.expect("Count failed"), 1);

        assert!(!repo.toggle(1, 2).await.expect("Toggle failed"));
        assert!(!repo.is_subscribed(1, 2).await.expect("Check failed"));
        assert_eq!(repo.count_subscribers(2).await.expect("Count failed"), 0);
    }

    #[tokio::test]
    async fn test_profile_lists() {
        let (_pool, repo) = setup().await;
        repo.toggle(1, 2).await.expect("Toggle failed");

        let channels = repo.subscribed_channels(1).await.expect("List failed");
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].username, "bob");

        let subs = repo.channel_subscribers(2).await.expect("List failed");
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].username, "alice");
    }
}
