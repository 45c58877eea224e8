//! Watch history repository
//!
//! Records what a user watched and derives the tag set used for feed
//! tag-affinity matching.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Watch history repository trait
#[async_trait]
pub trait WatchHistoryRepository: Send + Sync {
    /// Record that a user watched a video
    async fn record(&self, user_id: i64, video_id: i64) -> Result<()>;

    /// Distinct tags of videos the user watched at or after `since`
    async fn tags_watched_since(
        &self,
        user_id: i64,
        since: DateTime<Utc>,
    ) -> Result<Vec<String>>;

    /// Video IDs in the user's history, most recently watched first
    async fn watched_video_ids(&self, user_id: i64, limit: i64, offset: i64) -> Result<Vec<i64>>;

    /// Clear a user's history
    async fn clear(&self, user_id: i64) -> Result<()>;
}

/// SQLx-based watch history repository implementation
pub struct SqlxWatchHistoryRepository {
    pool: SqlitePool,
}

impl SqlxWatchHistoryRepository {
    /// Create a new SQLx watch history repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn WatchHistoryRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl WatchHistoryRepository for SqlxWatchHistoryRepository {
    async fn record(&self, user_id: i64, video_id: i64) -> Result<()> {
        // Re-watching bumps the entry to the top instead of duplicating it.
        sqlx::query(
            r#"
            INSERT INTO watch_history (user_id, video_id, watched_at)
            VALUES (?, ?, ?)
            ON CONFLICT (user_id, video_id) DO UPDATE SET watched_at = excluded.watched_at
            "#,
        )
        .bind(user_id)
        .bind(video_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .context("Failed to record watch history")?;
        Ok(())
    }

    async fn tags_watched_since(
        &self,
        user_id: i64,
        since: DateTime<Utc>,
    ) -> Result<Vec<String>> {
        let rows = sqlx::query(
            r#"
            SELECT DISTINCT t.tag
            FROM watch_history h
            JOIN video_tags t ON t.video_id = h.video_id
            WHERE h.user_id = ? AND h.watched_at >= ?
            ORDER BY t.tag
            "#,
        )
        .bind(user_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .context("Failed to collect watched tags")?;

        Ok(rows.iter().map(|row| row.get("tag")).collect())
    }

    async fn watched_video_ids(&self, user_id: i64, limit: i64, offset: i64) -> Result<Vec<i64>> {
        let rows = sqlx::query(
            r#"
            SELECT video_id
            FROM watch_history
            WHERE user_id = ?
            ORDER BY watched_at DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list watch history")?;

        Ok(rows.iter().map(|row| row.get("video_id")).collect())
    }

    async fn clear(&self, user_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM watch_history WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .context("Failed to clear watch history")?;
        Ok(())
    }
}
