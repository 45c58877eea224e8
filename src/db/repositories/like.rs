//! Like repository
//!
//! Database operations for likes on videos, comments and tweets. Each
//! like row references exactly one target, enforced by a table check
//! constraint.

use crate::models::LikeTarget;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Like repository trait
#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// Toggle a like, returning whether the target is now liked
    async fn toggle(&self, user_id: i64, target: LikeTarget) -> Result<bool>;

    /// Count likes on a target
    async fn count(&self, target: LikeTarget) -> Result<i64>;

    /// IDs of videos a user has liked, most recent first
    async fn liked_video_ids(&self, user_id: i64, limit: i64, offset: i64) -> Result<Vec<i64>>;
}

/// SQLx-based like repository implementation
pub struct SqlxLikeRepository {
    pool: SqlitePool,
}

impl SqlxLikeRepository {
    /// Create a new SQLx like repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn LikeRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl LikeRepository for SqlxLikeRepository {
    async fn toggle(&self, user_id: i64, target: LikeTarget) -> Result<bool> {
        let delete_sql = format!(
            "DELETE FROM likes WHERE user_id = ? AND {} = ?",
            target.column()
        );
        let deleted = sqlx::query(&delete_sql)
            .bind(user_id)
            .bind(target.id())
            .execute(&self.pool)
            .await
            .context("Failed to remove like")?;

        if deleted.rows_affected() > 0 {
            return Ok(false);
        }

        let insert_sql = format!(
            "INSERT INTO likes (user_id, {}) VALUES (?, ?)",
            target.column()
        );
        sqlx::query(&insert_sql)
            .bind(user_id)
            .bind(target.id())
            .execute(&self.pool)
            .await
            .context("Failed to add like")?;
        Ok(true)
    }

    async fn count(&self, target: LikeTarget) -> Result<i64> {
        let sql = format!(
            "SELECT COUNT(*) as count FROM likes WHERE {} = ?",
            target.column()
        );
        let row = sqlx::query(&sql)
            .bind(target.id())
            .fetch_one(&self.pool)
            .await
            .context("Failed to count likes")?;
        Ok(row.get("count"))
    }

    async fn liked_video_ids(&self, user_id: i64, limit: i64, offset: i64) -> Result<Vec<i64>> {
        let rows = sqlx::query(
            r#"
            SELECT video_id
            FROM likes
            WHERE user_id = ? AND video_id IS NOT NULL
            ORDER BY created_at DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list liked videos")?;

        Ok(rows.iter().map(|row| row.get("video_id")).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> (SqlitePool, SqlxLikeRepository) {
        let pool = create_test_pool().await.expect("Failed to create pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Migrations failed");
        sqlx::query("INSERT INTO users (username, email, password_hash) VALUES ('u', 'u@x.com', 'h')")
            .execute(&pool)
            .await
            .expect("Failed to insert user");
        sqlx::query(
            r#"
            INSERT INTO videos (owner_id, title, description, video_url, thumbnail_url, duration_secs)
            VALUES (1, 'V', '', 'u', 't', 60)
            "#,
        )
        .execute(&pool)
        .await
        .expect("Failed to insert video");
        (pool.clone(), SqlxLikeRepository::new(pool))
    }

    #[tokio::test]
    async fn test_toggle_video_like() {
        let (_pool, repo) = setup().await;

        assert!(repo
            .toggle(1, LikeTarget::Video(1))
            .await
            .expect("Toggle failed"));
        assert_eq!(
            repo.count(LikeTarget::Video(1)).await.expect("Count failed"),
            1
        );
        assert_eq!(
            repo.liked_video_ids(1, 10, 0).await.expect("List failed"),
            vec![1]
        );

        assert!(!repo
            .toggle(1, LikeTarget::Video(1))
            .await
            .expect("Toggle failed"));
        assert_eq!(
            repo.count(LikeTarget::Video(1)).await.expect("Count failed"),
            0
        );
    }

    #[tokio::test]
    async fn test_tweet_like_independent_of_video_like() {
        let (pool, repo) = setup().await;
        sqlx::query("INSERT INTO tweets (owner_id, content) VALUES (1, 'hello')")
            .execute(&pool)
            .await
            .expect("Failed to insert tweet");

        repo.toggle(1, LikeTarget::Video(1)).await.expect("Toggle failed");
        repo.toggle(1, LikeTarget::Tweet(1)).await.expect("Toggle failed");

        assert_eq!(
            repo.count(LikeTarget::Video(1)).await.expect("Count failed"),
            1
        );
        assert_eq!(
            repo.count(LikeTarget::Tweet(1)).await.expect("Count failed"),
            1
        );
    }
}
