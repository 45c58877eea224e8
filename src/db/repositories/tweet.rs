//! Tweet repository
//!
//! Database operations for channel posts ("tweets").

use crate::models::{CreateTweetInput, Tweet, UpdateTweetInput};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Tweet repository trait
#[async_trait]
pub trait TweetRepository: Send + Sync {
    /// Create a tweet
    async fn create(&self, input: &CreateTweetInput) -> Result<Tweet>;

    /// Get tweet by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Tweet>>;

    /// A user's tweets, newest first
    async fn list_by_owner(&self, owner_id: i64, limit: i64, offset: i64) -> Result<Vec<Tweet>>;

    /// Update a tweet, returning the updated tweet if it exists
    async fn update(&self, id: i64, input: &UpdateTweetInput) -> Result<Option<Tweet>>;

    /// Delete a tweet, returning whether it existed
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// SQLx-based tweet repository implementation
pub struct SqlxTweetRepository {
    pool: SqlitePool,
}

impl SqlxTweetRepository {
    /// Create a new SQLx tweet repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn TweetRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl TweetRepository for SqlxTweetRepository {
    async fn create(&self, input: &CreateTweetInput) -> Result<Tweet> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO tweets (owner_id, content, image_url, video_url, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(input.owner_id)
        .bind(&input.content)
        .bind(&input.image_url)
        .bind(&input.video_url)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create tweet")?;

        Ok(Tweet {
            id: result.last_insert_rowid(),
            owner_id: input.owner_id,
            content: input.content.clone(),
            image_url: input.image_url.clone(),
            video_url: input.video_url.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Tweet>> {
        let row = sqlx::query(
            "SELECT id, owner_id, content, image_url, video_url, created_at, updated_at FROM tweets WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get tweet")?;

        Ok(row.map(|row| row_to_tweet(&row)))
    }

    async fn list_by_owner(&self, owner_id: i64, limit: i64, offset: i64) -> Result<Vec<Tweet>> {
        let rows = sqlx::query(
            r#"
            SELECT id, owner_id, content, image_url, video_url, created_at, updated_at
            FROM tweets
            WHERE owner_id = ?
            ORDER BY created_at DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(owner_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list tweets")?;

        Ok(rows.iter().map(row_to_tweet).collect())
    }

    async fn update(&self, id: i64, input: &UpdateTweetInput) -> Result<Option<Tweet>> {
        let result = sqlx::query(
            r#"
            UPDATE tweets
            SET content = COALESCE(?, content),
                image_url = COALESCE(?, image_url),
                video_url = COALESCE(?, video_url),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&input.content)
        .bind(&input.image_url)
        .bind(&input.video_url)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to update tweet")?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tweets WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete tweet")?;
        Ok(result.rows_affected() > 0)
    }
}

fn row_to_tweet(row: &sqlx::sqlite::SqliteRow) -> Tweet {
    Tweet {
        id: row.get("id"),
        owner_id: row.get("owner_id"),
        content: row.get("content"),
        image_url: row.try_get("image_url").ok(),
        video_url: row.try_get("video_url").ok(),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> SqlxTweetRepository {
        let pool = create_test_pool().await.expect("Failed to create pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Migrations failed");
        sqlx::query("INSERT INTO users (username, email, password_hash) VALUES ('u', 'u@x.com', 'h')")
            .execute(&pool)
            .await
            .expect("Failed to insert user");
        SqlxTweetRepository::new(pool)
    }

    #[tokio::test]
    async fn test_create_update_delete() {
        let repo = setup().await;
        let tweet = repo
            .create(&CreateTweetInput {
                owner_id: 1,
                content: "hello".to_string(),
                image_url: None,
                video_url: None,
            })
            .await
            .expect("Create failed");

        let updated = repo
            .update(
                tweet.id,
                &UpdateTweetInput {
                    content: Some("edited".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("Update failed")
            .expect("Tweet should exist");
        assert_eq!(updated.content, "edited");

        assert!(repo.delete(tweet.id).await.expect("Delete failed"));
        assert!(repo
            .get_by_id(tweet.id)
            .await
            .expect("Get failed")
            .is_none());
    }

    #[tokio::test]
    async fn test_update_media_keeps_untouched_fields() {
        let repo = setup().await;
        let tweet = repo
            .create(&CreateTweetInput {
                owner_id: 1,
                content: "hello".to_string(),
                image_url: Some("old.png".to_string()),
                video_url: None,
            })
            .await
            .expect("Create failed");

        let updated = repo
            .update(
                tweet.id,
                &UpdateTweetInput {
                    image_url: Some("new.png".to_string()),
                    video_url: Some("clip.mp4".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("Update failed")
            .expect("Tweet should exist");
        assert_eq!(updated.content, "hello");
        assert_eq!(updated.image_url.as_deref(), Some("new.png"));
        assert_eq!(updated.video_url.as_deref(), Some("clip.mp4"));
    }
}
