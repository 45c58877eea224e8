//! Tweet service
//!
//! Short channel posts, with ownership checks for edits and deletes.

use crate::db::repositories::{TweetRepository, UserRepository};
use crate::models::{CreateTweetInput, Tweet, UpdateTweetInput};
use std::sync::Arc;
use thiserror::Error;

/// Tweet service errors
#[derive(Debug, Error)]
pub enum TweetError {
    /// Tweet not found
    #[error("Tweet not found")]
    NotFound,

    /// User not found
    #[error("User not found")]
    UserNotFound,

    /// Caller does not own the tweet
    #[error("Not the owner of this tweet")]
    Forbidden,

    /// Input validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal error (database, etc.)
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Tweet service
pub struct TweetService {
    tweets: Arc<dyn TweetRepository>,
    users: Arc<dyn UserRepository>,
}

impl TweetService {
    /// Create a new tweet service
    pub fn new(tweets: Arc<dyn TweetRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { tweets, users }
    }

    /// Create a tweet
    pub async fn create(&self, input: CreateTweetInput) -> Result<Tweet, TweetError> {
        if input.content.trim().is_empty() {
            return Err(TweetError::Validation("Content is required".to_string()));
        }
        Ok(self.tweets.create(&input).await?)
    }

    /// A user's tweets, newest first
    pub async fn list_for_user(
        &self,
        owner_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Tweet>, TweetError> {
        if !self.users.exists(owner_id).await? {
            return Err(TweetError::UserNotFound);
        }
        Ok(self.tweets.list_by_owner(owner_id, limit, offset).await?)
    }

    /// Edit a tweet. Only the author may edit.
    pub async fn update(
        &self,
        id: i64,
        caller_id: i64,
        input: UpdateTweetInput,
    ) -> Result<Tweet, TweetError> {
        if matches!(&input.content, Some(c) if c.trim().is_empty()) {
            return Err(TweetError::Validation("Content must not be blank".to_string()));
        }
        let existing = self.tweets.get_by_id(id).await?.ok_or(TweetError::NotFound)?;
        if existing.owner_id != caller_id {
            return Err(TweetError::Forbidden);
        }

        self.tweets.update(id, &input).await?.ok_or(TweetError::NotFound)
    }

    /// Delete a tweet. Only the author may delete.
    pub async fn delete(&self, id: i64, caller_id: i64) -> Result<(), TweetError> {
        let existing = self.tweets.get_by_id(id).await?.ok_or(TweetError::NotFound)?;
        if existing.owner_id != caller_id {
            return Err(TweetError::Forbidden);
        }

        self.tweets.delete(id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxTweetRepository, SqlxUserRepository};
    use crate::db::{create_test_pool, migrations};
    use sqlx::SqlitePool;

    async fn setup() -> (SqlitePool, TweetService) {
        let pool = create_test_pool().await.expect("Failed to create pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Migrations failed");
        for name in ["author", "other"] {
            sqlx::query("INSERT INTO users (username, email, password_hash) VALUES (?, ?, 'h')")
                .bind(name)
                .bind(format!("{}@example.com", name))
                .execute(&pool)
                .await
                .expect("Failed to insert user");
        }
        let service = TweetService::new(
            SqlxTweetRepository::boxed(pool.clone()),
            SqlxUserRepository::boxed(pool.clone()),
        );
        (pool, service)
    }

    fn input(content: &str) -> CreateTweetInput {
        CreateTweetInput {
            owner_id: 1,
            content: content.to_string(),
            image_url: None,
            video_url: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let (_pool, service) = setup().await;
        service.create(input("hello")).await.expect("Create failed");

        let tweets = service.list_for_user(1, 10, 0).await.expect("List failed");
        assert_eq!(tweets.len(), 1);

        assert!(matches!(
            service.list_for_user(99, 10, 0).await,
            Err(TweetError::UserNotFound)
        ));
    }

    #[tokio::test]
    async fn test_blank_content_rejected() {
        let (_pool, service) = setup().await;
        assert!(matches!(
            service.create(input("   ")).await,
            Err(TweetError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_ownership_enforced() {
        let (_pool, service) = setup().await;
        let tweet = service.create(input("mine")).await.expect("Create failed");

        assert!(matches!(
            service
                .update(
                    tweet.id,
                    2,
                    UpdateTweetInput {
                        content: Some("stolen".to_string()),
                        ..Default::default()
                    },
                )
                .await,
            Err(TweetError::Forbidden)
        ));
        assert!(matches!(
            service.delete(tweet.id, 2).await,
            Err(TweetError::Forbidden)
        ));
        service.delete(tweet.id, 1).await.expect("Delete failed");
    }
}
