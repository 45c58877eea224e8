//! Like service
//!
//! Toggling likes on videos, comments and tweets, and listing a user's
//! liked videos.

use crate::db::repositories::{
    CommentRepository, LikeRepository, TweetRepository, VideoRepository,
};
use crate::models::{LikeTarget, Video};
use std::sync::Arc;
use thiserror::Error;

/// Like service errors
#[derive(Debug, Error)]
pub enum LikeError {
    /// The liked entity does not exist
    #[error("Target not found")]
    TargetNotFound,

    /// Internal error (database, etc.)
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Like service
pub struct LikeService {
    likes: Arc<dyn LikeRepository>,
    videos: Arc<dyn VideoRepository>,
    comments: Arc<dyn CommentRepository>,
    tweets: Arc<dyn TweetRepository>,
}

impl LikeService {
    /// Create a new like service
    pub fn new(
        likes: Arc<dyn LikeRepository>,
        videos: Arc<dyn VideoRepository>,
        comments: Arc<dyn CommentRepository>,
        tweets: Arc<dyn TweetRepository>,
    ) -> Self {
        Self {
            likes,
            videos,
            comments,
            tweets,
        }
    }

    async fn target_exists(&self, target: LikeTarget) -> Result<bool, LikeError> {
        let exists = match target {
            LikeTarget::Video(id) => self.videos.get_by_id(id).await?.is_some(),
            LikeTarget::Comment(id) => self.comments.get_by_id(id).await?.is_some(),
            LikeTarget::Tweet(id) => self.tweets.get_by_id(id).await?.is_some(),
        };
        Ok(exists)
    }

    /// Toggle a like, returning whether the target is now liked
    pub async fn toggle(&self, user_id: i64, target: LikeTarget) -> Result<bool, LikeError> {
        if !self.target_exists(target).await? {
            return Err(LikeError::TargetNotFound);
        }
        Ok(self.likes.toggle(user_id, target).await?)
    }

    /// Like count on a target
    pub async fn count(&self, target: LikeTarget) -> Result<i64, LikeError> {
        Ok(self.likes.count(target).await?)
    }

    /// Videos the user has liked, most recent like first. Videos
    /// deleted since the like are skipped.
    pub async fn liked_videos(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Video>, LikeError> {
        let ids = self.likes.liked_video_ids(user_id, limit, offset).await?;
        let mut videos = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(video) = self.videos.get_by_id(id).await? {
                videos.push(video);
            }
        }
        Ok(videos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{
        SqlxCommentRepository, SqlxLikeRepository, SqlxTweetRepository, SqlxVideoRepository,
    };
    use crate::db::{create_test_pool, migrations};
    use sqlx::SqlitePool;

    async fn setup() -> (SqlitePool, LikeService) {
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
        let service = LikeService::new(
            SqlxLikeRepository::boxed(pool.clone()),
            SqlxVideoRepository::boxed(pool.clone()),
            SqlxCommentRepository::boxed(pool.clone()),
            SqlxTweetRepository::boxed(pool.clone()),
        );
        (pool, service)
    }

    #[tokio::test]
    async fn test_toggle_and_liked_videos() {
        let (_pool, service) = setup().await;

        assert!(service
            .toggle(1, LikeTarget::Video(1))
            .await
            .expect("Toggle failed"));
        let liked = service.liked_videos(1, 10, 0).await.expect("List failed");
        assert_eq!(liked.len(), 1);
        assert_eq!(liked[0].id, 1);

        assert!(!service
            .toggle(1, LikeTarget::Video(1))
            .await
            .expect("Toggle failed"));
        assert!(service
            .liked_videos(1, 10, 0)
            .await
            .expect("List failed")
            .is_empty());
    }

    #[tokio::test]
    async fn test_missing_target_rejected() {
        let (_pool, service) = setup().await;
        assert!(matches!(
            service.toggle(1, LikeTarget::Comment(42)).await,
            Err(LikeError::TargetNotFound)
        ));
    }
}
