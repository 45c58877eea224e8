//! Comment service
//!
//! Comments on videos, with ownership checks for edits and deletes.

use crate::db::repositories::{CommentRepository, VideoRepository};
use crate::models::{Comment, CreateCommentInput, ListParams, PagedResult};
use std::sync::Arc;
use thiserror::Error;

/// Comment service errors
#[derive(Debug, Error)]
pub enum CommentError {
    /// Comment not found
    #[error("Comment not found")]
    NotFound,

    /// Video not found
    #[error("Video not found")]
    VideoNotFound,

    /// Caller does not own the comment
    #[error("Not the owner of this comment")]
    Forbidden,

    /// Input validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal error (database, etc.)
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Comment service
pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    videos: Arc<dyn VideoRepository>,
}

impl CommentService {
    /// Create a new comment service
    pub fn new(comments: Arc<dyn CommentRepository>, videos: Arc<dyn VideoRepository>) -> Self {
        Self { comments, videos }
    }

    /// Add a comment to a video
    pub async fn add(&self, input: CreateCommentInput) -> Result<Comment, CommentError> {
        if input.content.trim().is_empty() {
            return Err(CommentError::Validation("Content is required".to_string()));
        }
        if self.videos.get_by_id(input.video_id).await?.is_none() {
            return Err(CommentError::VideoNotFound);
        }
        Ok(self.comments.create(&input).await?)
    }

    /// Comments on a video, newest first
    pub async fn list_for_video(
        &self,
        video_id: i64,
        params: &ListParams,
    ) -> Result<PagedResult<Comment>, CommentError> {
        if self.videos.get_by_id(video_id).await?.is_none() {
            return Err(CommentError::VideoNotFound);
        }

        let (items, total) = tokio::try_join!(
            self.comments
                .list_by_video(video_id, params.limit(), params.offset()),
            self.comments.count_by_video(video_id),
        )?;
        // An empty page reads as "no comments found", not a valid
        // empty listing.
        if items.is_empty() {
            return Err(CommentError::NotFound);
        }
        Ok(PagedResult::new(items, total, params))
    }

    /// Edit a comment's content. Only the author may edit.
    pub async fn update(
        &self,
        id: i64,
        caller_id: i64,
        content: &str,
    ) -> Result<Comment, CommentError> {
        if content.trim().is_empty() {
            return Err(CommentError::Validation("Content is required".to_string()));
        }
        let existing = self
            .comments
            .get_by_id(id)
            .await?
            .ok_or(CommentError::NotFound)?;
        if existing.owner_id != caller_id {
            return Err(CommentError::Forbidden);
        }

        self.comments
            .update(id, content)
            .await?
            .ok_or(CommentError::NotFound)
    }

    /// Delete a comment. Only the author may delete.
    pub async fn delete(&self, id: i64, caller_id: i64) -> Result<(), CommentError> {
        let existing = self
            .comments
            .get_by_id(id)
            .await?
            .ok_or(CommentError::NotFound)?;
        if existing.owner_id != caller_id {
            return Err(CommentError::Forbidden);
        }

        self.comments.delete(id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxCommentRepository, SqlxVideoRepository};
    use crate::db::{create_test_pool, migrations};
    use sqlx::SqlitePool;

    async fn setup() -> (SqlitePool, CommentService) {
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
        sqlx::query(
            r#"
            INSERT INTO videos (owner_id, title, description, video_url, thumbnail_url, duration_secs)
            VALUES (1, 'V', '', 'u', 't', 60)
            "#,
        )
        .execute(&pool)
        .await
        .expect("Failed to insert video");
        let service = CommentService::new(
            SqlxCommentRepository::boxed(pool.clone()),
            SqlxVideoRepository::boxed(pool.clone()),
        );
        (pool, service)
    }

    fn input(content: &str) -> CreateCommentInput {
        CreateCommentInput {
            video_id: 1,
            owner_id: 1,
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_add_and_list() {
        let (_pool, service) = setup().await;
        service.add(input("first")).await.expect("Add failed");
        service.add(input("second")).await.expect("Add failed");

        let page = service
            .list_for_video(1, &ListParams::default())
            .await
            .expect("List failed");
        assert_eq!(page.total, 2);
        assert_eq!(page.items[0].content, "second");
    }

    #[tokio::test]
    async fn test_list_without_comments_is_not_found() {
        let (_pool, service) = setup().await;
        assert!(matches!(
            service.list_for_video(1, &ListParams::default()).await,
            Err(CommentError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_add_to_missing_video_rejected() {
        let (_pool, service) = setup().await;
        let mut bad = input("hello");
        bad.video_id = 99;
        assert!(matches!(
            service.add(bad).await,
            Err(CommentError::VideoNotFound)
        ));
    }

    #[tokio::test]
    async fn test_only_author_may_edit_or_delete() {
        let (_pool, service) = setup().await;
        let comment = service.add(input("mine")).await.expect("Add failed");

        assert!(matches!(
            service.update(comment.id, 2, "stolen").await,
            Err(CommentError::Forbidden)
        ));
        assert!(matches!(
            service.delete(comment.id, 2).await,
            Err(CommentError::Forbidden)
        ));

        let edited = service
            .update(comment.id, 1, "edited")
            .await
            .expect("Update failed");
        assert_eq!(edited.content, "edited");
        service.delete(comment.id, 1).await.expect("Delete failed");
    }
}
