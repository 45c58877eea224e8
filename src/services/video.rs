//! Video service
//!
//! Video CRUD with ownership checks, view counting and watch-history
//! recording. Individual video lookups go through the cache; any
//! mutation invalidates the cached entry.

use crate::cache::Cache;
use crate::db::repositories::{VideoRepository, WatchHistoryRepository};
use crate::models::{CreateVideoInput, ListParams, PagedResult, UpdateVideoInput, Video};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// TTL for cached video entries
const VIDEO_CACHE_TTL: Duration = Duration::from_secs(300);

/// Video service errors
#[derive(Debug, Error)]
pub enum VideoError {
    /// Video not found (or not visible to the caller)
    #[error("Video not found")]
    NotFound,

    /// Caller does not own the video
    #[error("Not the owner of this video")]
    Forbidden,

    /// Input validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal error (database, etc.)
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Video service
pub struct VideoService {
    videos: Arc<dyn VideoRepository>,
    watch_history: Arc<dyn WatchHistoryRepository>,
    cache: Arc<Cache>,
}

impl VideoService {
    /// Create a new video service
    pub fn new(
        videos: Arc<dyn VideoRepository>,
        watch_history: Arc<dyn WatchHistoryRepository>,
        cache: Arc<Cache>,
    ) -> Self {
        Self {
            videos,
            watch_history,
            cache,
        }
    }

    fn cache_key(id: i64) -> String {
        format!("video:{}", id)
    }

    async fn invalidate(&self, id: i64) {
        if let Err(e) = self.cache.delete(&Self::cache_key(id)).await {
            tracing::warn!(video_id = id, error = %e, "Failed to invalidate video cache");
        }
    }

    /// Publish a new video
    pub async fn publish(&self, input: CreateVideoInput) -> Result<Video, VideoError> {
        if input.title.trim().is_empty() {
            return Err(VideoError::Validation("Title is required".to_string()));
        }
        if input.video_url.trim().is_empty() {
            return Err(VideoError::Validation("Video URL is required".to_string()));
        }
        if input.duration_secs < 0 {
            return Err(VideoError::Validation(
                "Duration must not be negative".to_string(),
            ));
        }

        let video = self.videos.create(&input).await?;
        tracing::info!(video_id = video.id, owner_id = video.owner_id, "Video published");
        Ok(video)
    }

    /// Watch a video: fetch it, bump its view counter and record it in
    /// the viewer's history. Unpublished videos are visible only to
    /// their owner and do not accumulate views or history entries.
    pub async fn watch(&self, id: i64, viewer_id: Option<i64>) -> Result<Video, VideoError> {
        let mut video = self.get(id).await?;

        if !video.is_published {
            if viewer_id != Some(video.owner_id) {
                return Err(VideoError::NotFound);
            }
            return Ok(video);
        }

        self.videos.increment_views(id).await?;
        video.views += 1;
        self.invalidate(id).await;

        if let Some(viewer_id) = viewer_id {
            if let Err(e) = self.watch_history.record(viewer_id, id).await {
                tracing::warn!(viewer_id, video_id = id, error = %e, "Failed to record watch history");
            }
        }
        Ok(video)
    }

    /// Get a video without side effects, via the cache
    pub async fn get(&self, id: i64) -> Result<Video, VideoError> {
        let key = Self::cache_key(id);
        match self.cache.get::<Video>(&key).await {
            Ok(Some(video)) => return Ok(video),
            Ok(None) => {}
            Err(e) => tracing::warn!(video_id = id, error = %e, "Video cache read failed"),
        }

        let video = self.videos.get_by_id(id).await?.ok_or(VideoError::NotFound)?;
        if let Err(e) = self.cache.set(&key, &video, VIDEO_CACHE_TTL).await {
            tracing::warn!(video_id = id, error = %e, "Video cache write failed");
        }
        Ok(video)
    }

    /// List a channel's videos, newest first
    pub async fn list_by_owner(
        &self,
        owner_id: i64,
        params: &ListParams,
    ) -> Result<PagedResult<Video>, VideoError> {
        let (items, total) = tokio::try_join!(
            self.videos.list_by_owner(owner_id, params.limit(), params.offset()),
            self.videos.count_by_owner(owner_id),
        )?;
        Ok(PagedResult::new(items, total, params))
    }

    /// Update a video's metadata. Only the owner may update.
    pub async fn update(
        &self,
        id: i64,
        caller_id: i64,
        input: UpdateVideoInput,
    ) -> Result<Video, VideoError> {
        let existing = self.videos.get_by_id(id).await?.ok_or(VideoError::NotFound)?;
        if existing.owner_id != caller_id {
            return Err(VideoError::Forbidden);
        }
        if !input.has_changes() {
            return Err(VideoError::Validation("No fields to update".to_string()));
        }
        if matches!(&input.title, Some(t) if t.trim().is_empty()) {
            return Err(VideoError::Validation("Title must not be blank".to_string()));
        }

        let updated = self
            .videos
            .update(id, &input)
            .await?
            .ok_or(VideoError::NotFound)?;
        self.invalidate(id).await;
        Ok(updated)
    }

    /// Delete a video. Only the owner may delete.
    pub async fn delete(&self, id: i64, caller_id: i64) -> Result<(), VideoError> {
        let existing = self.videos.get_by_id(id).await?.ok_or(VideoError::NotFound)?;
        if existing.owner_id != caller_id {
            return Err(VideoError::Forbidden);
        }

        self.videos.delete(id).await?;
        self.invalidate(id).await;
        tracing::info!(video_id = id, "Video deleted");
        Ok(())
    }

    /// Flip a video's publish state. Only the owner may toggle.
    pub async fn toggle_publish(&self, id: i64, caller_id: i64) -> Result<bool, VideoError> {
        let existing = self.videos.get_by_id(id).await?.ok_or(VideoError::NotFound)?;
        if existing.owner_id != caller_id {
            return Err(VideoError::Forbidden);
        }

        let published = self
            .videos
            .toggle_publish(id)
            .await?
            .ok_or(VideoError::NotFound)?;
        self.invalidate(id).await;
        Ok(published)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::create_cache;
    use crate::config::CacheConfig;
    use crate::db::repositories::{SqlxVideoRepository, SqlxWatchHistoryRepository};
    use crate::db::{create_test_pool, migrations};
    use sqlx::SqlitePool;

    async fn setup() -> (SqlitePool, VideoService) {
        let pool = create_test_pool().await.expect("Failed to create pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Migrations failed");
        let service = VideoService::new(
            SqlxVideoRepository::boxed(pool.clone()),
            SqlxWatchHistoryRepository::boxed(pool.clone()),
            create_cache(&CacheConfig::default()),
        );
        (pool, service)
    }

    async fn insert_user(pool: &SqlitePool, username: &str) -> i64 {
        let result = sqlx::query(
            "INSERT INTO users (username, email, password_hash) VALUES (?, ?, 'h')",
        )
        .bind(username)
        .bind(format!("{}@example.com", username))
        .execute(pool)
        .await
        .expect("Failed to insert user");
        result.last_insert_rowid()
    }

    fn input(owner_id: i64, title: &str) -> CreateVideoInput {
        CreateVideoInput {
            owner_id,
            title: title.to_string(),
            description: String::new(),
            video_url: "https://cdn.example.com/v.mp4".to_string(),
            thumbnail_url: "t".to_string(),
            duration_secs: 60,
            tags: vec![],
            is_published: None,
        }
    }

    #[tokio::test]
    async fn test_watch_increments_views_and_records_history() {
        let (pool, service) = setup().await;
        let owner = insert_user(&pool, "owner").await;
        let viewer = insert_user(&pool, "viewer").await;
        let video = service
            .publish(input(owner, "Hello"))
            .await
            .expect("Publish failed");

        let watched = service
            .watch(video.id, Some(viewer))
            .await
            .expect("Watch failed");
        assert_eq!(watched.views, 1);

        let again = service
            .watch(video.id, Some(viewer))
            .await
            .expect("Watch failed");
        assert_eq!(again.views, 2);

        let history = SqlxWatchHistoryRepository::new(pool.clone());
        let ids = history
            .watched_video_ids(viewer, 10, 0)
            .await
            .expect("History failed");
        assert_eq!(ids, vec![video.id]);
    }

    #[tokio::test]
    async fn test_unpublished_hidden_from_non_owner() {
        let (pool, service) = setup().await;
        let owner = insert_user(&pool, "owner").await;
        let stranger = insert_user(&pool, "stranger").await;

        let mut draft = input(owner, "Draft");
        draft.is_published = Some(false);
        let video = service.publish(draft).await.expect("Publish failed");

        assert!(matches!(
            service.watch(video.id, Some(stranger)).await,
            Err(VideoError::NotFound)
        ));
        // Owner still sees it, with no view bump.
        let seen = service
            .watch(video.id, Some(owner))
            .await
            .expect("Watch failed");
        assert_eq!(seen.views, 0);
    }

    #[tokio::test]
    async fn test_update_requires_ownership_and_invalidates_cache() {
        let (pool, service) = setup().await;
        let owner = insert_user(&pool, "owner").await;
        let stranger = insert_user(&pool, "stranger").await;
        let video = service
            .publish(input(owner, "Original"))
            .await
            .expect("Publish failed");

        // Warm the cache.
        service.get(video.id).await.expect("Get failed");

        assert!(matches!(
            service
                .update(
                    video.id,
                    stranger,
                    UpdateVideoInput {
                        title: Some("Hijacked".to_string()),
                        ..Default::default()
                    },
                )
                .await,
            Err(VideoError::Forbidden)
        ));

        service
            .update(
                video.id,
                owner,
                UpdateVideoInput {
                    title: Some("Renamed".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("Update failed");

        let fresh = service.get(video.id).await.expect("Get failed");
        assert_eq!(fresh.title, "Renamed");
    }

    #[tokio::test]
    async fn test_publish_validation() {
        let (pool, service) = setup().await;
        let owner = insert_user(&pool, "owner").await;

        let mut blank = input(owner, "  ");
        blank.title = "  ".to_string();
        assert!(matches!(
            service.publish(blank).await,
            Err(VideoError::Validation(_))
        ));

        let mut no_url = input(owner, "Fine");
        no_url.video_url = String::new();
        assert!(matches!(
            service.publish(no_url).await,
            Err(VideoError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_and_pagination() {
        let (pool, service) = setup().await;
        let owner = insert_user(&pool, "owner").await;
        for n in 0..3 {
            service
                .publish(input(owner, &format!("Video {}", n)))
                .await
                .expect("Publish failed");
        }

        let page = service
            .list_by_owner(owner, &ListParams::new(1, 2))
            .await
            .expect("List failed");
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 3);
        assert_eq!(page.total_pages(), 2);

        let first = page.items[0].id;
        service.delete(first, owner).await.expect("Delete failed");
        assert!(matches!(
            service.get(first).await,
            Err(VideoError::NotFound)
        ));
    }
}
