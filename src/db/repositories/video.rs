//! Video repository
//!
//! Database operations for videos, including the feed candidate-source
//! queries (subscribed-channel latest uploads, tag-affinity matches,
//! trending) and the relevance-tiered text search. Tags live in the
//! `video_tags` side table and are attached after the main query.

use crate::models::{
    CreateVideoInput, SearchFilters, SortDirection, SortField, UpdateVideoInput, Video,
    VideoEngagement,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;
use std::sync::Arc;

/// Video repository trait
#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// Create a new video
    async fn create(&self, input: &CreateVideoInput) -> Result<Video>;

    /// Get video by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Video>>;

    /// List a channel's videos, newest first
    async fn list_by_owner(&self, owner_id: i64, limit: i64, offset: i64) -> Result<Vec<Video>>;

    /// Count a channel's videos
    async fn count_by_owner(&self, owner_id: i64) -> Result<i64>;

    /// Update video metadata, returning the updated video if it exists
    async fn update(&self, id: i64, input: &UpdateVideoInput) -> Result<Option<Video>>;

    /// Delete a video, returning whether it existed
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Flip the publish flag, returning the new state if the video exists
    async fn toggle_publish(&self, id: i64) -> Result<Option<bool>>;

    /// Increment the view counter
    async fn increment_views(&self, id: i64) -> Result<()>;

    /// Relevance-tiered text search over published videos.
    ///
    /// Tier 1 is an exact case-insensitive title or description match,
    /// tier 2 a substring match, tier 3 a defensive fallback. Results
    /// order by tier first, then by the caller's sort.
    async fn search_published(
        &self,
        query: &str,
        filters: &SearchFilters,
        sort_by: SortField,
        sort_direction: SortDirection,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Video>>;

    /// Most recent published upload per subscribed channel, limited to
    /// uploads at or after `since`. At most one video per channel.
    async fn subscribed_latest(
        &self,
        viewer_id: i64,
        since: DateTime<Utc>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Video>>;

    /// Published videos carrying at least one of the given tags,
    /// optionally constrained to a minimum view count, newest first.
    async fn published_with_any_tag(
        &self,
        tags: &[String],
        min_views: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Video>>;

    /// Published videos uploaded at or after `since` with at least
    /// `min_views` views, most viewed first.
    async fn trending(
        &self,
        min_views: i64,
        since: DateTime<Utc>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Video>>;

    /// Per-video engagement counts for a channel, most viewed first.
    ///
    /// Includes unpublished videos: the channel dashboard reports on
    /// everything the channel owns. Videos with no likes or comments
    /// appear with zero counts.
    async fn channel_engagement(
        &self,
        channel_id: i64,
        uploaded_after: Option<DateTime<Utc>>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<VideoEngagement>>;
}

/// SQLx-based video repository implementation
pub struct SqlxVideoRepository {
    pool: SqlitePool,
}

impl SqlxVideoRepository {
    /// Create a new SQLx video repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn VideoRepository> {
        Arc::new(Self::new(pool))
    }

    /// Replace the tag set for a video
    async fn replace_tags(&self, video_id: i64, tags: &[String]) -> Result<()> {
        sqlx::query("DELETE FROM video_tags WHERE video_id = ?")
            .bind(video_id)
            .execute(&self.pool)
            .await
            .context("Failed to clear video tags")?;
        for tag in tags {
            sqlx::query("INSERT OR IGNORE INTO video_tags (video_id, tag) VALUES (?, ?)")
                .bind(video_id)
                .bind(tag)
                .execute(&self.pool)
                .await
                .context("Failed to insert video tag")?;
        }
        Ok(())
    }

    /// Load tags for a batch of videos in one query
    async fn attach_tags(&self, videos: &mut [Video]) -> Result<()> {
        if videos.is_empty() {
            return Ok(());
        }

        let placeholders = vec!["?"; videos.len()].join(", ");
        let sql = format!(
            "SELECT video_id, tag FROM video_tags WHERE video_id IN ({}) ORDER BY tag",
            placeholders
        );
        let mut query = sqlx::query(&sql);
        for video in videos.iter() {
            query = query.bind(video.id);
        }
        let rows = query
            .fetch_all(&self.pool)
            .await
            .context("Failed to load video tags")?;

        let mut by_video: HashMap<i64, Vec<String>> = HashMap::new();
        for row in rows {
            let video_id: i64 = row.get("video_id");
            by_video.entry(video_id).or_default().push(row.get("tag"));
        }
        for video in videos.iter_mut() {
            video.tags = by_video.remove(&video.id).unwrap_or_default();
        }
        Ok(())
    }

    async fn fetch_one_with_tags(&self, id: i64) -> Result<Option<Video>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM videos WHERE id = ?",
            VIDEO_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get video by ID")?;

        match row {
            Some(row) => {
                let mut videos = vec![row_to_video(&row)];
                self.attach_tags(&mut videos).await?;
                Ok(videos.pop())
            }
            None => Ok(None),
        }
    }
}

const VIDEO_COLUMNS: &str = "id, owner_id, title, description, video_url, thumbnail_url, \
     duration_secs, views, is_published, created_at, updated_at";

fn row_to_video(row: &sqlx::sqlite::SqliteRow) -> Video {
    Video {
        id: row.get("id"),
        owner_id: row.get("owner_id"),
        title: row.get("title"),
        description: row.get("description"),
        video_url: row.get("video_url"),
        thumbnail_url: row.get("thumbnail_url"),
        duration_secs: row.get("duration_secs"),
        views: row.get("views"),
        is_published: row.get("is_published"),
        tags: Vec::new(),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl VideoRepository for SqlxVideoRepository {
    async fn create(&self, input: &CreateVideoInput) -> Result<Video> {
        let now = Utc::now();
        let is_published = input.is_published.unwrap_or(true);

        let result = sqlx::query(
            r#"
            INSERT INTO videos (owner_id, title, description, video_url, thumbnail_url,
                                duration_secs, views, is_published, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, 0, ?, ?, ?)
            "#,
        )
        .bind(input.owner_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.video_url)
        .bind(&input.thumbnail_url)
        .bind(input.duration_secs)
        .bind(is_published)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create video")?;

        let id = result.last_insert_rowid();
        self.replace_tags(id, &input.tags).await?;

        Ok(Video {
            id,
            owner_id: input.owner_id,
            title: input.title.clone(),
            description: input.description.clone(),
            video_url: input.video_url.clone(),
            thumbnail_url: input.thumbnail_url.clone(),
            duration_secs: input.duration_secs,
            views: 0,
            is_published,
            tags: input.tags.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Video>> {
        self.fetch_one_with_tags(id).await
    }

    async fn list_by_owner(&self, owner_id: i64, limit: i64, offset: i64) -> Result<Vec<Video>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM videos WHERE owner_id = ? ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
            VIDEO_COLUMNS
        ))
        .bind(owner_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list videos by owner")?;

        let mut videos: Vec<Video> = rows.iter().map(row_to_video).collect();
        self.attach_tags(&mut videos).await?;
        Ok(videos)
    }

    async fn count_by_owner(&self, owner_id: i64) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM videos WHERE owner_id = ?")
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to count videos by owner")?;
        Ok(row.get("count"))
    }

    async fn update(&self, id: i64, input: &UpdateVideoInput) -> Result<Option<Video>> {
        if !input.has_changes() {
            return self.fetch_one_with_tags(id).await;
        }

        let result = sqlx::query(
            r#"
            UPDATE videos
            SET title = COALESCE(?, title),
                description = COALESCE(?, description),
                thumbnail_url = COALESCE(?, thumbnail_url),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.thumbnail_url)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to update video")?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        if let Some(tags) = &input.tags {
            self.replace_tags(id, tags).await?;
        }
        self.fetch_one_with_tags(id).await
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM videos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete video")?;
        Ok(result.rows_affected() > 0)
    }

    async fn toggle_publish(&self, id: i64) -> Result<Option<bool>> {
        let result = sqlx::query(
            "UPDATE videos SET is_published = NOT is_published, updated_at = ? WHERE id = ?",
        )
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to toggle publish state")?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        let row = sqlx::query("SELECT is_published FROM videos WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to read publish state")?;
        Ok(Some(row.get("is_published")))
    }

    async fn increment_views(&self, id: i64) -> Result<()> {
        sqlx::query("UPDATE videos SET views = views + 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to increment view count")?;
        Ok(())
    }

    async fn search_published(
        &self,
        query: &str,
        filters: &SearchFilters,
        sort_by: SortField,
        sort_direction: SortDirection,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Video>> {
        // Tier is computed in SQL so pagination and tier ordering stay
        // in the store instead of slicing an over-fetched list here.
        let sql = format!(
            r#"
            SELECT {columns},
                   CASE
                       WHEN lower(title) = lower(?1) OR lower(description) = lower(?1) THEN 1
                       WHEN instr(lower(title), lower(?1)) > 0
                            OR instr(lower(description), lower(?1)) > 0 THEN 2
                       ELSE 3
                   END AS tier
            FROM videos
            WHERE is_published = 1
              AND (instr(lower(title), lower(?1)) > 0 OR instr(lower(description), lower(?1)) > 0)
              AND (?2 IS NULL OR created_at >= ?2)
              AND (?3 IS NULL OR duration_secs <= ?3)
              AND (?4 IS NULL OR owner_id = ?4)
            ORDER BY tier ASC, {sort_col} {sort_dir}, id DESC
            LIMIT ?5 OFFSET ?6
            "#,
            columns = VIDEO_COLUMNS,
            sort_col = sort_by.as_column(),
            sort_dir = sort_direction.as_sql(),
        );

        let rows = sqlx::query(&sql)
            .bind(query)
            .bind(filters.uploaded_after)
            .bind(filters.max_duration_secs)
            .bind(filters.channel_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .context("Failed to search videos")?;

        let mut videos: Vec<Video> = rows.iter().map(row_to_video).collect();
        self.attach_tags(&mut videos).await?;
        Ok(videos)
    }

    async fn subscribed_latest(
        &self,
        viewer_id: i64,
        since: DateTime<Utc>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Video>> {
        // The correlated subselect keeps exactly one row per channel:
        // the most recent upload in the window, id-tiebroken so ties
        // resolve the same way on every run.
        let sql = format!(
            r#"
            SELECT {columns}
            FROM videos v
            JOIN subscriptions s ON s.channel_id = v.owner_id AND s.subscriber_id = ?1
            WHERE v.is_published = 1
              AND v.created_at >= ?2
              AND v.id = (
                  SELECT v2.id FROM videos v2
                  WHERE v2.owner_id = v.owner_id
                    AND v2.is_published = 1
                    AND v2.created_at >= ?2
                  ORDER BY v2.created_at DESC, v2.id DESC
                  LIMIT 1
              )
            ORDER BY v.created_at DESC, v.id DESC
            LIMIT ?3 OFFSET ?4
            "#,
            columns = qualified_columns("v"),
        );

        let rows = sqlx::query(&sql)
            .bind(viewer_id)
            .bind(since)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .context("Failed to load subscribed-channel uploads")?;

        let mut videos: Vec<Video> = rows.iter().map(row_to_video).collect();
        self.attach_tags(&mut videos).await?;
        Ok(videos)
    }

    async fn published_with_any_tag(
        &self,
        tags: &[String],
        min_views: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Video>> {
        if tags.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; tags.len()].join(", ");
        let sql = format!(
            r#"
            SELECT DISTINCT {columns}
            FROM videos v
            JOIN video_tags t ON t.video_id = v.id
            WHERE v.is_published = 1
              AND t.tag IN ({placeholders})
              AND (? IS NULL OR v.views >= ?)
            ORDER BY v.created_at DESC, v.id DESC
            LIMIT ? OFFSET ?
            "#,
            columns = qualified_columns("v"),
        );

        let mut query = sqlx::query(&sql);
        for tag in tags {
            query = query.bind(tag);
        }
        let rows = query
            .bind(min_views)
            .bind(min_views)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .context("Failed to load tag-matched videos")?;

        let mut videos: Vec<Video> = rows.iter().map(row_to_video).collect();
        self.attach_tags(&mut videos).await?;
        Ok(videos)
    }

    async fn trending(
        &self,
        min_views: i64,
        since: DateTime<Utc>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Video>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {}
            FROM videos
            WHERE is_published = 1 AND views >= ? AND created_at >= ?
            ORDER BY views DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
            VIDEO_COLUMNS
        ))
        .bind(min_views)
        .bind(since)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .context("Failed to load trending videos")?;

        let mut videos: Vec<Video> = rows.iter().map(row_to_video).collect();
        self.attach_tags(&mut videos).await?;
        Ok(videos)
    }

    async fn channel_engagement(
        &self,
        channel_id: i64,
        uploaded_after: Option<DateTime<Utc>>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<VideoEngagement>> {
        let rows = sqlx::query(
            r#"
            SELECT v.id AS video_id,
                   v.views,
                   (SELECT COUNT(*) FROM likes l WHERE l.video_id = v.id) AS like_count,
                   (SELECT COUNT(*) FROM comments c WHERE c.video_id = v.id) AS comment_count
            FROM videos v
            WHERE v.owner_id = ?
              AND (? IS NULL OR v.created_at >= ?)
            ORDER BY v.views DESC, v.id ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(channel_id)
        .bind(uploaded_after)
        .bind(uploaded_after)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .context("Failed to load channel engagement")?;

        Ok(rows
            .iter()
            .map(|row| VideoEngagement {
                video_id: row.get("video_id"),
                views: row.get("views"),
                like_count: row.get("like_count"),
                comment_count: row.get("comment_count"),
            })
            .collect())
    }
}

/// Prefix each video column with a table alias for joined queries
fn qualified_columns(alias: &str) -> String {
    VIDEO_COLUMNS
        .split(", ")
        .map(|col| format!("{}.{}", alias, col.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};
    use chrono::Duration;

    async fn setup() -> (SqlitePool, SqlxVideoRepository) {
        let pool = create_test_pool().await.expect("Failed to create pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Migrations failed");
        (pool.clone(), SqlxVideoRepository::new(pool))
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

    fn video_input(owner_id: i64, title: &str, tags: &[&str]) -> CreateVideoInput {
        CreateVideoInput {
            owner_id,
            title: title.to_string(),
            description: format!("About {}", title),
            video_url: "https://cdn.example.com/v.mp4".to_string(),
            thumbnail_url: "https://cdn.example.com/t.jpg".to_string(),
            duration_secs: 120,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            is_published: None,
        }
    }

    async fn backdate(pool: &SqlitePool, id: i64, days: i64) {
        let when = Utc::now() - Duration::days(days);
        sqlx::query("UPDATE videos SET created_at = ? WHERE id = ?")
            .bind(when)
            .bind(id)
            .execute(pool)
            .await
            .expect("Failed to backdate video");
    }

    async fn set_views(pool: &SqlitePool, id: i64, views: i64) {
        sqlx::query("UPDATE videos SET views = ? WHERE id = ?")
            .bind(views)
            .bind(id)
            .execute(pool)
            .await
            .expect("Failed to set views");
    }

    #[tokio::test]
    async fn test_create_get_with_tags() {
        let (pool, repo) = setup().await;
        let owner = insert_user(&pool, "uploader").await;

        let created = repo
            .create(&video_input(owner, "Intro", &["rust", "tutorial"]))
            .await
            .expect("Failed to create video");
        assert!(created.is_published);

        let fetched = repo
            .get_by_id(created.id)
            .await
            .expect("Failed to get")
            .expect("Video should exist");
        assert_eq!(fetched.tags, vec!["rust", "tutorial"]);
        assert_eq!(fetched.views, 0);
    }

    #[tokio::test]
    async fn test_update_replaces_tags() {
        let (pool, repo) = setup().await;
        let owner = insert_user(&pool, "uploader").await;
        let video = repo
            .create(&video_input(owner, "Old", &["old"]))
            .await
            .expect("Failed to create");

        let updated = repo
            .update(
                video.id,
                &UpdateVideoInput {
                    title: Some("New".to_string()),
                    tags: Some(vec!["fresh".to_string()]),
                    ..Default::default()
                },
            )
            .await
            .expect("Failed to update")
            .expect("Video should exist");
        assert_eq!(updated.title, "New");
        assert_eq!(updated.tags, vec!["fresh"]);
        assert_eq!(updated.description, "About Old");
    }

    #[tokio::test]
    async fn test_toggle_publish() {
        let (pool, repo) = setup().await;
        let owner = insert_user(&pool, "uploader").await;
        let video = repo
            .create(&video_input(owner, "V", &[]))
            .await
            .expect("Failed to create");

        let state = repo
            .toggle_publish(video.id)
            .await
            .expect("Failed to toggle")
            .expect("Video should exist");
        assert!(!state);
        assert_eq!(repo.toggle_publish(999).await.expect("Query failed"), None);
    }

    #[tokio::test]
    async fn test_search_tier_ordering() {
        let (pool, repo) = setup().await;
        let owner = insert_user(&pool, "uploader").await;
        let exact = repo
            .create(&video_input(owner, "cat", &[]))
            .await
            .expect("Failed to create");
        repo.create(&video_input(owner, "cat videos", &[]))
            .await
            .expect("Failed to create");

        // Exact title match outranks substring match even though the
        // substring match is the more recent upload.
        let results = repo
            .search_published(
                "cat",
                &SearchFilters::default(),
                SortField::UploadedAt,
                SortDirection::Desc,
                10,
                0,
            )
            .await
            .expect("Search failed");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, exact.id);
    }

    #[tokio::test]
    async fn test_search_skips_unpublished_and_applies_filters() {
        let (pool, repo) = setup().await;
        let owner = insert_user(&pool, "uploader").await;
        let other = insert_user(&pool, "other").await;

        let mut hidden = video_input(owner, "hidden cat", &[]);
        hidden.is_published = Some(false);
        repo.create(&hidden).await.expect("Failed to create");
        repo.create(&video_input(owner, "cat one", &[]))
            .await
            .expect("Failed to create");
        repo.create(&video_input(other, "cat two", &[]))
            .await
            .expect("Failed to create");

        let all = repo
            .search_published(
                "cat",
                &SearchFilters::default(),
                SortField::UploadedAt,
                SortDirection::Desc,
                10,
                0,
            )
            .await
            .expect("Search failed");
        assert_eq!(all.len(), 2);

        let filtered = repo
            .search_published(
                "cat",
                &SearchFilters {
                    channel_id: Some(other),
                    ..Default::default()
                },
                SortField::UploadedAt,
                SortDirection::Desc,
                10,
                0,
            )
            .await
            .expect("Search failed");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].owner_id, other);
    }

    #[tokio::test]
    async fn test_subscribed_latest_one_per_channel() {
        let (pool, repo) = setup().await;
        let viewer = insert_user(&pool, "viewer").await;
        let channel = insert_user(&pool, "channel").await;
        sqlx::query("INSERT INTO subscriptions (subscriber_id, channel_id) VALUES (?, ?)")
            .bind(viewer)
            .bind(channel)
            .execute(&pool)
            .await
            .expect("Failed to subscribe");

        let older = repo
            .create(&video_input(channel, "First", &[]))
            .await
            .expect("Failed to create");
        backdate(&pool, older.id, 3).await;
        let newer = repo
            .create(&video_input(channel, "Second", &[]))
            .await
            .expect("Failed to create");
        let stale = repo
            .create(&video_input(channel, "Ancient", &[]))
            .await
            .expect("Failed to create");
        backdate(&pool, stale.id, 30).await;

        let since = Utc::now() - Duration::days(7);
        let results = repo
            .subscribed_latest(viewer, since, 10, 0)
            .await
            .expect("Query failed");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, newer.id);
    }

    #[tokio::test]
    async fn test_published_with_any_tag_dedupes() {
        let (pool, repo) = setup().await;
        let owner = insert_user(&pool, "uploader").await;
        let both = repo
            .create(&video_input(owner, "Both tags", &["rust", "async"]))
            .await
            .expect("Failed to create");
        repo.create(&video_input(owner, "Unrelated", &["cooking"]))
            .await
            .expect("Failed to create");

        let results = repo
            .published_with_any_tag(&["rust".to_string(), "async".to_string()], None, 10, 0)
            .await
            .expect("Query failed");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, both.id);

        let popular = repo
            .published_with_any_tag(&["rust".to_string()], Some(1_000_000), 10, 0)
            .await
            .expect("Query failed");
        assert!(popular.is_empty());
    }

    #[tokio::test]
    async fn test_trending_window_and_threshold() {
        let (pool, repo) = setup().await;
        let owner = insert_user(&pool, "uploader").await;

        let hot = repo
            .create(&video_input(owner, "Hot", &[]))
            .await
            .expect("Failed to create");
        set_views(&pool, hot.id, 2_000_000).await;
        let old_hit = repo
            .create(&video_input(owner, "Old hit", &[]))
            .await
            .expect("Failed to create");
        set_views(&pool, old_hit.id, 5_000_000).await;
        backdate(&pool, old_hit.id, 3).await;
        let quiet = repo
            .create(&video_input(owner, "Quiet", &[]))
            .await
            .expect("Failed to create");
        set_views(&pool, quiet.id, 10).await;

        let since = Utc::now() - Duration::days(1);
        let results = repo
            .trending(1_000_000, since, 10, 0)
            .await
            .expect("Query failed");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, hot.id);
    }

    #[tokio::test]
    async fn test_channel_engagement_zero_counts_and_order() {
        let (pool, repo) = setup().await;
        let owner = insert_user(&pool, "uploader").await;
        let fan = insert_user(&pool, "fan").await;

        let low = repo
            .create(&video_input(owner, "Low", &[]))
            .await
            .expect("Failed to create");
        set_views(&pool, low.id, 10).await;
        let high = repo
            .create(&video_input(owner, "High", &[]))
            .await
            .expect("Failed to create");
        set_views(&pool, high.id, 30).await;

        sqlx::query("INSERT INTO likes (user_id, video_id) VALUES (?, ?)")
            .bind(fan)
            .bind(high.id)
            .execute(&pool)
            .await
            .expect("Failed to like");

        let slice = repo
            .channel_engagement(owner, None, 10, 0)
            .await
            .expect("Query failed");
        assert_eq!(slice.len(), 2);
        assert_eq!(slice[0].video_id, high.id);
        assert_eq!(slice[0].like_count, 1);
        assert_eq!(slice[1].like_count, 0);
        assert_eq!(slice[1].comment_count, 0);
    }
}
