//! Playlist repository
//!
//! Database operations for playlists and their video membership.

use crate::models::{CreatePlaylistInput, Playlist, UpdatePlaylistInput};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Playlist repository trait
#[async_trait]
pub trait PlaylistRepository: Send + Sync {
    /// Create a playlist
    async fn create(&self, input: &CreatePlaylistInput) -> Result<Playlist>;

    /// Get playlist by ID, with its video IDs in playlist order
    async fn get_by_id(&self, id: i64) -> Result<Option<Playlist>>;

    /// A user's playlists
    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Playlist>>;

    /// Update playlist metadata, returning the updated playlist if it exists
    async fn update(&self, id: i64, input: &UpdatePlaylistInput) -> Result<Option<Playlist>>;

    /// Delete a playlist, returning whether it existed
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Append a video to the end of a playlist; no-op if already present
    async fn add_video(&self, playlist_id: i64, video_id: i64) -> Result<()>;

    /// Remove a video from a playlist, returning whether it was present
    async fn remove_video(&self, playlist_id: i64, video_id: i64) -> Result<bool>;
}

/// SQLx-based playlist repository implementation
pub struct SqlxPlaylistRepository {
    pool: SqlitePool,
}

impl SqlxPlaylistRepository {
    /// Create a new SQLx playlist repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn PlaylistRepository> {
        Arc::new(Self::new(pool))
    }

    async fn video_ids(&self, playlist_id: i64) -> Result<Vec<i64>> {
        let rows = sqlx::query(
            "SELECT video_id FROM playlist_videos WHERE playlist_id = ? ORDER BY position, video_id",
        )
        .bind(playlist_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to load playlist videos")?;
        Ok(rows.iter().map(|row| row.get("video_id")).collect())
    }
}

#[async_trait]
impl PlaylistRepository for SqlxPlaylistRepository {
    async fn create(&self, input: &CreatePlaylistInput) -> Result<Playlist> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO playlists (owner_id, name, description, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(input.owner_id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create playlist")?;

        Ok(Playlist {
            id: result.last_insert_rowid(),
            owner_id: input.owner_id,
            name: input.name.clone(),
            description: input.description.clone(),
            video_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Playlist>> {
        let row = sqlx::query(
            "SELECT id, owner_id, name, description, created_at, updated_at FROM playlists WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get playlist")?;

        match row {
            Some(row) => {
                let mut playlist = row_to_playlist(&row);
                playlist.video_ids = self.video_ids(playlist.id).await?;
                Ok(Some(playlist))
            }
            None => Ok(None),
        }
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Playlist>> {
        let rows = sqlx::query(
            r#"
            SELECT id, owner_id, name, description, created_at, updated_at
            FROM playlists
            WHERE owner_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list playlists")?;

        let mut playlists = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut playlist = row_to_playlist(row);
            playlist.video_ids = self.video_ids(playlist.id).await?;
            playlists.push(playlist);
        }
        Ok(playlists)
    }

    async fn update(&self, id: i64, input: &UpdatePlaylistInput) -> Result<Option<Playlist>> {
        let result = sqlx::query(
            r#"
            UPDATE playlists
            SET name = COALESCE(?, name),
                description = COALESCE(?, description),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to update playlist")?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM playlists WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete playlist")?;
        Ok(result.rows_affected() > 0)
    }

    async fn add_video(&self, playlist_id: i64, video_id: i64) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO playlist_videos (playlist_id, video_id, position)
            VALUES (?, ?, (SELECT COALESCE(MAX(position), -1) + 1 FROM playlist_videos WHERE playlist_id = ?))
            "#,
        )
        .bind(playlist_id)
        .bind(video_id)
        .bind(playlist_id)
        .execute(&self.pool)
        .await
        .context("Failed to add video to playlist")?;
        Ok(())
    }

    async fn remove_video(&self, playlist_id: i64, video_id: i64) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM playlist_videos WHERE playlist_id = ? AND video_id = ?",
        )
        .bind(playlist_id)
        .bind(video_id)
        .execute(&self.pool)
        .await
        .context("Failed to remove video from playlist")?;
        Ok(result.rows_affected() > 0)
    }
}

fn row_to_playlist(row: &sqlx::sqlite::SqliteRow) -> Playlist {
    Playlist {
        id: row.get("id"),
        owner_id: row.get("owner_id"),
        name: row.get("name"),
        description: row.get("description"),
        video_ids: Vec::new(),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
