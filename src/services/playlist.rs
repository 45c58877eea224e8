//! Playlist service
//!
//! User playlists and their video membership, with ownership checks.

use crate::db::repositories::{PlaylistRepository, VideoRepository};
use crate::models::{CreatePlaylistInput, Playlist, UpdatePlaylistInput};
use std::sync::Arc;
use thiserror::Error;

/// Playlist service errors
#[derive(Debug, Error)]
pub enum PlaylistError {
    /// Playlist not found
    #[error("Playlist not found")]
    NotFound,

    /// Video not found
    #[error("Video not found")]
    VideoNotFound,

    /// Caller does not own the playlist
    #[error("Not the owner of this playlist")]
    Forbidden,

    /// Input validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal error (database, etc.)
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Playlist service
pub struct PlaylistService {
    playlists: Arc<dyn PlaylistRepository>,
    videos: Arc<dyn VideoRepository>,
}

impl PlaylistService {
    /// Create a new playlist service
    pub fn new(playlists: Arc<dyn PlaylistRepository>, videos: Arc<dyn VideoRepository>) -> Self {
        Self { playlists, videos }
    }

    /// Create a playlist
    pub async fn create(&self, input: CreatePlaylistInput) -> Result<Playlist, PlaylistError> {
        if input.name.trim().is_empty() {
            return Err(PlaylistError::Validation("Name is required".to_string()));
        }
        Ok(self.playlists.create(&input).await?)
    }

    /// Get a playlist by ID
    pub async fn get(&self, id: i64) -> Result<Playlist, PlaylistError> {
        self.playlists.get_by_id(id).await?.ok_or(PlaylistError::NotFound)
    }

    /// A user's playlists
    pub async fn list_for_user(&self, owner_id: i64) -> Result<Vec<Playlist>, PlaylistError> {
        Ok(self.playlists.list_by_owner(owner_id).await?)
    }

    /// Update playlist metadata. Only the owner may update.
    pub async fn update(
        &self,
        id: i64,
        caller_id: i64,
        input: UpdatePlaylistInput,
    ) -> Result<Playlist, PlaylistError> {
        let existing = self.owned(id, caller_id).await?;
        if matches!(&input.name, Some(n) if n.trim().is_empty()) {
            return Err(PlaylistError::Validation("Name must not be blank".to_string()));
        }

        self.playlists
            .update(existing.id, &input)
            .await?
            .ok_or(PlaylistError::NotFound)
    }

    /// Delete a playlist. Only the owner may delete.
    pub async fn delete(&self, id: i64, caller_id: i64) -> Result<(), PlaylistError> {
        let existing = self.owned(id, caller_id).await?;
        self.playlists.delete(existing.id).await?;
        Ok(())
    }

    /// Add a video to a playlist. Only the owner may add.
    pub async fn add_video(
        &self,
        playlist_id: i64,
        caller_id: i64,
        video_id: i64,
    ) -> Result<Playlist, PlaylistError> {
        self.owned(playlist_id, caller_id).await?;
        if self.videos.get_by_id(video_id).await?.is_none() {
            return Err(PlaylistError::VideoNotFound);
        }

        self.playlists.add_video(playlist_id, video_id).await?;
        self.get(playlist_id).await
    }

    /// Remove a video from a playlist. Only the owner may remove.
    pub async fn remove_video(
        &self,
        playlist_id: i64,
        caller_id: i64,
        video_id: i64,
    ) -> Result<Playlist, PlaylistError> {
        self.owned(playlist_id, caller_id).await?;
        if !self.playlists.remove_video(playlist_id, video_id).await? {
            return Err(PlaylistError::VideoNotFound);
        }
        self.get(playlist_id).await
    }

    async fn owned(&self, id: i64, caller_id: i64) -> Result<Playlist, PlaylistError> {
        let playlist = self.get(id).await?;
        if playlist.owner_id != caller_id {
            return Err(PlaylistError::Forbidden);
        }
        Ok(playlist)
    }
}
