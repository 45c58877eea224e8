//! Playlist model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Playlist entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    /// Unique identifier
    pub id: i64,
    /// Owning user ID
    pub owner_id: i64,
    /// Playlist name
    pub name: String,
    /// Playlist description
    pub description: String,
    /// IDs of contained videos, in playlist order
    #[serde(default)]
    pub video_ids: Vec<i64>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a playlist
#[derive(Debug, Clone)]
pub struct CreatePlaylistInput {
    /// Owning user ID
    pub owner_id: i64,
    /// Playlist name
    pub name: String,
    /// Playlist description
    pub description: String,
}

/// Input for updating a playlist
#[derive(Debug, Clone, Default)]
pub struct UpdatePlaylistInput {
    /// New name (optional)
    pub name: Option<String>,
    /// New description (optional)
    pub description: Option<String>,
}
