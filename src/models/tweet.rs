//! Tweet model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tweet entity (short text post, optionally with attached media)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tweet {
    /// Unique identifier
    pub id: i64,
    /// Posting user ID
    pub owner_id: i64,
    /// Tweet text
    pub content: String,
    /// Attached image URL (optional)
    pub image_url: Option<String>,
    /// Attached video URL (optional)
    pub video_url: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Input for posting a tweet
#[derive(Debug, Clone)]
pub struct CreateTweetInput {
    /// Posting user ID
    pub owner_id: i64,
    /// Tweet text
    pub content: String,
    /// Attached image URL (optional)
    pub image_url: Option<String>,
    /// Attached video URL (optional)
    pub video_url: Option<String>,
}

/// Input for updating a tweet
#[derive(Debug, Clone, Default)]
pub struct UpdateTweetInput {
    /// New text (optional)
    pub content: Option<String>,
    /// New attached image URL (optional)
    pub image_url: Option<String>,
    /// New attached video URL (optional)
    pub video_url: Option<String>,
}
