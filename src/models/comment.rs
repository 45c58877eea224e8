//! Comment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Comment entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Unique identifier
    pub id: i64,
    /// Commented video ID
    pub video_id: i64,
    /// Commenting user ID
    pub owner_id: i64,
    /// Comment text
    pub content: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a comment
#[derive(Debug, Clone)]
pub struct CreateCommentInput {
    /// Commented video ID
    pub video_id: i64,
    /// Commenting user ID
    pub owner_id: i64,
    /// Comment text
    pub content: String,
}
