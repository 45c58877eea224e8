//! User model
//!
//! A user doubles as a channel: subscriptions point at a user id and a
//! channel's videos are the videos owned by that user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User entity representing a registered user (and channel) in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: i64,
    /// Username (unique)
    pub username: String,
    /// Email address (unique)
    pub email: String,
    /// Display name
    pub full_name: String,
    /// Password hash (argon2)
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Avatar image URL (hosted on the media host)
    pub avatar_url: Option<String>,
    /// Channel cover image URL
    pub cover_image_url: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new User with the given parameters.
    ///
    /// Note: The password should already be hashed before calling this
    /// function. Use `services::password::hash_password()` to hash it.
    pub fn new(username: String, email: String, full_name: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: 0, // Will be set by the database
            username,
            email,
            full_name,
            password_hash,
            avatar_url: None,
            cover_image_url: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for creating a new user (before password hashing)
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Username
    pub username: String,
    /// Email address
    pub email: String,
    /// Display name
    pub full_name: String,
    /// Plaintext password (will be hashed)
    pub password: String,
    /// Avatar image URL (optional)
    pub avatar_url: Option<String>,
    /// Cover image URL (optional)
    pub cover_image_url: Option<String>,
}
