//! Subscription projections
//!
//! A subscription is a unique (subscriber, channel) pair; listings
//! surface the counterpart user as a slim profile.

use serde::{Deserialize, Serialize};

/// Slim user projection returned by subscriber/channel listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelProfile {
    /// User ID
    pub id: i64,
    /// Username
    pub username: String,
    /// Display name
    pub full_name: String,
    /// Avatar URL
    pub avatar_url: Option<String>,
}
