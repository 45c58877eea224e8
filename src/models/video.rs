//! Video model
//!
//! This module provides:
//! - `Video` entity representing an uploaded video
//! - Input types for publishing and updating videos
//! - Pagination, sorting and time-window types shared by list queries

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Video entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    /// Unique identifier
    pub id: i64,
    /// Owning channel (user) ID
    pub owner_id: i64,
    /// Video title
    pub title: String,
    /// Video description
    pub description: String,
    /// Media URL on the third-party host
    pub video_url: String,
    /// Thumbnail URL on the third-party host
    pub thumbnail_url: String,
    /// Duration in seconds
    pub duration_secs: i64,
    /// View count (never negative)
    pub views: i64,
    /// Whether the video is visible in feeds and search
    pub is_published: bool,
    /// Tag set
    #[serde(default)]
    pub tags: Vec<String>,
    /// Upload timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Input for publishing a new video
#[derive(Debug, Clone)]
pub struct CreateVideoInput {
    /// Owning channel (user) ID
    pub owner_id: i64,
    /// Video title
    pub title: String,
    /// Video description
    pub description: String,
    /// Media URL on the third-party host
    pub video_url: String,
    /// Thumbnail URL on the third-party host
    pub thumbnail_url: String,
    /// Duration in seconds
    pub duration_secs: i64,
    /// Tag set
    pub tags: Vec<String>,
    /// Publish immediately (defaults to true)
    pub is_published: Option<bool>,
}

/// Input for updating an existing video
#[derive(Debug, Clone, Default)]
pub struct UpdateVideoInput {
    /// New title (optional)
    pub title: Option<String>,
    /// New description (optional)
    pub description: Option<String>,
    /// New thumbnail URL (optional)
    pub thumbnail_url: Option<String>,
    /// Replacement tag set (optional)
    pub tags: Option<Vec<String>>,
}

impl UpdateVideoInput {
    /// Check if any field is set
    pub fn has_changes(&self) -> bool {
        self.title.is_some()
            || self.description.is_some()
            || self.thumbnail_url.is_some()
            || self.tags.is_some()
    }
}

/// Conjunctive filters applied on top of a text search.
///
/// Every set field narrows the result; unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    /// Only videos uploaded at or after this instant
    pub uploaded_after: Option<DateTime<Utc>>,
    /// Only videos no longer than this many seconds
    pub max_duration_secs: Option<i64>,
    /// Only videos owned by this channel
    pub channel_id: Option<i64>,
}

/// Per-video engagement counts used by channel analytics.
///
/// Videos with zero likes or comments still appear with zero counts;
/// the join never drops rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoEngagement {
    /// Video ID
    pub video_id: i64,
    /// View count
    pub views: i64,
    /// Number of likes referencing this video
    pub like_count: i64,
    /// Number of comments on this video
    pub comment_count: i64,
}

/// Sort field for video list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// Upload timestamp (default)
    #[default]
    UploadedAt,
    /// View count
    Views,
    /// Duration
    Duration,
    /// Title (lexicographic)
    Title,
}

impl SortField {
    /// Column name for ORDER BY clauses
    pub fn as_column(&self) -> &'static str {
        match self {
            SortField::UploadedAt => "created_at",
            SortField::Views => "views",
            SortField::Duration => "duration_secs",
            SortField::Title => "title",
        }
    }
}

/// Sort direction for video list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending
    Asc,
    /// Descending (default)
    #[default]
    Desc,
}

impl SortDirection {
    /// SQL keyword for ORDER BY clauses
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Time window for upload-date filtering and windowed aggregation.
///
/// `Alltime` imposes no lower bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    /// Last 7 days
    Week,
    /// Last 30 days
    Month,
    /// Last 365 days
    Year,
    /// No bound
    Alltime,
}

impl TimeWindow {
    /// Resolve the window to a lower bound on the upload timestamp,
    /// relative to `now`. `Alltime` resolves to no bound.
    pub fn lower_bound(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let days = match self {
            TimeWindow::Week => 7,
            TimeWindow::Month => 30,
            TimeWindow::Year => 365,
            TimeWindow::Alltime => return None,
        };
        Some(now - Duration::days(days))
    }
}

impl FromStr for TimeWindow {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "week" => Ok(TimeWindow::Week),
            "month" => Ok(TimeWindow::Month),
            "year" => Ok(TimeWindow::Year),
            "alltime" => Ok(TimeWindow::Alltime),
            _ => Err(anyhow::anyhow!("Invalid time window: {}", s)),
        }
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TimeWindow::Week => "week",
            TimeWindow::Month => "month",
            TimeWindow::Year => "year",
            TimeWindow::Alltime => "alltime",
        };
        write!(f, "{}", s)
    }
}

/// Pagination parameters for list queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListParams {
    /// Page number (1-indexed)
    pub page: u32,
    /// Number of items per page
    pub per_page: u32,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 10,
        }
    }
}

impl ListParams {
    /// Create new pagination parameters
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, 100),
        }
    }

    /// Calculate the offset for database queries
    pub fn offset(&self) -> i64 {
        // Widen before multiplying so huge page numbers cannot overflow.
        (self.page.saturating_sub(1)) as i64 * self.per_page as i64
    }

    /// Get the limit for database queries
    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }
}

/// Paginated result container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResult<T> {
    /// Items in the current page
    pub items: Vec<T>,
    /// Total number of items across all pages
    pub total: i64,
    /// Current page number (1-indexed)
    pub page: u32,
    /// Number of items per page
    pub per_page: u32,
}

impl<T> PagedResult<T> {
    /// Create a new paginated result
    pub fn new(items: Vec<T>, total: i64, params: &ListParams) -> Self {
        Self {
            items,
            total,
            page: params.page,
            per_page: params.per_page,
        }
    }

    /// Calculate the total number of pages
    pub fn total_pages(&self) -> u32 {
        if self.per_page == 0 {
            return 0;
        }
        let pages = (self.total.max(0) as u64).div_ceil(self.per_page as u64);
        pages.try_into().unwrap_or(u32::MAX)
    }

    /// Check if the result is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the number of items in the current page
    pub fn len(&self) -> usize {
        self.items.len()
    }
}
