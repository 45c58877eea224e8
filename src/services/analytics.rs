//! Channel analytics service
//!
//! Computes the channel dashboard summary: subscriber count plus
//! aggregate video performance over a paginated, time-windowed slice
//! of the channel's videos. The summary is computed fresh per request
//! and never cached.

use crate::db::repositories::{SubscriptionRepository, VideoRepository};
use crate::models::{ListParams, TimeWindow, VideoEngagement};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// Analytics service errors
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// The channel id is missing or malformed; raised before any query runs
    #[error("Invalid channel id")]
    InvalidChannel,

    /// Internal error (database, etc.)
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Aggregate channel statistics over the selected video slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelStatsSummary {
    /// Subscribers of the channel (independent of the video window)
    pub total_subscribers: i64,
    /// Videos in the selected slice
    pub total_videos: i64,
    /// Sum of views over the slice
    pub total_views: i64,
    /// Sum of per-video like counts over the slice
    pub total_likes: i64,
    /// Sum of per-video comment counts over the slice
    pub total_comments: i64,
    /// `total_views / total_videos`, exactly 0 when the slice is empty
    pub average_views: f64,
}

/// Channel analytics service
pub struct AnalyticsService {
    videos: Arc<dyn VideoRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl AnalyticsService {
    /// Create a new analytics service
    pub fn new(
        videos: Arc<dyn VideoRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
    ) -> Self {
        Self {
            videos,
            subscriptions,
        }
    }

    /// Compute the dashboard summary for a channel.
    ///
    /// The video slice is the channel's videos within `window` (all
    /// time when absent), sorted most-viewed first, paginated by
    /// `params`, and optionally capped: a `video_count_cap` no larger
    /// than the page size shrinks the slice to the top `cap` videos.
    ///
    /// A channel with zero videos in the window yields an all-zero
    /// summary with the subscriber count still filled in.
    pub async fn channel_stats(
        &self,
        channel_id: i64,
        params: &ListParams,
        window: Option<TimeWindow>,
        video_count_cap: Option<i64>,
    ) -> Result<ChannelStatsSummary, AnalyticsError> {
        if channel_id <= 0 {
            return Err(AnalyticsError::InvalidChannel);
        }

        let uploaded_after = window.and_then(|w| w.lower_bound(Utc::now()));
        let page_limit = params.limit();
        // A cap only ever shrinks the slice; zero and negative caps
        // fall back to the page limit (SQLite reads LIMIT -1 as
        // unlimited).
        let effective_limit = match video_count_cap {
            Some(cap) if cap > 0 && cap <= page_limit => cap,
            _ => page_limit,
        };
        let offset = (params.page as i64 - 1) * page_limit;

        let (total_subscribers, slice) = tokio::try_join!(
            self.subscriptions.count_subscribers(channel_id),
            self.videos
                .channel_engagement(channel_id, uploaded_after, effective_limit, offset),
        )?;

        Ok(summarize(total_subscribers, &slice))
    }
}

/// Reduce an engagement slice to the summary record.
fn summarize(total_subscribers: i64, slice: &[VideoEngagement]) -> ChannelStatsSummary {
    let total_videos = slice.len() as i64;
    let total_views: i64 = slice.iter().map(|v| v.views).sum();
    let total_likes: i64 = slice.iter().map(|v| v.like_count).sum();
    let total_comments: i64 = slice.iter().map(|v| v.comment_count).sum();
    let average_views = if total_videos > 0 {
        total_views as f64 / total_videos as f64
    } else {
        0.0
    };

    ChannelStatsSummary {
        total_subscribers,
        total_videos,
        total_views,
        total_likes,
        total_comments,
        average_views,
    }
}
