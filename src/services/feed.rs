//! Feed composition service
//!
//! Assembles the personalized video feed from four candidate sources
//! and handles the relevance-ranked search path. The two paths are
//! mutually exclusive: a request either searches or personalizes,
//! never both.
//!
//! Candidate sources, in precedence order:
//! 1. Latest upload per subscribed channel (7-day window, one per channel)
//! 2. Videos sharing a tag with the viewer's recent watch history
//! 3. The same tag matches, restricted to popular videos
//! 4. Globally trending videos (popular and uploaded within a day)
//!
//! Sources are fetched concurrently and degrade independently: a failed
//! source logs a warning and contributes nothing rather than failing
//! the whole feed.

use crate::db::repositories::{VideoRepository, WatchHistoryRepository};
use crate::models::{ListParams, SearchFilters, SortDirection, SortField, Video};
use anyhow::Result;
use chrono::{Duration, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

/// Window for subscribed-channel uploads
const SUBSCRIBED_WINDOW_DAYS: i64 = 7;

/// Window over watch history used to derive tag affinity
const TAG_AFFINITY_WINDOW_DAYS: i64 = 30;

/// View count at which a video counts as popular
const POPULAR_VIEWS_THRESHOLD: i64 = 1_000_000;

/// Window for trending videos
const TRENDING_WINDOW_DAYS: i64 = 1;

/// Slots reserved away from the subscribed-latest source
const SUBSCRIBED_BUDGET_RESERVE: i64 = 9;

/// Slots reserved away from each of the other three sources
const SOURCE_BUDGET_RESERVE: i64 = 7;

/// Feed service errors
#[derive(Debug, Error)]
pub enum FeedError {
    /// A search matched nothing. The personalized path never raises
    /// this; an empty personalized feed is a valid degraded state.
    #[error("No videos matched the search")]
    NoResults,

    /// Internal error (database, etc.)
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// A feed request, dispatched once at the entry point.
#[derive(Debug, Clone)]
pub enum FeedRequest {
    /// Relevance-ranked text search; bypasses candidate composition
    Search {
        /// Search query, non-blank
        query: String,
        /// Pagination
        params: ListParams,
        /// Conjunctive filters
        filters: SearchFilters,
        /// Secondary sort field (applied within a relevance tier)
        sort_by: SortField,
        /// Secondary sort direction
        sort_direction: SortDirection,
    },
    /// Four-source personalized composition
    Personalized {
        /// Viewer whose subscriptions and history drive the feed
        viewer_id: i64,
        /// Pagination
        params: ListParams,
    },
}

impl FeedRequest {
    /// Build a request from raw inputs, selecting the search path when
    /// a non-blank query is present.
    pub fn from_parts(
        viewer_id: i64,
        query: Option<String>,
        params: ListParams,
        filters: SearchFilters,
        sort_by: SortField,
        sort_direction: SortDirection,
    ) -> Self {
        match query {
            Some(q) if !q.trim().is_empty() => FeedRequest::Search {
                query: q,
                params,
                filters,
                sort_by,
                sort_direction,
            },
            _ => FeedRequest::Personalized { viewer_id, params },
        }
    }
}

/// Candidate source attribution, used for logging and ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedSource {
    /// Latest upload per subscribed channel
    Subscribed,
    /// Tag-affinity match from recent watch history
    TagMatch,
    /// Tag-affinity match restricted to popular videos
    TagMatchPopular,
    /// Globally trending
    Trending,
}

impl FeedSource {
    fn as_str(&self) -> &'static str {
        match self {
            FeedSource::Subscribed => "subscribed",
            FeedSource::TagMatch => "tag-match",
            FeedSource::TagMatchPopular => "tag-match-popular",
            FeedSource::Trending => "trending",
        }
    }
}

/// A video with its source attribution, request-scoped.
#[derive(Debug, Clone)]
pub struct FeedCandidate {
    /// The candidate video
    pub video: Video,
    /// Which source produced it
    pub source: FeedSource,
}

/// Feed composition service
pub struct FeedService {
    videos: Arc<dyn VideoRepository>,
    watch_history: Arc<dyn WatchHistoryRepository>,
}

impl FeedService {
    /// Create a new feed service
    pub fn new(
        videos: Arc<dyn VideoRepository>,
        watch_history: Arc<dyn WatchHistoryRepository>,
    ) -> Self {
        Self {
            videos,
            watch_history,
        }
    }

    /// Compose a feed for the given request.
    ///
    /// Search with zero matches fails with [`FeedError::NoResults`];
    /// an empty personalized feed is returned as `Ok(vec![])`.
    pub async fn compose(&self, request: FeedRequest) -> Result<Vec<Video>, FeedError> {
        match request {
            FeedRequest::Search {
                query,
                params,
                filters,
                sort_by,
                sort_direction,
            } => self.search(&query, &params, &filters, sort_by, sort_direction).await,
            FeedRequest::Personalized { viewer_id, params } => {
                Ok(self.personalized(viewer_id, &params).await?)
            }
        }
    }

    async fn search(
        &self,
        query: &str,
        params: &ListParams,
        filters: &SearchFilters,
        sort_by: SortField,
        sort_direction: SortDirection,
    ) -> Result<Vec<Video>, FeedError> {
        let results = self
            .videos
            .search_published(
                query,
                filters,
                sort_by,
                sort_direction,
                params.limit(),
                params.offset(),
            )
            .await?;

        if results.is_empty() {
            return Err(FeedError::NoResults);
        }
        Ok(results)
    }

    async fn personalized(&self, viewer_id: i64, params: &ListParams) -> Result<Vec<Video>> {
        let now = Utc::now();
        let limit = params.limit();
        let page = params.page as i64;

        // Per-source slot budgets. Reserves may sum past the requested
        // limit; the merge step truncates.
        let subscribed_budget = limit.saturating_sub(SUBSCRIBED_BUDGET_RESERVE);
        let source_budget = limit.saturating_sub(SOURCE_BUDGET_RESERVE);
        let subscribed_offset = (page - 1) * subscribed_budget;
        let source_offset = (page - 1) * source_budget;

        // Tag affinity drives two of the four sources; a history
        // failure degrades both to empty rather than failing the feed.
        let tag_since = now - Duration::days(TAG_AFFINITY_WINDOW_DAYS);
        let tags = match self.watch_history.tags_watched_since(viewer_id, tag_since).await {
            Ok(tags) => tags,
            Err(e) => {
                tracing::warn!(viewer_id, error = %e, "Watch history unavailable, skipping tag sources");
                Vec::new()
            }
        };

        let subscribed_since = now - Duration::days(SUBSCRIBED_WINDOW_DAYS);
        let trending_since = now - Duration::days(TRENDING_WINDOW_DAYS);

        let (subscribed, tag_recent, tag_popular, trending) = tokio::join!(
            self.videos.subscribed_latest(
                viewer_id,
                subscribed_since,
                subscribed_budget,
                subscribed_offset,
            ),
            self.videos
                .published_with_any_tag(&tags, None, source_budget, source_offset),
            self.videos.published_with_any_tag(
                &tags,
                Some(POPULAR_VIEWS_THRESHOLD),
                source_budget,
                source_offset,
            ),
            self.videos.trending(
                POPULAR_VIEWS_THRESHOLD,
                trending_since,
                source_budget,
                source_offset,
            ),
        );

        let mut candidates = Vec::new();
        collect_source(&mut candidates, FeedSource::Subscribed, subscribed);
        collect_source(&mut candidates, FeedSource::TagMatch, tag_recent);
        collect_source(&mut candidates, FeedSource::TagMatchPopular, tag_popular);
        collect_source(&mut candidates, FeedSource::Trending, trending);

        Ok(merge_candidates(candidates, limit as usize))
    }
}

/// Fold a source result into the candidate list, degrading a failed
/// source to an empty contribution with a logged warning.
fn collect_source(
    candidates: &mut Vec<FeedCandidate>,
    source: FeedSource,
    result: Result<Vec<Video>>,
) {
    match result {
        Ok(videos) => {
            candidates.extend(videos.into_iter().map(|video| FeedCandidate { video, source }));
        }
        Err(e) => {
            tracing::warn!(source = source.as_str(), error = %e, "Feed source failed, treating as empty");
        }
    }
}

/// Merge candidate lists into the final feed.
///
/// Candidates arrive concatenated in source precedence order. Dedup
/// keeps the first occurrence of each video id, so an earlier source
/// wins attribution. The deduplicated list is stably sorted newest
/// first (equal timestamps keep precedence order) and truncated.
pub fn merge_candidates(candidates: Vec<FeedCandidate>, limit: usize) -> Vec<Video> {
    let mut seen = HashSet::new();
    let mut merged: Vec<Video> = candidates
        .into_iter()
        .filter(|candidate| seen.insert(candidate.video.id))
        .map(|candidate| candidate.video)
        .collect();

    merged.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    merged.truncate(limit);
    merged
}
