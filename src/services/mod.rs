//! Business logic services
//!
//! Services sit between the HTTP layer and the repositories. Each
//! service owns its error type; repository failures surface as the
//! service's `Internal` variant with the cause attached.

pub mod analytics;
pub mod comment;
pub mod feed;
pub mod like;
pub mod password;
pub mod playlist;
pub mod subscription;
pub mod tweet;
pub mod user;
pub mod video;

pub use analytics::{AnalyticsError, AnalyticsService, ChannelStatsSummary};
pub use comment::{CommentError, CommentService};
pub use feed::{FeedError, FeedRequest, FeedService};
pub use like::{LikeError, LikeService};
pub use playlist::{PlaylistError, PlaylistService};
pub use subscription::{SubscriptionError, SubscriptionService};
pub use tweet::{TweetError, TweetService};
pub use user::{UserError, UserService};
pub use video::{VideoError, VideoService};
