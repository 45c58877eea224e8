//! Database repositories
//!
//! Repository pattern implementations for database access.
//! Each repository handles the queries for a specific entity; the
//! services program against the traits so tests can swap the store.

pub mod comment;
pub mod like;
pub mod playlist;
pub mod session;
pub mod subscription;
pub mod tweet;
pub mod user;
pub mod video;
pub mod watch_history;

pub use comment::{CommentRepository, SqlxCommentRepository};
pub use like::{LikeRepository, SqlxLikeRepository};
pub use playlist::{PlaylistRepository, SqlxPlaylistRepository};
pub use session::{SessionRepository, SqlxSessionRepository};
pub use subscription::{SqlxSubscriptionRepository, SubscriptionRepository};
pub use tweet::{SqlxTweetRepository, TweetRepository};
pub use user::{SqlxUserRepository, UserRepository};
pub use video::{SqlxVideoRepository, VideoRepository};
pub use watch_history::{SqlxWatchHistoryRepository, WatchHistoryRepository};
