//! Like model

/// The entity a like points at. A like references exactly one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeTarget {
    /// A video
    Video(i64),
    /// A comment
    Comment(i64),
    /// A tweet
    Tweet(i64),
}

impl LikeTarget {
    /// Target ID regardless of kind
    pub fn id(&self) -> i64 {
        match self {
            LikeTarget::Video(id) | LikeTarget::Comment(id) | LikeTarget::Tweet(id) => *id,
        }
    }

    /// Column holding the target reference
    pub fn column(&self) -> &'static str {
        match self {
            LikeTarget::Video(_) => "video_id",
            LikeTarget::Comment(_) => "comment_id",
            LikeTarget::Tweet(_) => "tweet_id",
        }
    }
}

