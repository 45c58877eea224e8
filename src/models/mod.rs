//! Data models
//!
//! This module contains all data structures used throughout the Vidtube backend.
//! Models represent:
//! - Database entities (User, Session, Video, Comment, Tweet, Playlist)
//! - Query parameter types (pagination, sorting, time windows)
//! - Internal data transfer objects

mod comment;
mod like;
mod playlist;
mod session;
mod subscription;
mod tweet;
mod user;
mod video;

pub use comment::{Comment, CreateCommentInput};
pub use like::LikeTarget;
pub use playlist::{CreatePlaylistInput, Playlist, UpdatePlaylistInput};
pub use session::Session;
pub use subscription::ChannelProfile;
pub use tweet::{CreateTweetInput, Tweet, UpdateTweetInput};
pub use user::{CreateUserInput, User};
pub use video::{
    CreateVideoInput, ListParams, PagedResult, SearchFilters, SortDirection, SortField,
    TimeWindow, UpdateVideoInput, Video, VideoEngagement,
};
