//! Playlist endpoints

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;

use super::middleware::{ApiError, AppState, AuthenticatedUser};
use super::responses::{ApiResponse, Created};
use crate::models::{CreatePlaylistInput, Playlist, UpdatePlaylistInput};

/// Request body for creating a playlist
#[derive(Debug, Deserialize)]
pub struct CreatePlaylistBody {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// POST /playlists
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(body): Json<CreatePlaylistBody>,
) -> Result<Created<Playlist>, ApiError> {
    let playlist = state
        .playlist_service
        .create(CreatePlaylistInput {
            owner_id: user.0.id,
            name: body.name,
            description: body.description,
        })
        .await?;
    Ok(Created::new(playlist, "Playlist created"))
}

/// GET /playlists/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ApiResponse<Playlist>, ApiError> {
    let playlist = state.playlist_service.get(id).await?;
    Ok(ApiResponse::ok(playlist))
}

/// GET /playlists/user/{user_id}
pub async fn list_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<ApiResponse<Vec<Playlist>>, ApiError> {
    let playlists = state.playlist_service.list_for_user(user_id).await?;
    Ok(ApiResponse::ok(playlists))
}

/// Request body for editing a playlist
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePlaylistBody {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// PATCH /playlists/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
    Json(body): Json<UpdatePlaylistBody>,
) -> Result<ApiResponse<Playlist>, ApiError> {
    let playlist = state
        .playlist_service
        .update(
            id,
            user.0.id,
            UpdatePlaylistInput {
                name: body.name,
                description: body.description,
            },
        )
        .await?;
    Ok(ApiResponse::with_message(playlist, "Playlist updated"))
}

/// DELETE /playlists/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<ApiResponse<()>, ApiError> {
    state.playlist_service.delete(id, user.0.id).await?;
    Ok(ApiResponse::with_message((), "Playlist deleted"))
}

/// PATCH /playlists/add/{video_id}/{playlist_id}
pub async fn add_video(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((video_id, playlist_id)): Path<(i64, i64)>,
) -> Result<ApiResponse<Playlist>, ApiError> {
    let playlist = state
        .playlist_service
        .add_video(playlist_id, user.0.id, video_id)
        .await?;
    Ok(ApiResponse::with_message(playlist, "Video added to playlist"))
}

/// PATCH /playlists/remove/{video_id}/{playlist_id}
pub async fn remove_video(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((video_id, playlist_id)): Path<(i64, i64)>,
) -> Result<ApiResponse<Playlist>, ApiError> {
    let playlist = state
        .playlist_service
        .remove_video(playlist_id, user.0.id, video_id)
        .await?;
    Ok(ApiResponse::with_message(
        playlist,
        "Video removed from playlist",
    ))
}
