//! Album API endpoints.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;

use photorepo_core::Album;

use crate::error::ServerError;

use super::AppState;

/// Body of `POST /albums`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlbumRequest {
    pub name: String,
    #[serde(default)]
    pub photo_list: Vec<String>,
}

/// Body of `PUT /albums/{id}/name`.
#[derive(Debug, Deserialize)]
pub struct RenameAlbumRequest {
    pub name: String,
}

/// `GET /albums` -- every live album.
pub async fn list_albums(State(state): State<AppState>) -> Json<Vec<Album>> {
    Json(state.albums.list_all().await)
}

/// `POST /albums` -- create an album.
pub async fn create_album(
    State(state): State<AppState>,
    Json(body): Json<CreateAlbumRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let album = state.albums.create(&body.name, body.photo_list).await?;
    Ok((StatusCode::CREATED, Json(album)))
}

/// `GET /albums/{id}`
pub async fn get_album(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Album>, ServerError> {
    Ok(Json(state.albums.read(&id).await?))
}

/// `DELETE /albums/{id}` -- tombstone the album.
pub async fn delete_album(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.albums.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `PUT /albums/{id}/name`
pub async fn rename_album(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<RenameAlbumRequest>,
) -> Result<Json<Album>, ServerError> {
    Ok(Json(state.albums.rename(&id, &body.name).await?))
}

/// `POST /albums/{id}/photos`
pub async fn add_photos(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(names): Json<Vec<String>>,
) -> Result<Json<Album>, ServerError> {
    Ok(Json(state.albums.add_photos(&id, &names).await?))
}

/// `DELETE /albums/{id}/photos`
pub async fn remove_photos(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(names): Json<Vec<String>>,
) -> Result<Json<Album>, ServerError> {
    Ok(Json(state.albums.remove_photos(&id, &names).await?))
}
