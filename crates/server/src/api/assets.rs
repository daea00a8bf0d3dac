//! Asset endpoints: file streaming, listing, upload and delete.

use std::collections::BTreeMap;

use axum::Json;
use axum::body::Body;
use axum::extract::{Multipart, Path, Query, Request, State};
use axum::response::Response;
use serde::Deserialize;
use tower::ServiceExt;
use tower_http::services::ServeFile;

use photorepo_asset::{AssetError, AssetVariant, UploadItem, UploadReport};
use photorepo_core::AssetKind;

use crate::error::ServerError;

use super::AppState;

/// Multipart field carrying uploaded files.
const UPLOAD_FIELD: &str = "files";

/// Query parameters of the listing endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Name of the last asset already shown; the page holds strictly older
    /// assets. Absent or empty for the newest page.
    pub from_name: Option<String>,
}

/// `GET /image/{name}` -- the original image.
pub async fn image(
    State(state): State<AppState>,
    Path(name): Path<String>,
    request: Request,
) -> Result<Response, ServerError> {
    serve(&state, &name, AssetKind::Image, AssetVariant::Original, request).await
}

/// `GET /image-xs/{name}` -- the downsized image.
pub async fn image_xs(
    State(state): State<AppState>,
    Path(name): Path<String>,
    request: Request,
) -> Result<Response, ServerError> {
    serve(&state, &name, AssetKind::Image, AssetVariant::Thumbnail, request).await
}

/// `GET /video/{name}` -- the original video.
pub async fn video(
    State(state): State<AppState>,
    Path(name): Path<String>,
    request: Request,
) -> Result<Response, ServerError> {
    serve(&state, &name, AssetKind::Video, AssetVariant::Original, request).await
}

async fn serve(
    state: &AppState,
    name: &str,
    kind: AssetKind,
    variant: AssetVariant,
    request: Request,
) -> Result<Response, ServerError> {
    let resolved = state.assets.resolve(name)?;
    if resolved.name.kind() != kind {
        return Err(AssetError::NotFound(name.to_owned()).into());
    }
    let path = state.assets.locate(name, variant)?;

    let Ok(response) = ServeFile::new(path).oneshot(request).await;
    Ok(response.map(Body::new))
}

/// `GET /images?fromName=` -- one page of image names, newest first.
pub async fn list_images(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<String>>, ServerError> {
    list(&state, AssetKind::Image, query).await
}

/// `GET /videos?fromName=` -- one page of video names, newest first.
pub async fn list_videos(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<String>>, ServerError> {
    list(&state, AssetKind::Video, query).await
}

async fn list(
    state: &AppState,
    kind: AssetKind,
    query: ListQuery,
) -> Result<Json<Vec<String>>, ServerError> {
    let cursor = query.from_name.as_deref().filter(|c| !c.is_empty());
    let page = state.assets.list(kind, cursor, state.pager).await?;
    Ok(Json(page))
}

/// `POST /upload` -- store every `files` part of a multipart body.
///
/// Always answers 200 once the body is read; per-file failures are listed in
/// the report.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadReport>, ServerError> {
    let mut items = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_owned();
        let data = field
            .bytes()
            .await
            .map_err(|e| ServerError::BadRequest(e.body_text()))?;
        items.push(UploadItem::new(file_name, data));
    }

    let report = state.assets.upload(items).await;
    tracing::info!(
        stored = report.success_names.len(),
        failed = report.errors.len(),
        "upload finished"
    );
    Ok(Json(report))
}

/// `DELETE /delete` -- remove the named assets.
pub async fn delete(
    State(state): State<AppState>,
    Json(names): Json<Vec<String>>,
) -> Json<BTreeMap<String, bool>> {
    Json(state.assets.delete(&names).await)
}
