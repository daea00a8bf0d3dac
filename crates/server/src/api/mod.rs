pub mod albums;
pub mod assets;
pub mod health;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post, put};
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use photorepo_album::AlbumStore;
use photorepo_asset::AssetStore;
use photorepo_core::PageCursor;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Photo and video storage.
    pub assets: Arc<AssetStore>,
    /// Album documents.
    pub albums: Arc<AlbumStore>,
    /// Page size used by the listing endpoints.
    pub pager: PageCursor,
    /// Largest accepted request body, in bytes.
    pub max_body_bytes: usize,
    /// Path to the front-end static files.
    pub static_path: Option<String>,
    /// Whether the front-end is served.
    pub static_enabled: bool,
}

/// Build the Axum router with all API routes and middleware.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health::health))
        // Asset files
        .route("/image/{name}", get(assets::image))
        .route("/image-xs/{name}", get(assets::image_xs))
        .route("/video/{name}", get(assets::video))
        // Listing
        .route("/images", get(assets::list_images))
        .route("/videos", get(assets::list_videos))
        // Upload & delete
        .route("/upload", post(assets::upload))
        .route("/delete", delete(assets::delete))
        // Albums
        .route("/albums", get(albums::list_albums).post(albums::create_album))
        .route(
            "/albums/{id}",
            get(albums::get_album).delete(albums::delete_album),
        )
        .route("/albums/{id}/name", put(albums::rename_album))
        .route(
            "/albums/{id}/photos",
            post(albums::add_photos).delete(albums::remove_photos),
        );

    let mut router = api;

    if let Some(path_str) = state.static_path.as_ref().filter(|_| state.static_enabled) {
        let path = std::path::PathBuf::from(path_str);
        if path.exists() {
            let index_path = path.join("index.html");
            router = router.fallback_service(ServeDir::new(path).fallback(ServeFile::new(index_path)));
        } else {
            tracing::warn!(
                path = %path.display(),
                "static file directory not found, front-end will not be served"
            );
        }
    }

    let body_limit = state.max_body_bytes;
    router
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
