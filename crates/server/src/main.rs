use std::future::IntoFuture;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::Notify;
use tracing::info;

use photorepo_album::AlbumStore;
use photorepo_asset::AssetStore;
use photorepo_core::PageCursor;
use photorepo_imaging::{KamadakExifReader, ResizeTransform};
use photorepo_server::api::AppState;
use photorepo_server::config::PhotoRepoConfig;

/// Photo and video repository server.
#[derive(Parser, Debug)]
#[command(name = "photorepo-server", about = "HTTP server for the photorepo store")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "photorepo.toml")]
    config: String,

    /// Override the bind host.
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port.
    #[arg(long)]
    port: Option<u16>,

    /// Override the store root directory.
    #[arg(short = 'd', long)]
    store: Option<String>,

    /// Change into this directory before reading the config.
    #[arg(short = 'r', long)]
    root: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(ref root) = cli.root {
        std::env::set_current_dir(root)?;
    }

    let mut config = PhotoRepoConfig::load(Path::new(&cli.config))?;
    photorepo_server::telemetry::init(&config.telemetry);

    if !Path::new(&cli.config).exists() {
        info!(path = %cli.config, "config file not found, using defaults");
    }
    if let Some(store) = cli.store {
        config.storage.root = store;
    }

    // Storage.
    let transform = ResizeTransform::new(config.thumbnail.width, config.thumbnail.quality);
    let assets = AssetStore::new(
        config.storage.root_path(),
        Arc::new(KamadakExifReader),
        Arc::new(transform),
    );
    assets.init().await?;
    let albums = AlbumStore::open(config.storage.album_path()).await?;

    let static_dir = config.static_dir();
    let state = AppState {
        assets: Arc::new(assets),
        albums: Arc::new(albums),
        pager: PageCursor::new(config.listing.page_size),
        max_body_bytes: config.upload.max_body_bytes,
        static_path: static_dir.map(|dir| dir.to_string_lossy().into_owned()),
        static_enabled: config.static_files.enabled,
    };
    let app = photorepo_server::api::router(state);

    // Resolve the bind address (CLI overrides take precedence).
    let host = cli.host.unwrap_or(config.server.host);
    let port = cli.port.unwrap_or(config.server.port);
    let addr = format!("{host}:{port}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "photorepo-server listening");

    let stop = Arc::new(Notify::new());
    let server = {
        let stop = Arc::clone(&stop);
        tokio::spawn(
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { stop.notified().await })
                .into_future(),
        )
    };

    shutdown_signal().await;
    stop.notify_one();

    // Give in-flight requests a bounded time to finish.
    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_seconds);
    match tokio::time::timeout(shutdown_timeout, server).await {
        Ok(joined) => joined??,
        Err(_) => tracing::warn!(
            timeout_secs = config.server.shutdown_timeout_seconds,
            "shutdown timeout exceeded, dropping in-flight requests"
        ),
    }

    info!("photorepo-server shut down");
    Ok(())
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM, then return to trigger graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { info!("received SIGINT"); }
        () = terminate => { info!("received SIGTERM"); }
    }
}
