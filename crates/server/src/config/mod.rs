mod server;
mod storage;
mod telemetry;

#[cfg(test)]
mod tests;

pub use server::*;
pub use storage::*;
pub use telemetry::*;

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ServerError;

/// Top-level configuration for the photorepo server, loaded from a TOML file.
#[derive(Debug, Default, Deserialize)]
pub struct PhotoRepoConfig {
    /// HTTP server bind configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Where assets and albums live on disk.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Asset listing configuration.
    #[serde(default)]
    pub listing: ListingConfig,
    /// Upload request limits.
    #[serde(default)]
    pub upload: UploadConfig,
    /// Downsized image settings.
    #[serde(default)]
    pub thumbnail: ThumbnailConfig,
    /// Web front-end static files.
    #[serde(default)]
    pub static_files: StaticFilesConfig,
    /// Log output configuration.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl PhotoRepoConfig {
    /// Load configuration from `path`, or use defaults if the file does not
    /// exist.
    pub fn load(path: &Path) -> Result<Self, ServerError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))
    }

    /// Directory to serve the front-end from, if any.
    ///
    /// `None` when static serving is disabled or when the directory would
    /// expose the storage root (album documents, tombstones included).
    pub fn static_dir(&self) -> Option<PathBuf> {
        if !self.static_files.enabled {
            return None;
        }
        let dist = PathBuf::from(&self.static_files.dist_path);
        let (Ok(dist_abs), Ok(root_abs)) = (
            std::path::absolute(&dist),
            std::path::absolute(self.storage.root_path()),
        ) else {
            return None;
        };
        if root_abs.starts_with(&dist_abs) {
            tracing::warn!(
                dist = %dist.display(),
                root = %self.storage.root,
                "static directory contains the storage root, front-end will not be served"
            );
            return None;
        }
        Some(dist)
    }
}
