use std::path::PathBuf;

use photorepo_core::ValidationError;
use thiserror::Error;

/// Errors that can occur during album operations.
#[derive(Debug, Error)]
pub enum AlbumError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The id is not a live album, or its document vanished.
    #[error("album not found: {0}")]
    NotFound(String),

    /// Another album was created with the same millisecond id.
    #[error("album id already in use: {0}")]
    IdCollision(String),

    #[error("io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document on disk is not a valid album.
    #[error("malformed album document {}: {source}", path.display())]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl AlbumError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
