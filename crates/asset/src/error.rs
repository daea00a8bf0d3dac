use std::io;
use std::path::PathBuf;

use thiserror::Error;

use photorepo_core::ValidationError;

use crate::transform::TransformError;

/// Errors that can occur during asset storage operations.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The asset name or upload file name was rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The requested asset variant does not exist.
    #[error("asset not found: {0}")]
    NotFound(String),

    /// A filesystem operation failed.
    #[error("io error at {}: {source}", path.display())]
    Io {
        /// The path the operation was acting on.
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The thumbnail collaborator rejected the image.
    #[error("thumbnail generation failed: {0}")]
    Transform(#[from] TransformError),
}

impl AssetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
