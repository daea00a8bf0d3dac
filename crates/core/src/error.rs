use thiserror::Error;

use crate::asset::FILENAME_LEN;

/// Input rejected before any side effect took place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Album names must be non-empty.
    #[error("album name cannot be empty")]
    EmptyAlbumName,

    /// An asset name shorter than the timestamp prefix.
    #[error("asset name must be at least {FILENAME_LEN} characters: {0}")]
    NameTooShort(String),

    /// An asset name whose prefix is not a `YYYYMMDDHHMMSSmmm` timestamp,
    /// or that carries path separators.
    #[error("asset name must be a {FILENAME_LEN}-digit timestamp followed by an extension: {0}")]
    MalformedName(String),

    /// The extension is on neither the image nor the video allow-list.
    #[error("file type [{0}] is not allowed, only images and videos are accepted")]
    UnsupportedExtension(String),
}
