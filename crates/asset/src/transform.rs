use async_trait::async_trait;
use bytes::Bytes;
use chrono::NaiveDateTime;
use thiserror::Error;

/// Metadata pulled from an image's EXIF block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExifData {
    /// When the picture was taken, in the camera's local time.
    pub captured_at: Option<NaiveDateTime>,
    /// EXIF orientation code (1-8).
    pub orientation: Option<u16>,
}

/// Reads capture metadata from raw image bytes.
///
/// Implementations never fail: unreadable or missing EXIF yields
/// [`ExifData::default`].
#[async_trait]
pub trait ExifReader: Send + Sync {
    async fn read(&self, data: Bytes) -> ExifData;
}

/// An [`ExifReader`] that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExif;

#[async_trait]
impl ExifReader for NoExif {
    async fn read(&self, _data: Bytes) -> ExifData {
        ExifData::default()
    }
}

/// Errors produced while building a downsized image.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The input could not be decoded as an image.
    #[error("decode failed: {0}")]
    Decode(String),

    /// The resized image could not be encoded.
    #[error("encode failed: {0}")]
    Encode(String),

    /// The background task running the transform died.
    #[error("transform task failed: {0}")]
    Task(String),
}

/// Produces the downsized copy stored under `images-xs`.
#[async_trait]
pub trait ImageTransform: Send + Sync {
    /// Resize `data`, first rotating it upright according to `orientation`.
    async fn downsize(
        &self,
        data: Bytes,
        orientation: Option<u16>,
    ) -> Result<Bytes, TransformError>;
}
