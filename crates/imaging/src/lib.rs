//! Concrete [`ExifReader`](photorepo_asset::ExifReader) and
//! [`ImageTransform`](photorepo_asset::ImageTransform) implementations.

pub mod metadata;
pub mod resize;

pub use metadata::KamadakExifReader;
pub use resize::{DEFAULT_QUALITY, DEFAULT_WIDTH, ResizeTransform};
