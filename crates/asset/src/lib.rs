pub mod error;
pub mod layout;
pub mod naming;
pub mod store;
pub mod transform;

pub use error::AssetError;
pub use layout::{IMAGE_DIR, IMAGE_XS_DIR, ResolvedAsset, StoreLayout, VIDEO_DIR};
pub use naming::{DerivedName, NameDeriver, Reservation};
pub use store::{AssetStore, AssetVariant, UploadFailure, UploadItem, UploadReport};
pub use transform::{ExifData, ExifReader, ImageTransform, NoExif, TransformError};
