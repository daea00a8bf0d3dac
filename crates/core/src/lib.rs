pub mod album;
pub mod asset;
pub mod clock;
pub mod error;
pub mod page;

pub use album::Album;
pub use asset::{
    AssetKind, AssetName, FILENAME_LEN, IMAGE_EXTENSIONS, VIDEO_EXTENSIONS, extension, prefix,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::ValidationError;
pub use page::{DEFAULT_PAGE_SIZE, PageCursor};
