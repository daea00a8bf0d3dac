pub mod error;
pub mod registry;
pub mod store;

pub use error::AlbumError;
pub use registry::{AlbumLock, LockRegistry};
pub use store::{AlbumStore, TOMBSTONE_PREFIX};
