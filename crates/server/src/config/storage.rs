use std::path::PathBuf;

use serde::Deserialize;

/// On-disk locations.
#[derive(Debug, Deserialize)]
pub struct StorageConfig {
    /// Root of the `images/`, `images-xs/` and `videos/` trees.
    #[serde(default = "default_root")]
    pub root: String,
    /// Album document directory, relative to `root` unless absolute.
    #[serde(default = "default_album_dir")]
    pub album_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            album_dir: default_album_dir(),
        }
    }
}

impl StorageConfig {
    pub fn root_path(&self) -> PathBuf {
        PathBuf::from(&self.root)
    }

    pub fn album_path(&self) -> PathBuf {
        self.root_path().join(&self.album_dir)
    }
}

fn default_root() -> String {
    "./files".to_owned()
}

fn default_album_dir() -> String {
    "albums".to_owned()
}

/// Asset listing configuration.
#[derive(Debug, Deserialize)]
pub struct ListingConfig {
    /// Names returned per page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

fn default_page_size() -> usize {
    photorepo_core::DEFAULT_PAGE_SIZE
}

/// Upload request limits.
#[derive(Debug, Deserialize)]
pub struct UploadConfig {
    /// Largest accepted request body, in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_max_body_bytes() -> usize {
    512 * 1024 * 1024
}

/// Downsized image settings.
#[derive(Debug, Deserialize)]
pub struct ThumbnailConfig {
    /// Target width in pixels; narrower images keep their size.
    #[serde(default = "default_thumbnail_width")]
    pub width: u32,
    /// JPEG quality, 1-100.
    #[serde(default = "default_thumbnail_quality")]
    pub quality: u8,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            width: default_thumbnail_width(),
            quality: default_thumbnail_quality(),
        }
    }
}

fn default_thumbnail_width() -> u32 {
    photorepo_imaging::DEFAULT_WIDTH
}

fn default_thumbnail_quality() -> u8 {
    photorepo_imaging::DEFAULT_QUALITY
}
