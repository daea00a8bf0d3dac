use std::path::{Path, PathBuf};

use photorepo_core::{AssetKind, AssetName, ValidationError};

use crate::error::AssetError;

/// Directory holding original images.
pub const IMAGE_DIR: &str = "images";
/// Directory holding downsized images, mirroring [`IMAGE_DIR`].
pub const IMAGE_XS_DIR: &str = "images-xs";
/// Directory holding videos.
pub const VIDEO_DIR: &str = "videos";

/// On-disk placement rules under a store root:
///
/// ```text
/// images/YYYY/MM/DD/<name>
/// images-xs/YYYY/MM/DD/<name>
/// videos/YYYY/MM/DD/<name>
/// ```
#[derive(Debug, Clone)]
pub struct StoreLayout {
    root: PathBuf,
}

/// The on-disk locations of one stored asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    pub name: AssetName,
    /// The original upload.
    pub primary: PathBuf,
    /// The downsized copy; `None` for videos.
    pub thumbnail: Option<PathBuf>,
}

impl StoreLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Root directory of the originals for `kind`.
    pub fn kind_root(&self, kind: AssetKind) -> PathBuf {
        match kind {
            AssetKind::Image => self.root.join(IMAGE_DIR),
            AssetKind::Video => self.root.join(VIDEO_DIR),
        }
    }

    /// Root directory of the downsized images.
    pub fn thumbnail_root(&self) -> PathBuf {
        self.root.join(IMAGE_XS_DIR)
    }

    /// Map a stored name back to its file locations.
    pub fn resolve(&self, name: &str) -> Result<ResolvedAsset, ValidationError> {
        let name = AssetName::parse(name)?;
        let (year, month, day) = name.date_partition();
        let relative = Path::new(year).join(month).join(day).join(name.as_str());

        let primary = self.kind_root(name.kind()).join(&relative);
        let thumbnail = name
            .kind()
            .has_thumbnail()
            .then(|| self.thumbnail_root().join(&relative));

        Ok(ResolvedAsset {
            name,
            primary,
            thumbnail,
        })
    }

    /// Create the three top-level asset directories.
    pub async fn ensure_dirs(&self) -> Result<(), AssetError> {
        for dir in [
            self.kind_root(AssetKind::Image),
            self.thumbnail_root(),
            self.kind_root(AssetKind::Video),
        ] {
            tokio::fs::create_dir_all(&dir)
                .await
                .map_err(|e| AssetError::io(&dir, e))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_image_has_mirrored_thumbnail() {
        let layout = StoreLayout::new("/store");
        let resolved = layout.resolve("20240315083000123.jpg").unwrap();
        assert_eq!(
            resolved.primary,
            PathBuf::from("/store/images/2024/03/15/20240315083000123.jpg")
        );
        assert_eq!(
            resolved.thumbnail,
            Some(PathBuf::from(
                "/store/images-xs/2024/03/15/20240315083000123.jpg"
            ))
        );
    }

    #[test]
    fn resolve_video_has_no_thumbnail() {
        let layout = StoreLayout::new("/store");
        let resolved = layout.resolve("20240315083000123.MOV").unwrap();
        assert_eq!(
            resolved.primary,
            PathBuf::from("/store/videos/2024/03/15/20240315083000123.MOV")
        );
        assert!(resolved.thumbnail.is_none());
    }

    #[test]
    fn resolve_rejects_unsupported_extension() {
        let layout = StoreLayout::new("/store");
        assert_eq!(
            layout.resolve("20240315083000123.txt").unwrap_err(),
            ValidationError::UnsupportedExtension(".txt".into())
        );
    }

    #[test]
    fn resolve_rejects_short_name() {
        let layout = StoreLayout::new("/store");
        assert!(matches!(
            layout.resolve("x.jpg"),
            Err(ValidationError::NameTooShort(_))
        ));
    }

    #[tokio::test]
    async fn ensure_dirs_creates_all_roots() {
        let dir = tempfile::tempdir().unwrap();
        let layout = StoreLayout::new(dir.path());
        layout.ensure_dirs().await.unwrap();
        assert!(dir.path().join(IMAGE_DIR).is_dir());
        assert!(dir.path().join(IMAGE_XS_DIR).is_dir());
        assert!(dir.path().join(VIDEO_DIR).is_dir());
    }
}
