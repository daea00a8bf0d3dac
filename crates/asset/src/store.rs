use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use walkdir::WalkDir;

use photorepo_core::{AssetKind, Clock, PageCursor, SystemClock, prefix};

use crate::error::AssetError;
use crate::layout::{ResolvedAsset, StoreLayout};
use crate::naming::{DerivedName, NameDeriver, Reservation};
use crate::transform::{ExifData, ExifReader, ImageTransform};

/// One file of an upload request.
#[derive(Debug, Clone)]
pub struct UploadItem {
    /// The file name the client declared.
    pub file_name: String,
    pub data: Bytes,
}

impl UploadItem {
    pub fn new(file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            data: data.into(),
        }
    }
}

/// A single item that could not be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadFailure {
    /// The declared file name.
    pub file: String,
    pub error: String,
}

/// Per-item outcome of an upload request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReport {
    /// Stored names, newest first.
    pub success_names: Vec<String>,
    pub errors: Vec<UploadFailure>,
}

/// Which physical copy of an asset to address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetVariant {
    Original,
    Thumbnail,
}

/// Filesystem-backed photo and video store.
///
/// Uploads are placed by [`NameDeriver`]; every image also gets a downsized
/// copy from the configured [`ImageTransform`]. Nothing besides the
/// directory layout links an original to its thumbnail.
pub struct AssetStore {
    layout: StoreLayout,
    deriver: NameDeriver,
    exif: Arc<dyn ExifReader>,
    transform: Arc<dyn ImageTransform>,
}

impl std::fmt::Debug for AssetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetStore")
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

impl AssetStore {
    /// Create a store rooted at `root` using the system clock.
    pub fn new(
        root: impl Into<PathBuf>,
        exif: Arc<dyn ExifReader>,
        transform: Arc<dyn ImageTransform>,
    ) -> Self {
        Self {
            layout: StoreLayout::new(root),
            deriver: NameDeriver::new(Arc::new(SystemClock)),
            exif,
            transform,
        }
    }

    /// Replace the clock used for naming.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.deriver = NameDeriver::new(clock);
        self
    }

    pub fn layout(&self) -> &StoreLayout {
        &self.layout
    }

    /// Create the asset directories if they are missing.
    pub async fn init(&self) -> Result<(), AssetError> {
        self.layout.ensure_dirs().await?;
        tracing::info!(root = %self.layout.root().display(), "asset store ready");
        Ok(())
    }

    /// Store every item independently; one bad item never fails the batch.
    pub async fn upload(&self, items: Vec<UploadItem>) -> UploadReport {
        let mut report = UploadReport::default();

        for item in items {
            match self.store_one(&item).await {
                Ok(name) => {
                    tracing::debug!(file = %item.file_name, name = %name, "asset stored");
                    report.success_names.push(name);
                }
                Err(e) => {
                    tracing::warn!(file = %item.file_name, error = %e, "asset upload failed");
                    report.errors.push(UploadFailure {
                        file: item.file_name,
                        error: e.to_string(),
                    });
                }
            }
        }

        report
            .success_names
            .sort_by(|a, b| prefix(b).cmp(prefix(a)));
        report
    }

    async fn store_one(&self, item: &UploadItem) -> Result<String, AssetError> {
        let kind = AssetKind::from_file_name(&item.file_name)?;

        let exif = if kind.has_thumbnail() {
            self.exif.read(item.data.clone()).await
        } else {
            ExifData::default()
        };

        let Reservation {
            derived,
            path,
            mut file,
        } = self
            .deriver
            .reserve(&self.layout, &item.file_name, exif.captured_at)
            .await?;

        let written = async {
            file.write_all(&item.data).await?;
            file.flush().await
        }
        .await;
        drop(file);
        if let Err(e) = written {
            discard(&path).await;
            return Err(AssetError::io(path, e));
        }

        if kind.has_thumbnail()
            && let Err(e) = self
                .write_thumbnail(&derived, item.data.clone(), exif.orientation)
                .await
        {
            discard(&path).await;
            return Err(e);
        }

        Ok(derived.name)
    }

    async fn write_thumbnail(
        &self,
        derived: &DerivedName,
        data: Bytes,
        orientation: Option<u16>,
    ) -> Result<(), AssetError> {
        let resized = self.transform.downsize(data, orientation).await?;

        let path = self
            .layout
            .thumbnail_root()
            .join(&derived.date_path)
            .join(&derived.name);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AssetError::io(parent, e))?;
        }
        if let Err(e) = tokio::fs::write(&path, &resized).await {
            discard(&path).await;
            return Err(AssetError::io(path, e));
        }
        Ok(())
    }

    /// Every stored original of `kind`, by base name, in no particular order.
    pub async fn enumerate(&self, kind: AssetKind) -> Result<Vec<String>, AssetError> {
        let root = self.layout.kind_root(kind);
        let walk_root = root.clone();
        tokio::task::spawn_blocking(move || walk(&walk_root))
            .await
            .map_err(|e| AssetError::io(root, std::io::Error::other(e)))?
    }

    /// One page of `kind` assets, newest first, strictly older than `cursor`.
    pub async fn list(
        &self,
        kind: AssetKind,
        cursor: Option<&str>,
        pager: PageCursor,
    ) -> Result<Vec<String>, AssetError> {
        let names = self.enumerate(kind).await?;
        Ok(pager.page(names, cursor)?)
    }

    /// Map a stored name to its file locations.
    pub fn resolve(&self, name: &str) -> Result<ResolvedAsset, AssetError> {
        Ok(self.layout.resolve(name)?)
    }

    /// Path of one variant of a stored asset.
    pub fn locate(&self, name: &str, variant: AssetVariant) -> Result<PathBuf, AssetError> {
        let resolved = self.resolve(name)?;
        match variant {
            AssetVariant::Original => Ok(resolved.primary),
            AssetVariant::Thumbnail => resolved
                .thumbnail
                .ok_or_else(|| AssetError::NotFound(name.to_owned())),
        }
    }

    /// Remove each named asset and its thumbnail.
    ///
    /// A name maps to `true` only when every applicable removal succeeded.
    /// Names are handled independently and nothing is rolled back.
    pub async fn delete(&self, names: &[String]) -> BTreeMap<String, bool> {
        let mut result = BTreeMap::new();
        for name in names {
            let removed = match self.layout.resolve(name) {
                Ok(resolved) => remove_resolved(&resolved).await,
                Err(e) => {
                    tracing::warn!(name = %name, error = %e, "cannot delete asset");
                    false
                }
            };
            result.insert(name.clone(), removed);
        }
        result
    }
}

async fn remove_resolved(resolved: &ResolvedAsset) -> bool {
    let primary = match tokio::fs::remove_file(&resolved.primary).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(
                path = %resolved.primary.display(),
                error = %e,
                "failed to remove asset"
            );
            false
        }
    };

    let thumbnail = match &resolved.thumbnail {
        None => true,
        Some(path) => match tokio::fs::remove_file(path).await {
            Ok(()) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => true,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to remove thumbnail");
                false
            }
        },
    };

    primary && thumbnail
}

/// Best-effort removal of a partially written file.
async fn discard(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await
        && e.kind() != ErrorKind::NotFound
    {
        tracing::warn!(path = %path.display(), error = %e, "failed to clean up partial asset");
    }
}

fn walk(root: &Path) -> Result<Vec<String>, AssetError> {
    if !root.exists() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|e| AssetError::io(root, e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str()
            && !name.starts_with('.')
        {
            names.push(name.to_owned());
        }
    }
    Ok(names)
}
