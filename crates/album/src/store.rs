//! File-backed album documents.
//!
//! Each live album is one pretty-printed JSON file named by its id inside the
//! album directory. Deleting an album renames its file to `_<id>`; the
//! tombstone stays on disk and is ignored from then on.
//!
//! Reads take the album's lock in shared mode; updates and deletes take it
//! exclusively, so a read-modify-write on one album never loses a concurrent
//! update. Different albums never contend.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use uuid::Uuid;

use photorepo_core::{Album, Clock, SystemClock, ValidationError};

use crate::error::AlbumError;
use crate::registry::LockRegistry;

/// File name prefix marking a deleted album.
pub const TOMBSTONE_PREFIX: char = '_';

/// Suffix of the scratch files written during an update.
const TEMP_SUFFIX: &str = ".tmp";

/// Album documents under one directory.
#[derive(Debug)]
pub struct AlbumStore {
    dir: PathBuf,
    registry: LockRegistry,
    clock: Arc<dyn Clock>,
}

impl AlbumStore {
    /// Open the album directory, creating it if missing, and register every
    /// live document found in it.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, AlbumError> {
        Self::open_with_clock(dir, Arc::new(SystemClock)).await
    }

    /// Like [`AlbumStore::open`], minting ids from `clock`.
    pub async fn open_with_clock(
        dir: impl Into<PathBuf>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AlbumError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| AlbumError::io(&dir, e))?;

        let registry = LockRegistry::new();
        let mut entries = tokio::fs::read_dir(&dir)
            .await
            .map_err(|e| AlbumError::io(&dir, e))?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| AlbumError::io(&dir, e))?
        {
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| AlbumError::io(entry.path(), e))?;
            if !file_type.is_file() {
                continue;
            }
            if let Some(id) = entry.file_name().to_str()
                && is_live_document(id)
            {
                registry.insert(id);
            }
        }

        tracing::info!(dir = %dir.display(), albums = registry.len(), "album store opened");
        Ok(Self {
            dir,
            registry,
            clock,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of live albums.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Create an album whose id is the current epoch millisecond.
    ///
    /// A second create within the same millisecond fails with
    /// [`AlbumError::IdCollision`]; it is not retried.
    pub async fn create(&self, name: &str, photos: Vec<String>) -> Result<Album, AlbumError> {
        if name.is_empty() {
            return Err(ValidationError::EmptyAlbumName.into());
        }

        let id = self.clock.now().timestamp_millis().to_string();
        let Some(guard) = self.registry.register(&id) else {
            return Err(AlbumError::IdCollision(id));
        };

        let album = Album::new(id.clone(), name, photos);
        let path = self.document_path(&id);
        if let Err(e) = write_new(&path, &album).await {
            if let Some(lock) = self.registry.get(&id) {
                self.registry.remove(&id, &lock);
            }
            drop(guard);
            return Err(e);
        }
        drop(guard);

        tracing::info!(id = %id, name = %album.name, "album created");
        Ok(album)
    }

    /// Load a live album.
    pub async fn read(&self, id: &str) -> Result<Album, AlbumError> {
        let lock = self
            .registry
            .get(id)
            .ok_or_else(|| AlbumError::NotFound(id.to_owned()))?;
        let _guard = lock.read().await;
        self.load(id).await
    }

    /// Apply `mutator` to the album under its exclusive lock and persist the
    /// result.
    ///
    /// The new document is written to a temp file beside the old one and
    /// renamed over it, so a crash leaves either the old or the new version.
    pub async fn update<F>(&self, id: &str, mutator: F) -> Result<Album, AlbumError>
    where
        F: FnOnce(&mut Album) + Send,
    {
        let lock = self
            .registry
            .get(id)
            .ok_or_else(|| AlbumError::NotFound(id.to_owned()))?;
        let _guard = lock.write().await;

        let mut album = self.load(id).await?;
        mutator(&mut album);
        self.replace(id, &album).await?;
        Ok(album)
    }

    /// Add names to the album; duplicates collapse, newest first.
    pub async fn add_photos(&self, id: &str, names: &[String]) -> Result<Album, AlbumError> {
        self.update(id, |album| album.add_photos(names)).await
    }

    /// Remove names from the album. Removing an absent name is a no-op.
    pub async fn remove_photos(&self, id: &str, names: &[String]) -> Result<Album, AlbumError> {
        self.update(id, |album| album.remove_photos(names)).await
    }

    pub async fn rename(&self, id: &str, name: &str) -> Result<Album, AlbumError> {
        if name.is_empty() {
            return Err(ValidationError::EmptyAlbumName.into());
        }
        self.update(id, |album| name.clone_into(&mut album.name))
            .await
    }

    /// Tombstone the album and drop it from the registry.
    pub async fn delete(&self, id: &str) -> Result<(), AlbumError> {
        let lock = self
            .registry
            .get(id)
            .ok_or_else(|| AlbumError::NotFound(id.to_owned()))?;
        let _guard = lock.write().await;

        let from = self.document_path(id);
        let to = self.dir.join(format!("{TOMBSTONE_PREFIX}{id}"));
        match tokio::fs::rename(&from, &to).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.registry.remove(id, &lock);
                return Err(AlbumError::NotFound(id.to_owned()));
            }
            Err(e) => return Err(AlbumError::io(from, e)),
        }
        self.registry.remove(id, &lock);

        tracing::info!(id = %id, "album deleted");
        Ok(())
    }

    /// Every live album, oldest first. Albums that fail to load are skipped.
    pub async fn list_all(&self) -> Vec<Album> {
        let mut albums = Vec::new();
        for id in self.registry.ids() {
            match self.read(&id).await {
                Ok(album) => albums.push(album),
                Err(e) => tracing::debug!(id = %id, error = %e, "skipping unreadable album"),
            }
        }
        albums
    }

    fn document_path(&self, id: &str) -> PathBuf {
        self.dir.join(id)
    }

    async fn load(&self, id: &str) -> Result<Album, AlbumError> {
        let path = self.document_path(id);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(AlbumError::NotFound(id.to_owned()));
            }
            Err(e) => return Err(AlbumError::io(path, e)),
        };
        serde_json::from_slice(&bytes).map_err(|source| AlbumError::Serialization { path, source })
    }

    async fn replace(&self, id: &str, album: &Album) -> Result<(), AlbumError> {
        let path = self.document_path(id);
        let temp = self
            .dir
            .join(format!(".{id}.{}{TEMP_SUFFIX}", Uuid::new_v4().simple()));

        if let Err(e) = write_new(&temp, album).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(e);
        }
        if let Err(e) = tokio::fs::rename(&temp, &path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(AlbumError::io(path, e));
        }
        Ok(())
    }
}

/// Whether a file in the album directory is a live document.
fn is_live_document(file_name: &str) -> bool {
    !file_name.starts_with('.')
        && !file_name.starts_with(TOMBSTONE_PREFIX)
        && !file_name.ends_with(TEMP_SUFFIX)
}

/// Serialize `album` into a file that must not exist yet.
async fn write_new(path: &Path, album: &Album) -> Result<(), AlbumError> {
    let body = serde_json::to_vec_pretty(album).map_err(|source| AlbumError::Serialization {
        path: path.to_owned(),
        source,
    })?;

    let mut file = match tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
    {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            let id = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            return Err(AlbumError::IdCollision(id));
        }
        Err(e) => return Err(AlbumError::io(path, e)),
    };

    fill_or_discard(path, &mut file, &body).await
}

/// Write `body` to the freshly created file at `path`. On failure the file is
/// removed so a half-written document never survives.
async fn fill_or_discard<W>(path: &Path, out: &mut W, body: &[u8]) -> Result<(), AlbumError>
where
    W: AsyncWrite + Unpin,
{
    let written = async {
        out.write_all(body).await?;
        out.flush().await
    }
    .await;
    if let Err(e) = written {
        let _ = tokio::fs::remove_file(path).await;
        return Err(AlbumError::io(path, e));
    }
    Ok(())
}
