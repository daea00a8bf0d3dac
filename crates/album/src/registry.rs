use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::{OwnedRwLockWriteGuard, RwLock};

/// Reader/writer lock guarding one album document.
pub type AlbumLock = Arc<RwLock<()>>;

/// Keyed registry of live album ids and their locks.
///
/// Registration, lookup and removal go through the sharded map, so they never
/// race with each other. The returned locks are held across document I/O;
/// the map shard itself is never held across an `.await`.
#[derive(Debug, Default)]
pub struct LockRegistry {
    locks: DashMap<String, AlbumLock>,
}

impl LockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `id` with a fresh lock, returned already write-locked.
    ///
    /// Returns `None` if the id is taken. The caller holds the guard until the
    /// document exists, so concurrent readers wait for it instead of seeing a
    /// missing file.
    pub fn register(&self, id: &str) -> Option<OwnedRwLockWriteGuard<()>> {
        match self.locks.entry(id.to_owned()) {
            Entry::Occupied(_) => None,
            Entry::Vacant(vacant) => {
                let lock: AlbumLock = Arc::new(RwLock::new(()));
                let guard = Arc::clone(&lock).try_write_owned().ok()?;
                vacant.insert(lock);
                Some(guard)
            }
        }
    }

    /// Register an id found on disk. Returns `false` if it was already present.
    pub fn insert(&self, id: &str) -> bool {
        match self.locks.entry(id.to_owned()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                vacant.insert(Arc::new(RwLock::new(())));
                true
            }
        }
    }

    /// The lock for a live id.
    pub fn get(&self, id: &str) -> Option<AlbumLock> {
        self.locks.get(id).map(|entry| Arc::clone(entry.value()))
    }

    /// Remove `id` if it is still bound to `lock`.
    ///
    /// A lock obtained before a delete never removes an entry registered
    /// after it.
    pub fn remove(&self, id: &str, lock: &AlbumLock) -> bool {
        self.locks
            .remove_if(id, |_, current| Arc::ptr_eq(current, lock))
            .is_some()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.locks.contains_key(id)
    }

    /// Every live id, ascending.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.locks.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
