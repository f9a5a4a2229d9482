//! Disk cache tier.
//!
//! One regular file per key under the instance's cache directory: the file
//! name is the hashed key and the content is the raw bytes. Filesystem
//! metadata (timestamps, length) is the only persisted metadata; there is no
//! manifest or index. The disk tier is authoritative, the memory tier is a
//! volatile mirror of it.
//!
//! Mutations (`write`, `remove`, `remove_all`) run on the instance's I/O
//! queue and are best-effort: failures are logged and never surfaced to the
//! caller. `read`, `exists`, and `usage` are unqueued and can race a queued
//! mutation for the same key; see [`crate::TierCache::read`].
//!
//! Entries under the root that are themselves directories are not cache
//! entries and are skipped.

use std::io;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tokio::fs;
use tracing::{debug, warn};

use crate::key;

/// File-per-key store rooted at a cache instance's directory.
#[derive(Clone, Debug)]
pub(crate) struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    /// Create a store rooted at `root`. The directory itself is created on
    /// the first write, not here.
    pub(crate) fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// The directory holding this store's entries.
    pub(crate) fn root(&self) -> &Path {
        &self.root
    }

    /// Full path of the entry for `key`.
    pub(crate) fn path_for_key(&self, key: &str) -> PathBuf {
        key::path_for_key(&self.root, key)
    }

    /// Write `bytes` as the entry for `key`, creating the cache directory
    /// and any intermediates if absent.
    ///
    /// Runs on the I/O queue. A directory creation failure is logged and
    /// the file write is still attempted; a failed write is logged and
    /// dropped. A lost entry is only ever a future cache miss.
    pub(crate) async fn write(&self, key: &str, bytes: &[u8]) {
        if let Err(e) = fs::create_dir_all(&self.root).await {
            warn!(path = %self.root.display(), error = %e, "Failed to create cache directory");
        }

        let path = self.path_for_key(key);
        if let Err(e) = fs::write(&path, bytes).await {
            warn!(path = %path.display(), error = %e, "Failed to write cache entry");
        }
    }

    /// Read the entry for `key`.
    ///
    /// Unqueued: runs on the calling task and can race a queued delete or
    /// sweep of the same key. Absence is `None`, never an error; any other
    /// read failure is logged and reported as a miss.
    pub(crate) async fn read(&self, key: &str) -> Option<Bytes> {
        let path = self.path_for_key(key);
        match fs::read(&path).await {
            Ok(data) => Some(Bytes::from(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read cache entry");
                None
            }
        }
    }

    /// Whether a regular file exists for `key`. Unqueued.
    pub(crate) async fn exists(&self, key: &str) -> bool {
        match fs::metadata(self.path_for_key(key)).await {
            Ok(meta) => meta.is_file(),
            Err(_) => false,
        }
    }

    /// Remove the entry for `key`. Runs on the I/O queue; best-effort.
    pub(crate) async fn remove(&self, key: &str) {
        let path = self.path_for_key(key);
        match fs::remove_file(&path).await {
            Ok(()) => debug!(path = %path.display(), "Removed cache entry"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to remove cache entry");
            }
        }
    }

    /// Remove the entire cache directory. Runs on the I/O queue;
    /// best-effort. A later write recreates the directory.
    pub(crate) async fn remove_all(&self) {
        match fs::remove_dir_all(&self.root).await {
            Ok(()) => debug!(path = %self.root.display(), "Removed cache directory"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %self.root.display(), error = %e, "Failed to remove cache directory");
            }
        }
    }

    /// Total size in bytes of the regular files under the root.
    ///
    /// Unqueued. A missing directory is zero usage; entries that cannot be
    /// inspected are skipped.
    pub(crate) async fn usage(&self) -> u64 {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(_) => return 0,
        };

        let mut total = 0u64;
        while let Ok(Some(entry)) = entries.next_entry().await {
            if let Ok(meta) = entry.metadata().await {
                if meta.is_file() {
                    total += meta.len();
                }
            }
        }
        total
    }
}
