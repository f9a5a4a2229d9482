//! Two-tier cache facade.
//!
//! [`TierCache`] composes the memory and disk tiers: writes land in memory
//! before the call returns and are persisted through the instance's I/O
//! queue; reads consult memory first and fall back to disk, backfilling
//! memory on a hit. The disk tier is authoritative; the memory tier is a
//! volatile mirror whose entries can be evicted at any time.
//!
//! # Shared instance
//!
//! [`TierCache::shared`] returns a lazily initialized, process-wide
//! instance named `default`. It is a convenience, not a requirement:
//! independently configured instances come from [`TierCache::new`] or
//! [`TierCache::with_config`] and never share a directory or queue.
//!
//! # Host lifecycle
//!
//! The cache knows nothing about OS lifecycle mechanisms. Hosts that want
//! expiry on "will terminate" or "entered background" call
//! [`TierCache::clean_expired_disk_cache`] from their own hooks, and
//! [`TierCache::shutdown`] when tearing an instance down.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use bytes::Bytes;
use tokio::sync::oneshot;
use tracing::debug;

use crate::config::CacheConfig;
use crate::disk::DiskStore;
use crate::io::{IoJob, IoQueue};
use crate::memory::MemoryCache;
use crate::sweep::SweepStats;

/// Completion handle for a queued sweep.
///
/// Dropping the handle does not cancel anything: the sweep is already
/// queued and runs to completion. The handle only carries the outcome back
/// to whoever wants it.
#[derive(Debug)]
pub struct SweepHandle {
    rx: oneshot::Receiver<SweepStats>,
}

impl SweepHandle {
    /// Wait for the sweep to finish and return its statistics.
    ///
    /// Returns empty statistics if the worker stopped before the sweep
    /// could run.
    pub async fn finished(self) -> SweepStats {
        self.rx.await.unwrap_or_default()
    }
}

/// A named two-tier cache instance.
pub struct TierCache {
    config: CacheConfig,
    memory: MemoryCache,
    disk: DiskStore,
    queue: IoQueue,
}

impl TierCache {
    /// Create an instance named `name` with default configuration.
    ///
    /// Construction spawns the instance's I/O worker, so it must happen
    /// within a Tokio runtime context. The cache directory itself is
    /// created on the first disk write.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(CacheConfig::new(name))
    }

    /// Create an instance from an explicit configuration.
    pub fn with_config(config: CacheConfig) -> Self {
        let disk = DiskStore::new(config.cache_path());
        let queue = IoQueue::spawn(
            disk.clone(),
            config.max_cache_period,
            config.max_disk_cache_size,
        );
        let memory = MemoryCache::new(config.memory_capacity);

        debug!(name = %config.name, path = %disk.root().display(), "Cache instance created");

        Self {
            config,
            memory,
            disk,
            queue,
        }
    }

    /// The process-wide shared instance, named `default`.
    ///
    /// Lazily initialized on first access and alive for the rest of the
    /// process, so it is never shut down. First access must happen within
    /// a Tokio runtime context.
    pub fn shared() -> &'static TierCache {
        static SHARED: OnceLock<TierCache> = OnceLock::new();
        SHARED.get_or_init(|| TierCache::new("default"))
    }

    /// Instance name.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// The configuration this instance was created from.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Directory holding this instance's disk entries.
    pub fn cache_path(&self) -> &Path {
        self.disk.root()
    }

    /// Where the entry for `key` lives (or would live) on disk.
    pub fn path_for_key(&self, key: &str) -> PathBuf {
        self.disk.path_for_key(key)
    }

    // =========================================================================
    // Store and read
    // =========================================================================

    /// Write `bytes` as the entry for `key`.
    ///
    /// The memory tier holds the entry when this returns; the disk write is
    /// queued and persists eventually. Persistence failures are logged and
    /// never surfaced: a lost entry is a future cache miss, nothing worse.
    pub async fn write(&self, key: &str, bytes: impl Into<Bytes>) {
        let bytes = bytes.into();
        self.memory.insert(key, bytes.clone()).await;
        self.queue.submit(IoJob::Write {
            key: key.to_string(),
            bytes,
        });
    }

    /// Read the entry for `key`.
    ///
    /// A memory hit returns immediately. On a miss the disk tier is read
    /// directly on the calling task, without going through the I/O queue,
    /// and a hit backfills the memory tier. Because the read is unqueued it
    /// can race a queued delete or sweep of the same key and observe the
    /// old content, no content, or a partially written file on filesystems
    /// with non-atomic writes. Absence at both tiers is `None`, not an
    /// error.
    pub async fn read(&self, key: &str) -> Option<Bytes> {
        if let Some(bytes) = self.memory.get(key).await {
            return Some(bytes);
        }

        let bytes = self.disk.read(key).await?;
        self.memory.insert(key, bytes.clone()).await;
        Some(bytes)
    }

    /// Read the entry for `key` from the disk tier only.
    ///
    /// No memory lookup and no backfill. Unqueued, like [`TierCache::read`].
    pub async fn read_from_disk(&self, key: &str) -> Option<Bytes> {
        self.disk.read(key).await
    }

    // =========================================================================
    // Existence checks
    // =========================================================================

    /// Whether the disk tier currently holds an entry for `key`.
    pub async fn has_data_on_disk(&self, key: &str) -> bool {
        self.disk.exists(key).await
    }

    /// Whether the memory tier currently holds an entry for `key`.
    ///
    /// Memory entries can be evicted at any time, so a `false` here says
    /// nothing about the disk tier.
    pub fn has_data_on_mem(&self, key: &str) -> bool {
        self.memory.contains(key)
    }

    /// Whether either tier holds an entry for `key`.
    pub async fn has_data(&self, key: &str) -> bool {
        self.has_data_on_mem(key) || self.has_data_on_disk(key).await
    }

    // =========================================================================
    // Clean
    // =========================================================================

    /// Remove the entry for `key` from both tiers.
    ///
    /// The memory removal completes before this returns; the disk removal
    /// is queued.
    pub async fn clean(&self, key: &str) {
        self.memory.remove(key).await;
        self.queue.submit(IoJob::Remove {
            key: key.to_string(),
        });
    }

    /// Drop every memory entry. The disk tier is untouched.
    pub fn clean_mem_cache(&self) {
        self.memory.clear();
    }

    /// Queue removal of the entire cache directory.
    pub fn clean_disk_cache(&self) {
        self.queue.submit(IoJob::RemoveAll);
    }

    /// Drop every memory entry and queue removal of the cache directory.
    pub fn clean_all(&self) {
        self.clean_mem_cache();
        self.clean_disk_cache();
    }

    /// Queue an expiry/size-cap sweep over the disk tier.
    ///
    /// The sweep removes entries older than the configured cache period
    /// and, when the disk tier exceeds its size cap, evicts the least
    /// recently accessed entries until usage drops below half the cap.
    /// Fire and forget: drop the returned handle, or await
    /// [`SweepHandle::finished`] for the outcome. Because the sweep shares
    /// the FIFO queue with every other mutation, awaiting the handle also
    /// guarantees all previously queued mutations have landed.
    pub fn clean_expired_disk_cache(&self) -> SweepHandle {
        let (done, rx) = oneshot::channel();
        self.queue.submit(IoJob::Sweep { done });
        SweepHandle { rx }
    }

    // =========================================================================
    // Maintenance
    // =========================================================================

    /// Total bytes currently stored in the disk tier. Unqueued scan.
    pub async fn disk_usage(&self) -> u64 {
        self.disk.usage().await
    }

    /// Close the I/O queue, wait for already-queued mutations to finish,
    /// and stop the worker.
    ///
    /// Mutations queued before this call always run to completion.
    pub async fn shutdown(self) {
        debug!(name = %self.config.name, "Cache instance shutting down");
        self.queue.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: &tempfile::TempDir, name: &str) -> CacheConfig {
        CacheConfig::new(name).with_path(dir.path())
    }

    #[tokio::test]
    async fn test_write_then_read_returns_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TierCache::with_config(config_in(&dir, "default"));

        cache.write("k1", b"hello".to_vec()).await;

        assert_eq!(cache.read("k1").await, Some(Bytes::from_static(b"hello")));
        cache.shutdown().await;
    }

    #[tokio::test]
    async fn test_clean_removes_entry() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TierCache::with_config(config_in(&dir, "default"));

        cache.write("k1", b"hello".to_vec()).await;
        cache.clean("k1").await;
        // Drain the queued removal before looking at disk.
        cache.clean_expired_disk_cache().finished().await;

        assert_eq!(cache.read("k1").await, None);
        assert!(!cache.has_data("k1").await);
        cache.shutdown().await;
    }

    #[tokio::test]
    async fn test_write_is_in_memory_before_return() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TierCache::with_config(config_in(&dir, "mem"));

        cache.write("k1", b"hello".to_vec()).await;

        assert!(cache.has_data_on_mem("k1"));
        cache.shutdown().await;
    }

    #[tokio::test]
    async fn test_path_for_key_lives_under_cache_path() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TierCache::with_config(config_in(&dir, "paths"));

        let path = cache.path_for_key("k1");
        assert_eq!(path.parent(), Some(cache.cache_path()));
        cache.shutdown().await;
    }

    #[tokio::test]
    async fn test_instance_accessors() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TierCache::with_config(config_in(&dir, "named"));

        assert_eq!(cache.name(), "named");
        assert!(cache
            .cache_path()
            .ends_with(format!("{}named", crate::config::CACHE_DIRECTORY_PREFIX)));
        cache.shutdown().await;
    }

    #[tokio::test]
    async fn test_shared_is_a_singleton() {
        let a = TierCache::shared() as *const TierCache;
        let b = TierCache::shared() as *const TierCache;
        assert_eq!(a, b);
        assert_eq!(TierCache::shared().name(), "default");
    }
}
