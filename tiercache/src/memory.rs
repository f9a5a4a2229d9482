//! In-memory cache tier backed by moka.
//!
//! This tier is a bounded, async-safe map from key to bytes. Moka uses
//! lock-free data structures internally, so it is safe to use from any task
//! without blocking the Tokio runtime, and it evicts entries automatically
//! once the weighted size exceeds the configured capacity.
//!
//! Eviction is not observable or controllable from here: an entry inserted a
//! moment ago may already be gone. A miss in this tier is never
//! authoritative; callers fall back to the disk tier.

use bytes::Bytes;
use moka::future::Cache as MokaCache;

/// Bounded in-memory key-to-bytes cache.
pub(crate) struct MemoryCache {
    cache: MokaCache<String, Bytes>,
}

impl MemoryCache {
    /// Create a memory cache capped at `capacity_bytes`.
    pub(crate) fn new(capacity_bytes: u64) -> Self {
        let cache = MokaCache::builder()
            // Weight each entry by its data size
            .weigher(|_key: &String, value: &Bytes| -> u32 {
                // moka uses u32 for weights, cap at u32::MAX for very large entries
                value.len().min(u32::MAX as usize) as u32
            })
            .max_capacity(capacity_bytes)
            .build();

        Self { cache }
    }

    /// Store `value` under `key`, replacing any previous entry.
    pub(crate) async fn insert(&self, key: &str, value: Bytes) {
        self.cache.insert(key.to_string(), value).await;
    }

    /// Look up `key`. A `None` here says nothing about the disk tier.
    pub(crate) async fn get(&self, key: &str) -> Option<Bytes> {
        self.cache.get(key).await
    }

    /// Whether an entry for `key` is currently resident.
    pub(crate) fn contains(&self, key: &str) -> bool {
        self.cache.contains_key(key)
    }

    /// Remove the entry for `key`, if resident.
    pub(crate) async fn remove(&self, key: &str) {
        self.cache.remove(key).await;
    }

    /// Drop every entry.
    pub(crate) fn clear(&self) {
        self.cache.invalidate_all();
    }

    /// Number of resident entries. Eventually consistent.
    #[cfg(test)]
    pub(crate) fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Weighted size of resident entries in bytes. Eventually consistent.
    #[cfg(test)]
    pub(crate) fn weighted_size(&self) -> u64 {
        self.cache.weighted_size()
    }

    /// Run pending maintenance tasks so the counters above settle.
    #[cfg(test)]
    pub(crate) async fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks().await;
    }
}
