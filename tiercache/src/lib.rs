//! TierCache - two-tier byte-blob caching with expiry and size-capped disk
//!
//! This library stores byte blobs keyed by arbitrary strings across two
//! tiers: a bounded in-memory cache for fast hits and a file-per-key disk
//! directory as the authoritative store. Writes land in memory immediately
//! and persist asynchronously through a per-instance serial I/O queue;
//! reads fall back from memory to disk and backfill memory on a hit. An
//! asynchronous sweep expires entries older than a configured period and,
//! when the disk tier exceeds its size cap, evicts the least recently
//! accessed entries until usage drops below half the cap.
//!
//! The cache is best-effort end to end: disk mutations that fail are
//! logged and dropped, never escalated. Losing an entry is only ever a
//! future cache miss.
//!
//! # Example
//!
//! ```ignore
//! use tiercache::{CacheConfig, TierCache};
//!
//! let cache = TierCache::with_config(
//!     CacheConfig::new("thumbnails").with_max_disk_cache_size(64 * 1024 * 1024),
//! );
//!
//! cache.write("k1", b"hello".to_vec()).await;
//! assert_eq!(cache.read("k1").await.as_deref(), Some(&b"hello"[..]));
//!
//! // Typically wired to the host's terminate/background hooks.
//! cache.clean_expired_disk_cache();
//! ```

mod cache;
mod codec;
mod config;
mod disk;
mod error;
mod io;
mod key;
mod memory;
mod sweep;

pub use cache::{SweepHandle, TierCache};
pub use config::{
    CacheConfig, CACHE_DIRECTORY_PREFIX, DEFAULT_MAX_CACHE_PERIOD, DEFAULT_MEMORY_CAPACITY_BYTES,
};
pub use error::CacheError;
pub use sweep::SweepStats;
