//! Cache instance configuration.
//!
//! A [`CacheConfig`] names an instance and fixes its on-disk root, expiry
//! period, disk size cap, and memory tier capacity. Instances never share a
//! directory: the instance name is always the final path component.

use std::path::PathBuf;
use std::time::Duration;

/// Prefix for per-instance cache directories under the root.
pub const CACHE_DIRECTORY_PREFIX: &str = "tiercache.";

/// Default maximum age before a disk entry expires (7 days).
pub const DEFAULT_MAX_CACHE_PERIOD: Duration = Duration::from_secs(60 * 60 * 24 * 7);

/// Default memory tier capacity in bytes (256 MiB).
///
/// The memory tier is a bounded cache with automatic eviction, so the
/// default is sized generously; entries spill to disk either way.
pub const DEFAULT_MEMORY_CAPACITY_BYTES: u64 = 256 * 1024 * 1024;

/// Configuration for a cache instance.
#[derive(Clone, Debug)]
pub struct CacheConfig {
    /// Instance name. Namespaces the on-disk directory and log output.
    pub name: String,

    /// Explicit root directory override. `None` uses the platform cache
    /// directory.
    pub path: Option<PathBuf>,

    /// Maximum age before a disk entry is considered expired. `None`
    /// disables age-based expiry.
    pub max_cache_period: Option<Duration>,

    /// Maximum total size of the disk tier in bytes. `0` means unlimited.
    ///
    /// Once the cap is exceeded, the sweep evicts the least recently
    /// accessed entries until usage drops below half the cap.
    pub max_disk_cache_size: u64,

    /// Maximum weighted size of the memory tier in bytes.
    pub memory_capacity: u64,
}

impl CacheConfig {
    /// Create a configuration for the named instance with defaults.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
            max_cache_period: Some(DEFAULT_MAX_CACHE_PERIOD),
            max_disk_cache_size: 0,
            memory_capacity: DEFAULT_MEMORY_CAPACITY_BYTES,
        }
    }

    /// Override the root directory the instance directory is created under.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the expiry period. `None` disables age-based expiry.
    pub fn with_max_cache_period(mut self, period: Option<Duration>) -> Self {
        self.max_cache_period = period;
        self
    }

    /// Cap the disk tier at `bytes`. `0` means unlimited.
    pub fn with_max_disk_cache_size(mut self, bytes: u64) -> Self {
        self.max_disk_cache_size = bytes;
        self
    }

    /// Set the memory tier capacity in bytes.
    pub fn with_memory_capacity(mut self, bytes: u64) -> Self {
        self.memory_capacity = bytes;
        self
    }

    /// Resolve the directory that holds this instance's entries.
    ///
    /// The directory is not created here; the disk tier creates it on the
    /// first write.
    pub fn cache_path(&self) -> PathBuf {
        let root = self
            .path
            .clone()
            .unwrap_or_else(|| dirs::cache_dir().unwrap_or_else(std::env::temp_dir));
        root.join(format!("{}{}", CACHE_DIRECTORY_PREFIX, self.name))
    }
}
