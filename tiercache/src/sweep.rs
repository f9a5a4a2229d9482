//! Expiry and size-cap sweep over the disk tier.
//!
//! The sweep enumerates the cache directory once, deletes entries older
//! than the configured period, and, when the disk tier exceeds its size
//! cap, evicts the least recently accessed entries until usage falls below
//! half the cap. Sweeping down to half rather than to the cap itself keeps
//! the next few writes from pushing the tier straight back over the limit.
//!
//! No filesystem error aborts the sweep: each failure is terminal to that
//! one entry, logged, and swept past. The sweep never fails as a whole.

use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime};

use tokio::fs;
use tracing::{debug, info, warn};

use crate::disk::DiskStore;

/// Outcome of one sweep pass.
#[derive(Debug, Clone, Default)]
pub struct SweepStats {
    /// Entries deleted because they were older than the cache period.
    pub expired_removed: usize,

    /// Entries evicted to bring the disk tier back under its size cap.
    pub evicted: usize,

    /// Total bytes freed by the pass.
    pub bytes_freed: u64,

    /// Bytes of unexpired entries remaining on disk after the pass.
    pub remaining_bytes: u64,

    /// Duration of the pass in milliseconds.
    pub duration_ms: u64,
}

impl fmt::Display for SweepStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Sweep: removed {} expired and {} evicted entries, freed {} bytes, {} bytes remain ({}ms)",
            self.expired_removed, self.evicted, self.bytes_freed, self.remaining_bytes, self.duration_ms
        )
    }
}

/// A disk entry observed during the enumeration pass.
struct SweptEntry {
    path: PathBuf,
    len: u64,
    timestamp: SystemTime,
}

/// Sweep `store` once.
///
/// `max_cache_period = None` disables age-based expiry;
/// `max_disk_cache_size = 0` disables the size cap. Runs on the I/O queue,
/// so it is totally ordered against the writes and removals around it.
pub(crate) async fn sweep(
    store: &DiskStore,
    max_cache_period: Option<Duration>,
    max_disk_cache_size: u64,
) -> SweepStats {
    let start = Instant::now();
    let mut stats = SweepStats::default();

    let cutoff = max_cache_period.and_then(|period| SystemTime::now().checked_sub(period));

    let mut expired: Vec<SweptEntry> = Vec::new();
    let mut candidates: Vec<SweptEntry> = Vec::new();
    let mut total_size: u64 = 0;

    let mut entries = match fs::read_dir(store.root()).await {
        Ok(entries) => entries,
        Err(e) => {
            // Nothing written to this instance yet, or the directory is
            // unreadable. Either way the pass is empty.
            debug!(path = %store.root().display(), error = %e, "Sweep found no cache directory");
            stats.duration_ms = start.elapsed().as_millis() as u64;
            return stats;
        }
    };

    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "Failed to enumerate cache directory; stopping scan");
                break;
            }
        };

        let path = entry.path();
        let meta = match entry.metadata().await {
            Ok(meta) => meta,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to stat cache entry; skipping");
                continue;
            }
        };

        // Subdirectories are not cache entries.
        if !meta.is_file() {
            continue;
        }

        // Access time where the filesystem tracks it, modification time
        // otherwise (noatime mounts).
        let timestamp = match meta.accessed().or_else(|_| meta.modified()) {
            Ok(ts) => ts,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "No usable timestamp for cache entry; skipping");
                continue;
            }
        };

        let swept = SweptEntry {
            path,
            len: meta.len(),
            timestamp,
        };

        match cutoff {
            Some(cutoff) if swept.timestamp < cutoff => expired.push(swept),
            _ => {
                total_size += swept.len;
                candidates.push(swept);
            }
        }
    }

    // Expired entries go first, independent of the size cap.
    for entry in &expired {
        if remove_entry(entry).await {
            stats.expired_removed += 1;
            stats.bytes_freed += entry.len;
        }
    }

    if max_disk_cache_size > 0 && total_size > max_disk_cache_size {
        let target = max_disk_cache_size / 2;

        // Oldest first; the file name breaks timestamp ties so eviction
        // order is reproducible.
        candidates.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.path.cmp(&b.path))
        });

        for entry in &candidates {
            if total_size < target {
                break;
            }
            if remove_entry(entry).await {
                total_size -= entry.len;
                stats.evicted += 1;
                stats.bytes_freed += entry.len;
            }
        }
    }

    stats.remaining_bytes = total_size;
    stats.duration_ms = start.elapsed().as_millis() as u64;

    info!(
        path = %store.root().display(),
        expired = stats.expired_removed,
        evicted = stats.evicted,
        bytes_freed = stats.bytes_freed,
        remaining_bytes = stats.remaining_bytes,
        duration_ms = stats.duration_ms,
        "Cache sweep finished"
    );

    stats
}

/// Delete one swept entry. Failures are logged and leave the entry behind.
async fn remove_entry(entry: &SweptEntry) -> bool {
    match fs::remove_file(&entry.path).await {
        Ok(()) => true,
        Err(e) => {
            warn!(path = %entry.path.display(), error = %e, "Failed to delete cache entry during sweep");
            false
        }
    }
}
