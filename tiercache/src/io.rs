//! Serial I/O queue for disk mutations.
//!
//! Every disk mutation of a cache instance, including the sweep, is
//! submitted to a single worker task and processed in submission order.
//! Each instance owns its queue and its directory, so a total FIFO order
//! per instance is enough; no cross-instance locking exists.
//!
//! Reads are not routed through the queue; see [`crate::TierCache::read`]
//! for the race this admits.
//!
//! Shutdown closes the channel and the worker drains what was already
//! submitted before exiting. Once submitted, a mutation runs to completion;
//! there is no cancellation.

use std::time::Duration;

use bytes::Bytes;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::disk::DiskStore;
use crate::sweep::{self, SweepStats};

/// A mutation queued for the I/O worker.
#[derive(Debug)]
pub(crate) enum IoJob {
    /// Persist `bytes` as the entry for `key`.
    Write { key: String, bytes: Bytes },

    /// Delete the entry for `key`.
    Remove { key: String },

    /// Delete the entire cache directory.
    RemoveAll,

    /// Run an expiry/size-cap sweep and report the outcome.
    Sweep { done: oneshot::Sender<SweepStats> },
}

/// Handle to a cache instance's I/O worker.
pub(crate) struct IoQueue {
    tx: mpsc::UnboundedSender<IoJob>,
    worker: JoinHandle<()>,
}

impl IoQueue {
    /// Spawn the worker for `store`. Must be called from within a Tokio
    /// runtime context.
    pub(crate) fn spawn(
        store: DiskStore,
        max_cache_period: Option<Duration>,
        max_disk_cache_size: u64,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run(store, max_cache_period, max_disk_cache_size, rx));
        Self { tx, worker }
    }

    /// Submit a job. Jobs run in submission order.
    ///
    /// A job submitted after shutdown began is dropped; the cache is
    /// best-effort and a dropped mutation is at worst a future miss.
    pub(crate) fn submit(&self, job: IoJob) {
        if self.tx.send(job).is_err() {
            debug!("I/O queue closed; dropping job");
        }
    }

    /// Close the queue, wait for already-submitted jobs to finish, and stop
    /// the worker.
    pub(crate) async fn shutdown(self) {
        drop(self.tx);
        let _ = self.worker.await;
    }
}

/// Worker loop: drain jobs in FIFO order until the queue closes.
async fn run(
    store: DiskStore,
    max_cache_period: Option<Duration>,
    max_disk_cache_size: u64,
    mut rx: mpsc::UnboundedReceiver<IoJob>,
) {
    debug!(path = %store.root().display(), "Cache I/O worker starting");

    while let Some(job) = rx.recv().await {
        match job {
            IoJob::Write { key, bytes } => store.write(&key, &bytes).await,
            IoJob::Remove { key } => store.remove(&key).await,
            IoJob::RemoveAll => store.remove_all().await,
            IoJob::Sweep { done } => {
                let stats = sweep::sweep(&store, max_cache_period, max_disk_cache_size).await;
                // The caller may have dropped its handle; the sweep already
                // ran either way.
                let _ = done.send(stats);
            }
        }
    }

    debug!(path = %store.root().display(), "Cache I/O worker stopped");
}
