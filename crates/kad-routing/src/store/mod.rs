//! # Concurrent Ordered Store
//!
//! A binary search tree keyed by 224-bit identifiers that is only ever
//! touched through queued operations.
//!
//! ## Concurrency model
//!
//! `start` spawns `concurrency` workers. Each worker exclusively owns one
//! shard of the tree and drains one unbounded FIFO queue. A key is routed to
//! its shard by an XOR fold of all 28 bytes, so masked bucket ids (which
//! share their zeroed leading bytes) still spread across workers, and:
//!
//! - every operation on the same key passes through the same queue and is
//!   applied in submission order by the same owner
//! - operations on keys in different shards may run in parallel
//! - no tree is ever mutated by two tasks, and no lock guards the tree
//!
//! ## Shutdown
//!
//! `close` (or the cancellation signal handed to `start`) makes workers stop
//! accepting operations and complete everything already queued. Submissions
//! after that return [`StoreError::Closed`]; a caller whose worker died
//! before replying gets [`StoreError::Abandoned`]. Nothing blocks forever.

mod error;
mod tree;
mod worker;

pub use error::StoreError;
pub use worker::UpdateFn;

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::domain::{NodeId, DEFAULT_CONCURRENCY};
use worker::{Operation, ShardWorker};

/// Largest useful worker count: one shard per fold value.
const MAX_SHARDS: usize = 256;

/// Store configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Number of shard workers (default: 3, capped at 256)
    pub concurrency: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

/// Actor-backed ordered map from [`NodeId`] to `V`.
pub struct OrderedStore<V> {
    shards: Vec<mpsc::UnboundedSender<Operation<V>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    close_tx: watch::Sender<bool>,
    cancel: watch::Receiver<bool>,
    closed: AtomicBool,
}

impl<V: Clone + Send + 'static> OrderedStore<V> {
    /// Spawn the worker pool on the current tokio runtime.
    ///
    /// Setting `cancel` to `true` shuts the store down exactly like `close`,
    /// except that workers are not joined. Dropping its sender is ignored.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidConcurrency`] for a zero worker count
    /// - [`StoreError::NoRuntime`] outside a tokio runtime
    pub fn start(config: StoreConfig, cancel: watch::Receiver<bool>) -> Result<Self, StoreError> {
        if config.concurrency == 0 {
            return Err(StoreError::InvalidConcurrency(0));
        }
        let handle = Handle::try_current().map_err(|_| StoreError::NoRuntime)?;
        let shard_count = config.concurrency.min(MAX_SHARDS);
        let (close_tx, close_rx) = watch::channel(false);

        let mut shards = Vec::with_capacity(shard_count);
        let mut workers = Vec::with_capacity(shard_count);
        for shard in 0..shard_count {
            let (tx, rx) = mpsc::unbounded_channel();
            let worker = ShardWorker::new(shard, rx);
            workers.push(handle.spawn(worker.run(close_rx.clone(), cancel.clone())));
            shards.push(tx);
        }

        info!(workers = shard_count, "ordered store started");

        Ok(Self {
            shards,
            workers: Mutex::new(workers),
            close_tx,
            cancel,
            closed: AtomicBool::new(false),
        })
    }

    /// Start with the default configuration and no external cancellation.
    pub fn start_default() -> Result<Self, StoreError> {
        let (_never, cancel) = watch::channel(false);
        Self::start(StoreConfig::default(), cancel)
    }

    /// Number of shard workers.
    pub fn concurrency(&self) -> usize {
        self.shards.len()
    }

    /// Whether the store refuses new operations.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire) || *self.cancel.borrow()
    }

    /// Enqueue an insert (replacing any existing value).
    ///
    /// Returns once queued. Any operation on `key` submitted afterwards
    /// observes the insert.
    pub fn insert(&self, key: NodeId, value: V) -> Result<(), StoreError> {
        self.submit(&key, Operation::Insert { key, value })
    }

    /// Enqueue a read-modify-write of the value under `key`.
    ///
    /// `apply` runs inside the owning worker, so no other operation on `key`
    /// can interleave. Returning `None` removes the key.
    pub fn update<F>(&self, key: NodeId, apply: F) -> Result<(), StoreError>
    where
        F: FnOnce(Option<V>) -> Option<V> + Send + 'static,
    {
        self.submit(
            &key,
            Operation::Update {
                key,
                apply: Box::new(apply),
            },
        )
    }

    /// Enqueue a removal. Removing an absent key is a no-op.
    pub fn delete(&self, key: NodeId) -> Result<(), StoreError> {
        self.submit(&key, Operation::Delete { key })
    }

    /// Look up `key`, waiting for the owning worker to reply.
    ///
    /// Every operation on `key` queued before this call is visible.
    pub async fn search(&self, key: NodeId) -> Result<Option<V>, StoreError> {
        let (reply, rx) = oneshot::channel();
        self.submit(&key, Operation::Search { key, reply })?;
        rx.await.map_err(|_| StoreError::Abandoned)
    }

    /// All entries in ascending key order.
    pub async fn snapshot(&self) -> Result<Vec<(NodeId, V)>, StoreError> {
        let mut pending = Vec::with_capacity(self.shards.len());
        for shard in 0..self.shards.len() {
            let (reply, rx) = oneshot::channel();
            self.submit_to(shard, Operation::Snapshot { reply })?;
            pending.push(rx);
        }

        // Each shard is sorted; shards interleave in key space.
        let mut entries = Vec::new();
        for rx in pending {
            entries.extend(rx.await.map_err(|_| StoreError::Abandoned)?);
        }
        entries.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        Ok(entries)
    }

    /// Number of keys across all shards.
    pub async fn len(&self) -> Result<usize, StoreError> {
        let mut pending = Vec::with_capacity(self.shards.len());
        for shard in 0..self.shards.len() {
            let (reply, rx) = oneshot::channel();
            self.submit_to(shard, Operation::Len { reply })?;
            pending.push(rx);
        }

        let mut total = 0;
        for rx in pending {
            total += rx.await.map_err(|_| StoreError::Abandoned)?;
        }
        Ok(total)
    }

    /// Whether no shard holds a key.
    pub async fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len().await? == 0)
    }
}

impl<V> OrderedStore<V> {
    /// Stop accepting operations, let workers finish their queues, and wait
    /// for them to exit. Calling `close` again is a no-op.
    ///
    /// # Errors
    ///
    /// [`StoreError::WorkerFailed`] if any worker terminated abnormally.
    pub async fn close(&self) -> Result<(), StoreError> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        self.close_tx.send_replace(true);

        let workers = std::mem::take(&mut *self.workers.lock());
        let mut failure = None;
        for (shard, handle) in workers.into_iter().enumerate() {
            if let Err(e) = handle.await {
                error!(shard, error = %e, "store worker terminated abnormally");
                failure = Some(format!("shard {}: {}", shard, e));
            }
        }

        info!("ordered store closed");
        match failure {
            Some(reason) => Err(StoreError::WorkerFailed(reason)),
            None => Ok(()),
        }
    }

    /// Index of the worker that owns `key`.
    #[cfg(test)]
    pub(crate) fn shard_of(&self, key: &NodeId) -> usize {
        shard_for(key, self.shards.len())
    }

    fn submit(&self, key: &NodeId, op: Operation<V>) -> Result<(), StoreError> {
        self.submit_to(shard_for(key, self.shards.len()), op)
    }

    fn submit_to(&self, shard: usize, op: Operation<V>) -> Result<(), StoreError> {
        if self.closed.load(Ordering::Acquire) || *self.cancel.borrow() {
            return Err(StoreError::Closed);
        }
        self.shards[shard].send(op).map_err(|_| {
            debug!(shard, "submission to stopped worker rejected");
            StoreError::Closed
        })
    }
}

/// Shard owning `key`: XOR fold of every byte, reduced modulo the shard count.
fn shard_for(key: &NodeId, shard_count: usize) -> usize {
    let fold = key.as_bytes().iter().fold(0u8, |acc, b| acc ^ b);
    usize::from(fold) % shard_count
}
