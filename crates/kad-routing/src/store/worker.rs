//! Shard worker: the single owner of one shard of the tree.

use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, trace};

use super::tree::Tree;
use crate::domain::NodeId;

/// Closure applied to the current value under a key. Returning `None` removes
/// the key.
pub type UpdateFn<V> = Box<dyn FnOnce(Option<V>) -> Option<V> + Send + 'static>;

/// Queued store operation. The variant set is closed, so a worker can never
/// receive an operation it does not understand.
pub(crate) enum Operation<V> {
    Insert {
        key: NodeId,
        value: V,
    },
    Update {
        key: NodeId,
        apply: UpdateFn<V>,
    },
    Search {
        key: NodeId,
        reply: oneshot::Sender<Option<V>>,
    },
    Delete {
        key: NodeId,
    },
    Snapshot {
        reply: oneshot::Sender<Vec<(NodeId, V)>>,
    },
    Len {
        reply: oneshot::Sender<usize>,
    },
}

pub(crate) struct ShardWorker<V> {
    shard: usize,
    tree: Tree<V>,
    queue: mpsc::UnboundedReceiver<Operation<V>>,
}

impl<V: Clone + Send + 'static> ShardWorker<V> {
    pub(crate) fn new(shard: usize, queue: mpsc::UnboundedReceiver<Operation<V>>) -> Self {
        Self {
            shard,
            tree: Tree::new(),
            queue,
        }
    }

    /// Apply operations in queue order until `close` or `cancel` fires, then
    /// refuse new operations and complete everything already queued.
    pub(crate) async fn run(
        mut self,
        mut close: watch::Receiver<bool>,
        mut cancel: watch::Receiver<bool>,
    ) {
        debug!(shard = self.shard, "store worker started");

        loop {
            tokio::select! {
                biased;
                _ = signalled(&mut close) => break,
                _ = signalled(&mut cancel) => break,
                op = self.queue.recv() => match op {
                    Some(op) => self.apply(op),
                    None => {
                        debug!(shard = self.shard, keys = self.tree.len(), "store queue dropped, worker exiting");
                        return;
                    }
                },
            }
        }

        self.queue.close();
        let mut drained = 0usize;
        while let Some(op) = self.queue.recv().await {
            self.apply(op);
            drained += 1;
        }

        debug!(
            shard = self.shard,
            drained,
            keys = self.tree.len(),
            "store worker stopped"
        );
    }

    fn apply(&mut self, op: Operation<V>) {
        match op {
            Operation::Insert { key, value } => {
                if self.tree.insert(key, value).is_some() {
                    trace!(shard = self.shard, key = %key, "replaced value");
                }
            }
            Operation::Update { key, apply } => {
                let current = self.tree.remove(&key);
                if let Some(next) = apply(current) {
                    self.tree.insert(key, next);
                }
            }
            Operation::Search { key, reply } => {
                let found = self.tree.get(&key).cloned();
                if reply.send(found).is_err() {
                    trace!(shard = self.shard, key = %key, "search caller went away");
                }
            }
            Operation::Delete { key } => {
                if self.tree.remove(&key).is_none() {
                    trace!(shard = self.shard, key = %key, "delete of absent key");
                }
            }
            Operation::Snapshot { reply } => {
                let _ = reply.send(self.tree.entries());
            }
            Operation::Len { reply } => {
                let _ = reply.send(self.tree.len());
            }
        }
    }
}

/// Resolves once the flag is set. A dropped sender never fires.
async fn signalled(rx: &mut watch::Receiver<bool>) {
    let fired = rx.wait_for(|stop| *stop).await.is_ok();
    if !fired {
        std::future::pending::<()>().await;
    }
}
