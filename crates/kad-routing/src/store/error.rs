use thiserror::Error;

/// Errors returned by [`OrderedStore`](super::OrderedStore) operations.
///
/// A missing key is not an error; `search` returns `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store was closed or its cancellation signal fired
    #[error("store is closed and no longer accepts operations")]
    Closed,

    /// The worker owning the key exited before replying
    #[error("operation abandoned: owning worker exited before replying")]
    Abandoned,

    /// `start` was called outside a tokio runtime
    #[error("no tokio runtime available to spawn store workers")]
    NoRuntime,

    /// A store needs at least one worker
    #[error("store concurrency must be at least 1, got {0}")]
    InvalidConcurrency(usize),

    /// A worker terminated abnormally (reported by `close`)
    #[error("store worker failed: {0}")]
    WorkerFailed(String),
}
