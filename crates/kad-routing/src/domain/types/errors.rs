//! Domain Errors for the routing table

use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur during routing-table operations.
///
/// A key that is not present is never an error: lookups return `None` or an
/// empty list instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DhtError {
    /// The backing store rejected or abandoned the operation
    #[error("routing table store error: {0}")]
    Store(#[from] StoreError),

    /// A node needs at least one bucket level
    #[error("replication factor must be at least 1, got {0}")]
    InvalidReplicationFactor(usize),
}
