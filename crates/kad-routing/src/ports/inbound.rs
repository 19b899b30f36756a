//! # Driving Ports (Inbound API)
//!
//! The routing operations this crate exposes to RPC handlers and the node
//! runtime.

use async_trait::async_trait;

use crate::domain::{Bucket, Contact, DhtError, NodeId, RoutingTableStats};

/// Primary API for interacting with a node's routing table.
///
/// Handlers depend on this trait rather than on [`DhtNode`](crate::service::DhtNode)
/// so they can be tested against a fake table.
///
/// # Example
///
/// ```rust,ignore
/// use kad_routing::ports::RoutingTableApi;
///
/// async fn next_hops<T: RoutingTableApi>(api: &T, key: &[u8]) -> Vec<String> {
///     let buckets = api.find_k_closest_buckets(key).await.unwrap_or_default();
///     match buckets.first() {
///         Some(bucket) => api.find_closest_nodes(key, *bucket).await.unwrap_or_default(),
///         None => Vec::new(),
///     }
/// }
/// ```
#[async_trait]
pub trait RoutingTableApi: Send + Sync {
    /// Identifiers of the buckets to query next for `key`.
    ///
    /// Never empty: falls back to the local node id when the table holds no
    /// candidate.
    async fn find_k_closest_buckets(&self, key: &[u8]) -> Result<Vec<NodeId>, DhtError>;

    /// `"ip:port"` endpoints of the contacts stored under `bucket_id`.
    async fn find_closest_nodes(&self, key: &[u8], bucket_id: NodeId)
        -> Result<Vec<String>, DhtError>;

    /// Record a contact at every bucket level.
    async fn add_or_update_node(&self, contact: Contact) -> Result<(), DhtError>;

    /// First non-empty bucket stored under `hash(key)`, if any.
    async fn get(&self, key: &[u8]) -> Result<Option<Bucket>, DhtError>;

    /// Up to `k` known contacts closest to `hash(key)`, closest first.
    async fn k_nearest_contacts(&self, key: &[u8], k: usize) -> Result<Vec<Contact>, DhtError>;

    /// Current routing table statistics.
    async fn stats(&self) -> Result<RoutingTableStats, DhtError>;
}
