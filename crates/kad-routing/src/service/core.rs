use tokio::sync::watch;
use tracing::info;

use crate::domain::{
    mask_from_prefix, Bucket, Contact, DhtConfig, DhtError, NodeAddress, NodeId,
    DEFAULT_REPLICATION_FACTOR,
};
use crate::store::{OrderedStore, StoreConfig};

/// A Kademlia node's routing core.
///
/// Owns one [`OrderedStore`] mapping bucket identifiers to the list of
/// buckets recorded under them. The store lives exactly as long as the node.
///
/// # Example
///
/// ```rust,ignore
/// use kad_routing::service::DhtNode;
///
/// let node = DhtNode::with_defaults("127.0.0.1", 50051)?;
/// node.add_or_update_node(Contact::new("10.0.1.77", 50051))?;
///
/// let buckets = node.find_k_closest_buckets(b"10.0.2.35").await?;
/// let peers = node.find_closest_nodes(b"10.0.2.35", buckets[0]).await?;
/// ```
pub struct DhtNode {
    pub(crate) id: NodeId,
    pub(crate) contact: Contact,
    pub(crate) replication_factor: usize,
    pub(crate) routing_table: OrderedStore<Vec<Bucket>>,
}

impl DhtNode {
    /// Create a node for `ip:port` with `replication_factor` bucket levels.
    ///
    /// Must be called inside a tokio runtime; the routing table spawns its
    /// workers immediately.
    pub fn new(ip: &str, port: u16, replication_factor: usize) -> Result<Self, DhtError> {
        let config = DhtConfig {
            replication_factor,
            ..DhtConfig::default()
        };
        let (_never, cancel) = watch::channel(false);
        Self::from_config(&NodeAddress::new(ip, port), &config, cancel)
    }

    /// Create a node with the default replication factor (3).
    pub fn with_defaults(ip: &str, port: u16) -> Result<Self, DhtError> {
        Self::new(ip, port, DEFAULT_REPLICATION_FACTOR)
    }

    /// Create a node from loaded configuration.
    ///
    /// Setting `cancel` to `true` closes the routing table: every later
    /// operation fails with [`StoreError::Closed`](crate::store::StoreError::Closed).
    pub fn from_config(
        address: &NodeAddress,
        config: &DhtConfig,
        cancel: watch::Receiver<bool>,
    ) -> Result<Self, DhtError> {
        if config.replication_factor == 0 {
            return Err(DhtError::InvalidReplicationFactor(0));
        }

        let contact = Contact::new(address.ip.clone(), address.port);
        let id = contact.id;
        let routing_table = OrderedStore::start(
            StoreConfig {
                concurrency: config.concurrency,
            },
            cancel,
        )?;

        let buckets: Vec<Bucket> = (0..config.replication_factor)
            .map(|level| {
                let bucket_id = mask_from_prefix(&id, level);
                if level == 0 {
                    Bucket::with_contact(bucket_id, contact.clone())
                } else {
                    Bucket::new(bucket_id)
                }
            })
            .collect();
        routing_table.insert(id, buckets)?;

        info!(
            node_id = %id,
            address = %contact.endpoint(),
            replication_factor = config.replication_factor,
            workers = routing_table.concurrency(),
            "DHT node created"
        );

        Ok(Self {
            id,
            contact,
            replication_factor: config.replication_factor,
            routing_table,
        })
    }

    /// This node's identifier.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// This node's own contact.
    pub fn contact(&self) -> &Contact {
        &self.contact
    }

    pub fn replication_factor(&self) -> usize {
        self.replication_factor
    }

    /// Shut the routing table down, completing queued mutations first.
    pub async fn close(&self) -> Result<(), DhtError> {
        self.routing_table.close().await?;
        info!(node_id = %self.id, "DHT node closed");
        Ok(())
    }
}

impl std::fmt::Debug for DhtNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DhtNode")
            .field("id", &self.id)
            .field("address", &self.contact.endpoint())
            .field("replication_factor", &self.replication_factor)
            .finish_non_exhaustive()
    }
}
