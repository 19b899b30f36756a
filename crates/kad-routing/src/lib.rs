//! # Kademlia Routing Core
//!
//! Routing core of a Kademlia-style DHT node: a 224-bit identifier space,
//! the XOR proximity metric, a bucket-organized routing table and the
//! closest-node / closest-bucket lookups that drive iterative routing.
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture with:
//! - **Domain Layer:** identifiers, SHA3-224 hashing, XOR distance, bucket-id
//!   masking, k-nearest selection (pure, no I/O)
//! - **Store:** an ordered map owned by a pool of single-owner shard workers,
//!   reachable only through queued operations
//! - **Ports Layer:** the routing API exposed to handlers, plus the remote
//!   lookup and configuration interfaces the host supplies
//! - **Service Layer:** `DhtNode` and `Bootstrapper`
//! - **Adapters Layer:** configuration providers and an in-memory resolver
//!
//! Transport, persistence and peer authentication live outside this crate.
//!
//! ## Example
//!
//! ```rust,no_run
//! use kad_routing::{Contact, DhtNode};
//!
//! # async fn demo() -> Result<(), kad_routing::DhtError> {
//! let node = DhtNode::with_defaults("127.0.0.1", 50051)?;
//! node.add_or_update_node(Contact::new("10.0.1.77", 50051))?;
//!
//! let buckets = node.find_k_closest_buckets(b"10.0.2.35").await?;
//! let peers = node.find_closest_nodes(b"10.0.2.35", buckets[0]).await?;
//! assert!(peers.contains(&"10.0.1.77:50051".to_string()));
//!
//! node.close().await?;
//! # Ok(())
//! # }
//! ```

// =============================================================================
// CORE MODULES
// =============================================================================

pub mod domain;
pub mod ports;
pub mod service;
pub mod store;

/// Adapters for the outbound ports.
/// `TomlConfigProvider` requires feature: `config`
pub mod adapters;

// =============================================================================
// RE-EXPORTS
// =============================================================================

// Domain entities
pub use domain::{
    Bucket, Contact, DhtConfig, DhtError, Distance, NodeAddress, NodeId, RoutingTableStats,
    DEFAULT_CONCURRENCY, DEFAULT_REPLICATION_FACTOR, ID_LENGTH,
};

// Domain services
pub use domain::{
    compare_distance, hash_key, mask_from_prefix, select_k_nearest, sort_contacts_by_distance,
    within_sentinel, xor_distance,
};

// Store
pub use store::{OrderedStore, StoreConfig, StoreError};

// Port traits
pub use ports::{ConfigProvider, ContactResolver, ResolverError, RoutingTableApi};

// Service
pub use service::{BootstrapReport, Bootstrapper, DhtNode};

// Adapters
pub use adapters::{StaticConfigProvider, StaticContactResolver};

#[cfg(feature = "config")]
pub use adapters::{ConfigError, TomlConfigProvider};
