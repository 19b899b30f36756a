//! Value Objects for the routing table

use std::fmt;

/// Identifier length in bytes (224 bits).
pub const ID_LENGTH: usize = 28;

/// Default number of bucket levels per identifier (k).
pub const DEFAULT_REPLICATION_FACTOR: usize = 3;

/// Default number of store workers.
pub const DEFAULT_CONCURRENCY: usize = 3;

/// XOR distance between two identifiers.
///
/// Compared byte-by-byte from index 0, i.e. as a big-endian unsigned 224-bit
/// integer. The derived `Ord` on the byte array gives exactly that order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Distance(pub [u8; ID_LENGTH]);

impl Distance {
    pub const fn new(bytes: [u8; ID_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Distance of an identifier to itself.
    pub const fn zero() -> Self {
        Self([0u8; ID_LENGTH])
    }

    /// Largest representable distance (all ones).
    ///
    /// The lookups keep candidates strictly below this value.
    pub const fn max() -> Self {
        Self([0xFF; ID_LENGTH])
    }

    pub fn as_bytes(&self) -> &[u8; ID_LENGTH] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }
}

impl fmt::Debug for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Distance({})", hex::encode(self.0))
    }
}

/// Configuration for a DHT node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DhtConfig {
    /// Bucket levels kept per identifier; also the candidate-set size for
    /// k-nearest queries (default: 3)
    pub replication_factor: usize,
    /// Store workers (key-range shards) backing the routing table (default: 3)
    pub concurrency: usize,
}

impl Default for DhtConfig {
    fn default() -> Self {
        Self {
            replication_factor: DEFAULT_REPLICATION_FACTOR,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl DhtConfig {
    /// Create a config suitable for testing (single worker)
    pub fn for_testing() -> Self {
        Self {
            replication_factor: DEFAULT_REPLICATION_FACTOR,
            concurrency: 1,
        }
    }
}

/// Address this node listens on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeAddress {
    pub ip: String,
    pub port: u16,
}

impl NodeAddress {
    pub fn new(ip: impl Into<String>, port: u16) -> Self {
        Self {
            ip: ip.into(),
            port,
        }
    }
}

impl Default for NodeAddress {
    fn default() -> Self {
        Self::new("127.0.0.1", 50051)
    }
}

impl fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ip, self.port)
    }
}

/// Routing table statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutingTableStats {
    /// Distinct bucket identifiers stored
    pub bucket_ids: usize,
    /// Bucket entries across all identifiers
    pub buckets: usize,
    /// Contact entries across all buckets (duplicates included)
    pub contacts: usize,
    /// Distinct contacts by id
    pub distinct_contacts: usize,
}
