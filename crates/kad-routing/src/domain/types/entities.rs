//! Core Domain Entities for the routing table
//!
//! Identifiers, contacts and buckets. Everything here is plain data; the
//! behaviour lives in `domain::services` and `service`.

use std::fmt;

use super::value_objects::ID_LENGTH;
use crate::domain::services::hash_key;

/// 224-bit identifier derived by hashing an address or a lookup key.
///
/// Used both for node identity and for keys: lookup keys are hashed into the
/// same space before any distance comparison. Ordering is the big-endian
/// unsigned order of the raw bytes, which is also the order of the store.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NodeId(pub [u8; ID_LENGTH]);

impl NodeId {
    /// Create a NodeId from a raw 28-byte array.
    pub const fn new(bytes: [u8; ID_LENGTH]) -> Self {
        Self(bytes)
    }

    /// All-zero identifier. Every level-0 bucket id is this value.
    pub const fn zero() -> Self {
        Self([0u8; ID_LENGTH])
    }

    /// Get the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; ID_LENGTH] {
        &self.0
    }

    /// Check whether every byte is zero.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }
}

impl AsRef<[u8]> for NodeId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; ID_LENGTH]> for NodeId {
    fn from(bytes: [u8; ID_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // First 8 bytes are enough to tell ids apart in logs.
        write!(f, "NodeId({}..)", hex::encode(&self.0[..8]))
    }
}

/// One reachable peer.
///
/// `id` is always `hash_key("ip:port")`; use [`Contact::new`] unless the id
/// came over the wire from a remote node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Contact {
    /// Host part of the endpoint (IPv4, IPv6 literal or hostname).
    pub ip: String,
    /// Port part of the endpoint.
    pub port: u16,
    /// Identifier derived from `"ip:port"`.
    pub id: NodeId,
}

impl Contact {
    /// Create a contact and derive its id from `"ip:port"`.
    pub fn new(ip: impl Into<String>, port: u16) -> Self {
        let ip = ip.into();
        let id = hash_key(format!("{}:{}", ip, port).as_bytes());
        Self { ip, port, id }
    }

    /// Create a contact with an id supplied by a remote node.
    pub fn with_id(ip: impl Into<String>, port: u16, id: NodeId) -> Self {
        Self {
            ip: ip.into(),
            port,
            id,
        }
    }

    /// `host:port`, with IPv6 literals bracketed (`[::1]:50051`).
    pub fn endpoint(&self) -> String {
        if self.ip.contains(':') {
            format!("[{}]:{}", self.ip, self.port)
        } else {
            format!("{}:{}", self.ip, self.port)
        }
    }
}

/// Contacts grouped under a coarsened (masked) identifier.
///
/// Contacts are appended in arrival order and never sorted or evicted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    /// Masked identifier for this bucket's level.
    pub id: NodeId,
    /// Contacts in arrival order.
    pub contacts: Vec<Contact>,
}

impl Bucket {
    /// Create an empty bucket.
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            contacts: Vec::new(),
        }
    }

    /// Create a bucket holding a single contact.
    pub fn with_contact(id: NodeId, contact: Contact) -> Self {
        Self {
            id,
            contacts: vec![contact],
        }
    }

    /// Number of contacts, duplicates included.
    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    /// Whether the bucket holds no contact.
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Append a contact (most recent last).
    pub fn push(&mut self, contact: Contact) {
        self.contacts.push(contact);
    }

    /// Whether any contact carries `id`.
    pub fn contains(&self, id: &NodeId) -> bool {
        self.contacts.iter().any(|c| &c.id == id)
    }
}
