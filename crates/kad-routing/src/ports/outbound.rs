//! # Driven Ports (Outbound SPI)
//!
//! Interfaces the host application provides: a way to ask remote nodes for
//! contacts and a source of configuration.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Contact, DhtConfig, NodeAddress, NodeId};

/// Transport primitive: "ask remote node X for its closest contacts".
///
/// The host must provide a concrete implementation (gRPC, UDP, ...). The
/// crate only consumes the returned `{ip, port, id}` triples.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the bootstrapper queries several
/// remotes concurrently.
///
/// # Example Implementation
///
/// ```rust,ignore
/// struct GrpcResolver { client: DhtClient }
///
/// #[async_trait]
/// impl ContactResolver for GrpcResolver {
///     async fn find_node(
///         &self,
///         remote: &str,
///         target: &NodeId,
///         sender: &Contact,
///     ) -> Result<Vec<Contact>, ResolverError> {
///         let reply = self.client.find_node(remote, target, sender).await
///             .map_err(|e| ResolverError::Unreachable(e.to_string()))?;
///         Ok(reply.contacts)
///     }
/// }
/// ```
#[async_trait]
pub trait ContactResolver: Send + Sync {
    /// Ask `remote` (`"ip:port"`) for the contacts it knows closest to
    /// `target`. `sender` identifies the local node to the remote.
    async fn find_node(
        &self,
        remote: &str,
        target: &NodeId,
        sender: &Contact,
    ) -> Result<Vec<Contact>, ResolverError>;
}

/// Errors from remote contact lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolverError {
    /// Remote could not be reached
    #[error("remote {0} unreachable")]
    Unreachable(String),

    /// Remote did not answer in time
    #[error("remote {0} timed out")]
    Timeout(String),

    /// Remote answered with something that is not a contact list
    #[error("malformed reply: {0}")]
    Malformed(String),
}

/// Abstract interface for configuration loading.
///
/// Allows different configuration sources (file, environment, etc.)
pub trait ConfigProvider: Send + Sync {
    /// Address the local node advertises; its id is `hash("ip:port")`.
    fn node_address(&self) -> NodeAddress;

    /// Seed endpoints (`"ip:port"`) contacted on startup.
    fn seed_nodes(&self) -> Vec<String>;

    /// Routing table parameters.
    fn dht_config(&self) -> DhtConfig;
}
