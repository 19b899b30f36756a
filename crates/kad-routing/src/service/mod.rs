//! # DHT Node Service
//!
//! The routing core of a node: `DhtNode` owns the routing table and
//! implements the `RoutingTableApi` port. `Bootstrapper` fills a fresh table
//! from seed nodes through the `ContactResolver` port.
//!
//! ## Routing table layout
//!
//! The table maps a bucket identifier to every bucket recorded under it.
//! Recording a contact appends one bucket per level, keyed by the contact id
//! masked to that level, so the level-0 key (all zero) collects every contact
//! the node has heard of.

// Semantic submodules
mod api;
mod bootstrap;
mod core;
mod lookup;

// Re-export public API
pub use bootstrap::{BootstrapReport, Bootstrapper, DEFAULT_BOOTSTRAP_PARALLELISM};
pub use core::DhtNode;

#[cfg(test)]
mod tests;
