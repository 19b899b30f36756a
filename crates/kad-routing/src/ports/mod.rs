//! # Ports Layer - Hexagonal Architecture Boundaries
//!
//! - **Driving Ports (Inbound):** the routing API this crate exposes
//! - **Driven Ports (Outbound):** remote lookups and configuration the host
//!   supplies

pub mod inbound;
pub mod outbound;

pub use inbound::RoutingTableApi;
pub use outbound::{ConfigProvider, ContactResolver, ResolverError};
