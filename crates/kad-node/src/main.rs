//! # Kademlia Routing Node
//!
//! Entry point for a single routing node.
//!
//! ## Startup Sequence
//!
//! 1. Install logging (`KAD_*` environment variables)
//! 2. Load configuration from the TOML file named by `KAD_CONFIG`
//! 3. Build the routing table for the configured address
//! 4. Bootstrap from the configured seeds
//! 5. Run until Ctrl-C, then close the routing table

use anyhow::{Context, Result};
use tokio::sync::watch;
use tracing::{info, warn};

use kad_routing::{
    BootstrapReport, Bootstrapper, ConfigProvider, ContactResolver, DhtNode, StaticContactResolver,
    TomlConfigProvider,
};
use kad_telemetry::{init_telemetry, TelemetryConfig};

/// A running node and the signal that stops it.
struct NodeRuntime {
    node: DhtNode,
    seeds: Vec<String>,
    shutdown_tx: watch::Sender<bool>,
}

impl NodeRuntime {
    /// Build the routing table from `provider`. Needs a tokio runtime.
    fn new(provider: &dyn ConfigProvider) -> Result<Self> {
        let address = provider.node_address();
        let config = provider.dht_config();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let node = DhtNode::from_config(&address, &config, shutdown_rx)
            .with_context(|| format!("failed to start routing table for {}", address))?;

        Ok(Self {
            node,
            seeds: provider.seed_nodes(),
            shutdown_tx,
        })
    }

    /// Bootstrap from the configured seeds and log the resulting table.
    async fn start<R: ContactResolver>(&self, resolver: R) -> Result<BootstrapReport> {
        info!("===========================================");
        info!("  Kademlia routing node v{}", env!("CARGO_PKG_VERSION"));
        info!("===========================================");
        info!(
            node_id = %self.node.id(),
            address = %self.node.contact().endpoint(),
            seeds = self.seeds.len(),
            "node starting"
        );

        let report = Bootstrapper::new(resolver, self.seeds.clone())
            .run(&self.node)
            .await
            .context("bootstrap failed")?;
        if !self.seeds.is_empty() && report.answered() == 0 {
            warn!("no seed answered; routing table holds only this node");
        }

        let stats = self.node.stats().await.context("failed to read table stats")?;
        info!(
            bucket_ids = stats.bucket_ids,
            buckets = stats.buckets,
            contacts = stats.distinct_contacts,
            "routing table ready"
        );
        Ok(report)
    }

    /// Stop the routing table, finishing queued mutations.
    async fn shutdown(&self) -> Result<()> {
        info!("initiating graceful shutdown");
        self.shutdown_tx.send_replace(true);
        self.node
            .close()
            .await
            .context("routing table did not shut down cleanly")?;
        info!("shutdown complete");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_telemetry(&TelemetryConfig::from_env()).context("failed to initialize logging")?;

    let provider = TomlConfigProvider::from_env().context("failed to load node configuration")?;

    let runtime = NodeRuntime::new(&provider)?;
    // No transport is wired into this binary; seeds are reported unreachable.
    runtime.start(StaticContactResolver::new()).await?;

    info!("node is running, press Ctrl+C to stop");
    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl+C")?;

    runtime.shutdown().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use kad_routing::{Contact, DhtConfig, NodeAddress, NodeId, StaticConfigProvider};

    fn provider() -> StaticConfigProvider {
        StaticConfigProvider::new()
            .with_address(NodeAddress::new("127.0.0.1", 50051))
            .with_seeds(vec!["10.0.1.77:50051".to_string()])
            .with_config(DhtConfig::for_testing())
    }

    #[tokio::test]
    async fn test_runtime_bootstraps_from_seeds() {
        let runtime = NodeRuntime::new(&provider()).unwrap();
        let resolver = StaticContactResolver::new()
            .with_answer("10.0.1.77:50051", vec![Contact::new("10.0.4.4", 50051)]);

        let report = runtime.start(resolver).await.unwrap();
        assert_eq!(report.added, 2);

        let nodes = runtime
            .node
            .find_closest_nodes(b"10.0.2.35", NodeId::zero())
            .await
            .unwrap();
        assert_eq!(nodes.len(), 2);

        runtime.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_runtime_survives_unreachable_seeds() {
        let runtime = NodeRuntime::new(&provider()).unwrap();
        let report = runtime.start(StaticContactResolver::new()).await.unwrap();
        assert_eq!(report.failed, 1);
        assert_eq!(report.added, 0);
        runtime.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_rejects_later_lookups() {
        let runtime = NodeRuntime::new(&provider()).unwrap();
        runtime.shutdown().await.unwrap();
        assert!(runtime.node.get(b"127.0.0.1:50051").await.is_err());
    }
}
