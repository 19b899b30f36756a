//! # Kademlia Telemetry
//!
//! Structured logging for routing nodes, built on `tracing-subscriber`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kad_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_telemetry(&TelemetryConfig::from_env())?;
//!     tracing::info!("node starting");
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `KAD_SERVICE_NAME` | `kad-node` | Service name in the startup line |
//! | `KAD_LOG_LEVEL` / `RUST_LOG` | `info` | Log filter directive |
//! | `KAD_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `KAD_JSON_LOGS` | `false` (`true` in containers) | JSON lines output |

mod config;
mod tracing_setup;

pub use config::TelemetryConfig;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TelemetryError {
    #[error("failed to install tracing subscriber: {0}")]
    SubscriberInit(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Install the global logging subscriber.
///
/// Fails if the filter directive is invalid or a global subscriber is
/// already installed.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    tracing_setup::init_tracing(config)
}
