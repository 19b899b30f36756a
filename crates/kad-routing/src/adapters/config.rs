use crate::domain::{DhtConfig, NodeAddress};
use crate::ports::ConfigProvider;

// ============================================================================
// StaticConfigProvider - Hardcoded config for testing/development
// ============================================================================

/// Static configuration provider with hardcoded values.
///
/// Useful for testing and development. For deployments, use `TomlConfigProvider`.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigProvider {
    address: NodeAddress,
    seeds: Vec<String>,
    config: DhtConfig,
}

impl StaticConfigProvider {
    /// Default address (`127.0.0.1:50051`), default config, no seeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_address(mut self, address: NodeAddress) -> Self {
        self.address = address;
        self
    }

    #[must_use]
    pub fn with_seeds(mut self, seeds: Vec<String>) -> Self {
        self.seeds = seeds;
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: DhtConfig) -> Self {
        self.config = config;
        self
    }
}

impl ConfigProvider for StaticConfigProvider {
    fn node_address(&self) -> NodeAddress {
        self.address.clone()
    }

    fn seed_nodes(&self) -> Vec<String> {
        self.seeds.clone()
    }

    fn dht_config(&self) -> DhtConfig {
        self.config.clone()
    }
}

// ============================================================================
// TomlConfigProvider - File-based config (requires "config" feature)
// ============================================================================

#[cfg(feature = "config")]
mod toml_config {
    use super::*;
    use crate::domain::{DEFAULT_CONCURRENCY, DEFAULT_REPLICATION_FACTOR};
    use serde::Deserialize;
    use std::fs;
    use std::path::Path;
    use thiserror::Error;

    /// Environment variable naming the config file.
    pub const CONFIG_ENV_VAR: &str = "KAD_CONFIG";

    #[derive(Debug, Deserialize, Default)]
    #[serde(deny_unknown_fields)]
    struct ConfigFile {
        #[serde(default)]
        node: NodeSection,
        #[serde(default)]
        dht: DhtSection,
        #[serde(default)]
        bootstrap: BootstrapSection,
    }

    #[derive(Debug, Deserialize, Default)]
    struct NodeSection {
        ip: Option<String>,
        port: Option<u16>,
    }

    #[derive(Debug, Deserialize, Default)]
    struct DhtSection {
        replication_factor: Option<usize>,
        concurrency: Option<usize>,
    }

    #[derive(Debug, Deserialize, Default)]
    struct BootstrapSection {
        #[serde(default)]
        seeds: Vec<String>,
    }

    /// TOML-based configuration provider.
    ///
    /// # Config File Format
    ///
    /// ```toml
    /// [node]
    /// ip = "127.0.0.1"
    /// port = 50051
    ///
    /// [dht]
    /// replication_factor = 3
    /// concurrency = 3
    ///
    /// [bootstrap]
    /// seeds = ["10.0.1.77:50051"]
    /// ```
    ///
    /// Every key is optional and falls back to the defaults above (no seeds).
    #[derive(Debug, Clone)]
    pub struct TomlConfigProvider {
        address: NodeAddress,
        seeds: Vec<String>,
        config: DhtConfig,
    }

    impl TomlConfigProvider {
        /// Load the file named by the `KAD_CONFIG` environment variable.
        ///
        /// # Errors
        ///
        /// [`ConfigError::MissingEnv`] when the variable is unset, otherwise
        /// whatever [`load`](Self::load) returns.
        pub fn from_env() -> Result<Self, ConfigError> {
            let path = std::env::var(CONFIG_ENV_VAR)
                .map_err(|_| ConfigError::MissingEnv(CONFIG_ENV_VAR.to_string()))?;
            Self::load(path)
        }

        /// Load configuration from a TOML file.
        ///
        /// # Errors
        ///
        /// Returns error if file cannot be read, parsed or validated.
        pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
            let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
                path: path.as_ref().display().to_string(),
                error: e.to_string(),
            })?;

            Self::parse(&content)
        }

        /// Parse configuration from a TOML string.
        pub fn parse(content: &str) -> Result<Self, ConfigError> {
            let file: ConfigFile =
                toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

            let defaults = NodeAddress::default();
            let address = NodeAddress {
                ip: file.node.ip.unwrap_or(defaults.ip),
                port: file.node.port.unwrap_or(defaults.port),
            };
            if address.ip.trim().is_empty() {
                return Err(ConfigError::Invalid("node.ip must not be empty".into()));
            }

            let config = DhtConfig {
                replication_factor: file
                    .dht
                    .replication_factor
                    .unwrap_or(DEFAULT_REPLICATION_FACTOR),
                concurrency: file.dht.concurrency.unwrap_or(DEFAULT_CONCURRENCY),
            };
            if config.replication_factor == 0 {
                return Err(ConfigError::Invalid(
                    "dht.replication_factor must be at least 1".into(),
                ));
            }
            if config.concurrency == 0 {
                return Err(ConfigError::Invalid(
                    "dht.concurrency must be at least 1".into(),
                ));
            }

            let seeds = file
                .bootstrap
                .seeds
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();

            Ok(Self {
                address,
                seeds,
                config,
            })
        }
    }

    impl ConfigProvider for TomlConfigProvider {
        fn node_address(&self) -> NodeAddress {
            self.address.clone()
        }

        fn seed_nodes(&self) -> Vec<String> {
            self.seeds.clone()
        }

        fn dht_config(&self) -> DhtConfig {
            self.config.clone()
        }
    }

    /// Errors that can occur during config loading.
    #[derive(Debug, Clone, PartialEq, Eq, Error)]
    pub enum ConfigError {
        /// The environment variable naming the config file is unset
        #[error("environment variable {0} is not set")]
        MissingEnv(String),

        /// File I/O error.
        #[error("failed to read {path}: {error}")]
        Io {
            /// Path of the file that failed to load.
            path: String,
            /// Error message from the I/O operation.
            error: String,
        },

        /// TOML parsing error.
        #[error("failed to parse config: {0}")]
        Parse(String),

        /// Parsed but unusable values
        #[error("invalid config: {0}")]
        Invalid(String),
    }
}

#[cfg(feature = "config")]
pub use toml_config::{ConfigError, TomlConfigProvider, CONFIG_ENV_VAR};
