//! # Adapters Layer
//!
//! Concrete implementations of the outbound ports:
//!
//! - `config` - static and TOML configuration providers
//! - `resolver` - in-memory contact resolver

pub mod config;
pub mod resolver;

pub use config::StaticConfigProvider;
#[cfg(feature = "config")]
pub use config::{ConfigError, TomlConfigProvider, CONFIG_ENV_VAR};
pub use resolver::StaticContactResolver;

#[cfg(test)]
mod tests;
