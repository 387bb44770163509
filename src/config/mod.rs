//! Configuration management
//!
//! Layered configuration in the usual order:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file (`config/delinkify.toml`, overridable via
//!    the `DELINKIFY_CONFIG` environment variable)
//! 3. Environment variables (highest priority), pattern
//!    `DELINKIFY__<section>__<key>`, e.g.
//!    `DELINKIFY__SERVER__BIND_ADDR=0.0.0.0:9000` or
//!    `DELINKIFY__RESOLVER__MAX_FILE_BYTES=40MB`

mod models;
mod sources;

pub use crate::humanize::ByteSize;
pub use models::{
    Config, HandlerOverride, PublishConfig, PublishProvider, ResolverConfig,
    ServerConfig,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

impl Config {
    /// Load configuration from all sources (file + environment).
    pub fn load() -> Result<Self, ConfigError> {
        Ok(sources::load()?)
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        Ok(sources::load_from_sources(path)?)
    }

    /// Weight override for a handler, if the operator configured one.
    pub fn handler_weight_override(&self, name: &str) -> Option<i32> {
        self.handlers.get(name).and_then(|h| h.weight)
    }
}
