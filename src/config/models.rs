use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::humanize::ByteSize;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub publish: PublishConfig,
    /// Per-handler overrides keyed by handler name.
    #[serde(default)]
    pub handlers: HashMap<String, HandlerOverride>,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    "0.0.0.0:8080".parse().unwrap()
}

/// Resolution pipeline configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Root under which per-request scratch dirs are created.
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: PathBuf,
    /// Directory holding `<handler>.txt` cookie files.
    pub cookies_dir: Option<PathBuf>,
    /// Upper bound on a single handler attempt, in seconds.
    #[serde(default = "default_handler_timeout_secs")]
    pub handler_timeout_secs: u64,
    /// Largest media file handlers should accept.
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: ByteSize,
}

impl ResolverConfig {
    pub fn handler_timeout(&self) -> Duration {
        Duration::from_secs(self.handler_timeout_secs)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            scratch_dir: default_scratch_dir(),
            cookies_dir: None,
            handler_timeout_secs: default_handler_timeout_secs(),
            max_file_bytes: default_max_file_bytes(),
        }
    }
}

fn default_scratch_dir() -> PathBuf {
    std::env::temp_dir().join("delinkify")
}

fn default_handler_timeout_secs() -> u64 {
    60
}

fn default_max_file_bytes() -> ByteSize {
    ByteSize(10 << 20) // 10 MiB
}

/// Publish backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishProvider {
    #[default]
    Memory,
    Local,
}

/// Materialization backend configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PublishConfig {
    #[serde(default)]
    pub provider: PublishProvider,
    /// Filesystem root for the `local` provider.
    pub root: Option<PathBuf>,
    /// Base URL prepended to published keys; without it handles use the
    /// opaque `object://` form.
    pub public_base_url: Option<String>,
}

/// Operator override for a built-in handler.
///
/// A negative weight disables the handler while keeping it registered for
/// introspection.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HandlerOverride {
    pub weight: Option<i32>,
}
