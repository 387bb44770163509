use super::models::Config;
use config::{ConfigError, Environment, File};
use std::env;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "DELINKIFY_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/delinkify.toml";
const ENV_PREFIX: &str = "DELINKIFY";
const ENV_SEPARATOR: &str = "__";

/// Load configuration from all sources with priority:
/// 1. Defaults (embedded in structs)
/// 2. TOML file (if it exists)
/// 3. Environment variables from .env file (via dotenvy)
/// 4. System environment variables (highest priority)
pub fn load() -> Result<Config, ConfigError> {
    // Load .env if present; its absence is not an error
    let _ = dotenvy::dotenv();

    let config_path = env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

    load_from_sources(config_path)
}

/// Load configuration from a specific path plus environment overrides.
/// Useful for testing with custom config files.
pub fn load_from_sources(config_path: PathBuf) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if config_path.exists() {
        tracing::info!("loading configuration from {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(false));
    } else {
        tracing::warn!(
            "configuration file not found at {}, using defaults and environment overrides",
            config_path.display()
        );
    }

    // DELINKIFY__RESOLVER__HANDLER_TIMEOUT_SECS -> resolver.handler_timeout_secs
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true),
    );

    let config = builder.build()?;
    config.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        let config = load_from_sources(config_path).unwrap();
        assert_eq!(config.server.bind_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(config.resolver.handler_timeout_secs, 60);
    }

    #[test]
    fn loads_full_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("delinkify.toml");

        let toml_content = r#"
[server]
bind_addr = "127.0.0.1:9000"

[resolver]
scratch_dir = "/var/tmp/delinkify"
cookies_dir = "cookies"
handler_timeout_secs = 30
max_file_bytes = "40MB"

[publish]
provider = "local"
root = "data/media"
public_base_url = "https://media.example.com"

[handlers.tiktok]
weight = 2000

[handlers.instagram]
weight = -1
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = load_from_sources(config_path).unwrap();
        assert_eq!(config.server.bind_addr.to_string(), "127.0.0.1:9000");
        assert_eq!(config.resolver.handler_timeout_secs, 30);
        assert_eq!(config.resolver.max_file_bytes.as_u64(), 40 << 20);
        assert_eq!(
            config.publish.provider,
            crate::config::PublishProvider::Local
        );
        assert_eq!(config.handlers["tiktok"].weight, Some(2000));
        assert_eq!(config.handlers["instagram"].weight, Some(-1));
    }
}
