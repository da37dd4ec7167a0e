//! Configuration for the wiki daemon

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Main daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WikiConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Serve many sites, keyed by request host
    #[serde(default)]
    pub farm: bool,

    /// Owner authentication
    #[serde(default)]
    pub auth: AuthConfig,

    /// Outbound requests to other sites
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    pub listen_addr: SocketAddr,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Maximum request body size in bytes
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 1111)),
            enable_cors: true,
            max_body_size: default_max_body_size(),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageConfig {
    /// In-memory storage (for development/testing)
    Memory,

    /// One JSON file per page
    Filesystem {
        /// Root of the `pages/`, `status/` and `farm/` directories
        data_root: PathBuf,

        /// Read-only pages served when a slug has no page of its own
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default_data: Option<PathBuf>,
    },
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::Filesystem {
            data_root: PathBuf::from("data"),
            default_data: None,
        }
    }
}

/// Owner authentication
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Bearer token that marks a request as coming from the site owner
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_token: Option<String>,
}

/// Outbound request configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Request timeout in seconds
    #[serde(default = "default_remote_timeout")]
    pub timeout_secs: u64,

    /// URL scheme used to reach other sites
    #[serde(default = "default_scheme")]
    pub scheme: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_remote_timeout(),
            scheme: default_scheme(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value helpers
fn default_true() -> bool {
    true
}

fn default_max_body_size() -> usize {
    10 * 1024 * 1024
}

fn default_remote_timeout() -> u64 {
    30
}

fn default_scheme() -> String {
    "http".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl WikiConfig {
    /// Load configuration: built-in defaults, then the optional file, then
    /// `WIKI_*` environment variables (`WIKI_SERVER__LISTEN_ADDR=...`).
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&WikiConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("WIKI")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// In-memory configuration for tests and throwaway sites
    pub fn ephemeral() -> Self {
        Self {
            storage: StorageConfig::Memory,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = WikiConfig::default();
        assert_eq!(config.server.listen_addr.port(), 1111);
        assert!(!config.farm);
        assert!(config.auth.owner_token.is_none());
        assert!(matches!(config.storage, StorageConfig::Filesystem { .. }));
    }

    #[test]
    fn test_remote_defaults() {
        let config = RemoteConfig::default();
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.scheme, "http");
    }

    #[test]
    fn test_load_without_file_gives_defaults() {
        let config = WikiConfig::load(None).unwrap();
        assert_eq!(config.server.max_body_size, 10 * 1024 * 1024);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wiki.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
farm = true

[server]
listen_addr = "0.0.0.0:3000"

[storage]
type = "memory"

[auth]
owner_token = "secret"
"#
        )
        .unwrap();

        let config = WikiConfig::load(path.to_str()).unwrap();
        assert!(config.farm);
        assert_eq!(config.server.listen_addr.port(), 3000);
        assert!(matches!(config.storage, StorageConfig::Memory));
        assert_eq!(config.auth.owner_token.as_deref(), Some("secret"));
    }
}
