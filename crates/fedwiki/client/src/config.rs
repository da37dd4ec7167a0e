//! Client configuration

use serde::{Deserialize, Serialize};

/// How a client reaches its own site and where it keeps pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the site this client belongs to
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Read from and write to the local page store instead of the server
    #[serde(default)]
    pub use_local_storage: bool,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            use_local_storage: false,
            timeout_secs: default_timeout(),
        }
    }
}

impl ClientConfig {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            ..Default::default()
        }
    }

    /// The origin without a trailing slash
    pub fn base_url(&self) -> &str {
        self.origin.trim_end_matches('/')
    }
}

fn default_origin() -> String {
    "http://localhost:1111".to_string()
}

fn default_timeout() -> u64 {
    30
}
