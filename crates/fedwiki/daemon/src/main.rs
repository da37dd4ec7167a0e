//! Wiki daemon - serves a federated wiki site (or a farm of them)

use clap::Parser;
use fedwiki_daemon::config::StorageConfig;
use fedwiki_daemon::error::{DaemonError, DaemonResult};
use fedwiki_daemon::{Server, WikiConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Wiki daemon CLI
#[derive(Parser)]
#[command(name = "wikid")]
#[command(about = "Federated wiki server", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "WIKI_CONFIG")]
    config: Option<String>,

    /// Listen address (overrides the configuration file)
    #[arg(short, long, env = "WIKI_LISTEN_ADDR")]
    listen: Option<String>,

    /// Store pages as files under this directory
    #[arg(short, long, env = "WIKI_DATA_ROOT")]
    data_root: Option<PathBuf>,

    /// Serve one site per request host
    #[arg(long, env = "WIKI_FARM")]
    farm: bool,

    /// Log level (overrides the configuration file)
    #[arg(long, env = "WIKI_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, env = "WIKI_LOG_JSON")]
    json: bool,
}

#[tokio::main]
async fn main() -> DaemonResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = WikiConfig::load(cli.config.as_deref())
        .map_err(|e| DaemonError::Config(e.to_string()))?;

    // Initialize tracing
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| level.into());

    if cli.json || config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // Override with CLI args
    if let Some(listen) = &cli.listen {
        config.server.listen_addr = listen
            .parse()
            .map_err(|e| DaemonError::Config(format!("Invalid listen address: {}", e)))?;
    }

    if let Some(data_root) = cli.data_root {
        let default_data = match config.storage {
            StorageConfig::Filesystem { default_data, .. } => default_data,
            StorageConfig::Memory => None,
        };
        config.storage = StorageConfig::Filesystem {
            data_root,
            default_data,
        };
    }

    if cli.farm {
        config.farm = true;
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        listen = %config.server.listen_addr,
        farm = config.farm,
        "Starting wiki daemon"
    );

    let server = Server::new(config)?;
    server.run().await
}
