//! Server setup and lifecycle management

use crate::api::create_router;
use crate::api::rest::router::with_cors;
use crate::api::rest::state::AppState;
use crate::auth::Authenticator;
use crate::config::{StorageConfig, WikiConfig};
use crate::error::{DaemonError, DaemonResult};
use crate::remote::HttpRemoteFetcher;
use crate::storage::{FileStorage, InMemoryStorage, Storage};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Wiki daemon server
pub struct Server {
    config: WikiConfig,
    state: AppState,
}

impl Server {
    /// Create a new server with the given configuration
    pub fn new(config: WikiConfig) -> DaemonResult<Self> {
        let storage: Arc<dyn Storage> = match &config.storage {
            StorageConfig::Memory => Arc::new(InMemoryStorage::new()),
            StorageConfig::Filesystem {
                data_root,
                default_data,
            } => Arc::new(FileStorage::new(data_root.clone(), default_data.clone())),
        };
        let remote = Arc::new(HttpRemoteFetcher::new(&config.remote)?);
        let auth = Authenticator::new(config.auth.owner_token.clone());

        let state = AppState::new(storage, remote, auth, config.farm)
            .with_max_body_size(config.server.max_body_size);

        Ok(Self { config, state })
    }

    /// The router this server would serve
    pub fn router(&self) -> Router {
        let app = create_router(self.state.clone());
        if self.config.server.enable_cors {
            with_cors(app)
        } else {
            app
        }
    }

    /// Run the server
    pub async fn run(self) -> DaemonResult<()> {
        let addr = self.config.server.listen_addr;
        let app = self.router();

        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Wiki daemon listening on {}", addr);
        tracing::info!(farm = self.config.farm, "Storage: {:?}", self.config.storage);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| DaemonError::Server(e.to_string()))?;

        tracing::info!("Wiki daemon shutting down");
        Ok(())
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_ephemeral_server_serves_requests() {
        let server = Server::new(WikiConfig::ephemeral()).unwrap();
        let response = server
            .router()
            .oneshot(
                Request::builder()
                    .uri("/system/slugs.json")
                    .header("host", "localhost:1111")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
