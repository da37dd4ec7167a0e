//! Federated wiki client
//!
//! - [`Resolver`] finds a page across the local store and a chain of sites
//! - [`ResolutionContext`] is that chain, learned as pages reveal their forks
//! - [`Writer`] sends edits to the server or the local store
//! - [`PluginRegistry`] renders story items by type

pub mod cache;
pub mod config;
pub mod context;
pub mod error;
pub mod fetcher;
pub mod plugin;
pub mod resolver;
pub mod sink;
pub mod writer;

pub use cache::{InMemoryLocalStore, LocalStore};
pub use config::ClientConfig;
pub use context::ResolutionContext;
pub use error::{ClientError, ClientResult};
pub use fetcher::{HttpPageFetcher, PageFetcher};
pub use plugin::{Container, Plugin, PluginRegistry};
pub use resolver::{PageRequest, PageSource, Resolution, Resolved, Resolver};
pub use sink::{ActionSink, HttpActionSink};
pub use writer::{PageHandle, Persistence, SubmitOutcome, Writer};

use std::sync::Arc;

/// Wire a resolver and writer from configuration: HTTP for both, plus a
/// shared in-memory store when local-storage mode is on.
pub fn connect(config: &ClientConfig) -> ClientResult<(Resolver, Writer)> {
    let resolver = Resolver::new(Arc::new(HttpPageFetcher::new(config)?));
    let writer = Writer::new(Arc::new(HttpActionSink::new(config)?));

    if config.use_local_storage {
        let store: Arc<dyn LocalStore> = Arc::new(InMemoryLocalStore::new());
        return Ok((
            resolver.with_local_store(store.clone()),
            writer.with_local_store(store),
        ));
    }
    Ok((resolver, writer))
}
