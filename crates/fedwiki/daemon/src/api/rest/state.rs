//! Application state for API handlers

use crate::applier::ActionApplier;
use crate::auth::Authenticator;
use crate::error::ApiResult;
use crate::remote::RemoteFetcher;
use crate::storage::Storage;
use fedwiki_types::validate_site;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Storage backend
    pub storage: Arc<dyn Storage>,

    /// Pages held by other sites
    pub remote: Arc<dyn RemoteFetcher>,

    /// Action application state machine
    pub applier: ActionApplier,

    /// Owner authentication
    pub auth: Authenticator,

    /// Serve one site per request host
    pub farm: bool,

    /// Maximum accepted request body
    pub max_body_size: usize,
}

impl AppState {
    /// Create new application state
    pub fn new(
        storage: Arc<dyn Storage>,
        remote: Arc<dyn RemoteFetcher>,
        auth: Authenticator,
        farm: bool,
    ) -> Self {
        Self {
            applier: ActionApplier::new(storage.clone(), remote.clone()),
            storage,
            remote,
            auth,
            farm,
            max_body_size: 10 * 1024 * 1024,
        }
    }

    pub fn with_max_body_size(mut self, max_body_size: usize) -> Self {
        self.max_body_size = max_body_size;
        self
    }

    /// Storage key of the site a request addresses.
    ///
    /// The host header is checked in every mode since it also names spawned
    /// sites and the local host for `/remote`.
    pub fn site_for<'a>(&self, host: &'a str) -> ApiResult<Option<&'a str>> {
        validate_site(host)?;
        Ok(self.farm.then(|| host_name(host)))
    }
}

/// `host:port` without the port
pub fn host_name(host: &str) -> &str {
    host.split(':').next().unwrap_or(host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_for_rejects_bad_hosts() {
        let state = AppState::new(
            Arc::new(crate::storage::InMemoryStorage::new()),
            Arc::new(crate::remote::HttpRemoteFetcher::new(&Default::default()).unwrap()),
            Authenticator::new(None),
            true,
        );
        assert_eq!(state.site_for("fed.wiki.org:3000").unwrap(), Some("fed.wiki.org"));
        assert!(state.site_for("../../outside").is_err());
        assert!(state.site_for("x/../../../escaped").is_err());
    }

    #[test]
    fn test_host_name() {
        assert_eq!(host_name("localhost:1111"), "localhost");
        assert_eq!(host_name("fed.wiki.org"), "fed.wiki.org");
    }
}
