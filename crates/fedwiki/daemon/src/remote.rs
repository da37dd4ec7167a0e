//! Fetching pages from other wiki sites
//!
//! Used by the applier when an action forks a page, and by the
//! `/remote/<site>/<slug>.json` proxy.

use crate::config::RemoteConfig;
use async_trait::async_trait;
use fedwiki_types::{Page, Slug};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Failures talking to another site
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The remote site answered but has no such page
    #[error("page {slug} not found on {site}")]
    NotFound { site: String, slug: Slug },

    /// The remote site answered with an unexpected status
    #[error("{site} responded with {status}")]
    Status { site: String, status: u16 },

    /// The remote site could not be reached
    #[error("failed to reach {site}: {message}")]
    Transport { site: String, message: String },

    /// The response body is not a page
    #[error("invalid page from {site}: {message}")]
    Decode { site: String, message: String },
}

/// Source of pages held by other sites
#[async_trait]
pub trait RemoteFetcher: Send + Sync {
    /// Fetch `slug` from `site` (`host` or `host:port`)
    async fn fetch_page(&self, site: &str, slug: &Slug) -> Result<Page, RemoteError>;
}

/// Fetches `<scheme>://<site>/<slug>.json` over HTTP
#[derive(Debug, Clone)]
pub struct HttpRemoteFetcher {
    client: Client,
    scheme: String,
}

impl HttpRemoteFetcher {
    pub fn new(config: &RemoteConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            scheme: config.scheme.clone(),
        })
    }

    fn page_url(&self, site: &str, slug: &Slug) -> String {
        format!("{}://{}/{}.json", self.scheme, site, slug)
    }
}

#[async_trait]
impl RemoteFetcher for HttpRemoteFetcher {
    async fn fetch_page(&self, site: &str, slug: &Slug) -> Result<Page, RemoteError> {
        let url = self.page_url(site, slug);
        tracing::debug!(%url, "Fetching remote page");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RemoteError::Transport {
                site: site.to_string(),
                message: e.to_string(),
            })?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(RemoteError::NotFound {
                site: site.to_string(),
                slug: slug.clone(),
            }),
            status if status.is_success() => {
                response.json().await.map_err(|e| RemoteError::Decode {
                    site: site.to_string(),
                    message: e.to_string(),
                })
            }
            status => Err(RemoteError::Status {
                site: site.to_string(),
                status: status.as_u16(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_url() {
        let fetcher = HttpRemoteFetcher::new(&RemoteConfig::default()).unwrap();
        let slug = Slug::parse("welcome-visitors").unwrap();
        assert_eq!(
            fetcher.page_url("fed.wiki.org:8080", &slug),
            "http://fed.wiki.org:8080/welcome-visitors.json"
        );
    }
}
