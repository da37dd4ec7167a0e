//! Fetching page JSON from the origin server

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use fedwiki_types::{random_hex, Page, SiteRef, Slug};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Source of full pages, one site at a time
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, site: &SiteRef, slug: &Slug) -> ClientResult<Page>;
}

/// Fetches pages through the origin server; remote sites go through its
/// `/remote/<site>/` proxy.
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: Client,
    base_url: String,
}

impl HttpPageFetcher {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
        })
    }

    /// Page URL with a cache-busting `random` query parameter
    pub fn page_url(&self, site: &SiteRef, slug: &Slug) -> String {
        let random = random_hex(4);
        match site {
            SiteRef::Origin => format!("{}/{}.json?random={}", self.base_url, slug, random),
            SiteRef::Remote(site) => format!(
                "{}/remote/{}/{}.json?random={}",
                self.base_url, site, slug, random
            ),
        }
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, site: &SiteRef, slug: &Slug) -> ClientResult<Page> {
        let url = self.page_url(site, slug);
        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(response.json().await?)
        } else if status == StatusCode::NOT_FOUND {
            Err(ClientError::NotFound(slug.clone()))
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(ClientError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}
