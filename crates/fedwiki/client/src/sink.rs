//! Sending actions to the origin server

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use fedwiki_types::{Action, Slug};
use reqwest::Client;
use std::time::Duration;

/// Destination for actions applied to the server copy of a page
#[async_trait]
pub trait ActionSink: Send + Sync {
    async fn send(&self, slug: &Slug, action: &Action) -> ClientResult<()>;
}

/// `PUT <origin>/page/<slug>/action` with the action in form field `action`
#[derive(Debug, Clone)]
pub struct HttpActionSink {
    client: Client,
    base_url: String,
    owner_token: Option<String>,
}

impl HttpActionSink {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
            owner_token: None,
        })
    }

    /// Authenticate writes as the site owner
    pub fn with_owner_token(mut self, token: impl Into<String>) -> Self {
        self.owner_token = Some(token.into());
        self
    }

    pub fn action_url(&self, slug: &Slug) -> String {
        format!("{}/page/{}/action", self.base_url, slug)
    }
}

#[async_trait]
impl ActionSink for HttpActionSink {
    async fn send(&self, slug: &Slug, action: &Action) -> ClientResult<()> {
        let body = serde_json::to_string(action)?;
        let mut request = self
            .client
            .put(self.action_url(slug))
            .form(&[("action", body)]);
        if let Some(token) = &self.owner_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = response.text().await.unwrap_or_default();
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
