//! Storage trait definitions
//!
//! Every method takes a site key. `None` is the site the daemon serves by
//! default; `Some(host)` names a farm site (or one spawned by `/submit`).

use crate::error::StorageError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fedwiki_types::{Page, Slug};

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A persisted page together with when it was last written
#[derive(Debug, Clone)]
pub struct StoredPage {
    pub slug: Slug,
    pub page: Page,
    pub updated_at: DateTime<Utc>,
}

/// Combined storage trait
#[async_trait]
pub trait Storage: PageStorage + StatusStorage + Send + Sync {}

/// Storage for pages
#[async_trait]
pub trait PageStorage: Send + Sync {
    /// Get a page, falling back to the default pages
    async fn get_page(&self, site: Option<&str>, slug: &Slug) -> StorageResult<Option<Page>>;

    /// Create or replace a page
    async fn put_page(&self, site: Option<&str>, slug: &Slug, page: &Page) -> StorageResult<()>;

    /// Whether `get_page` would find anything
    async fn page_exists(&self, site: Option<&str>, slug: &Slug) -> StorageResult<bool>;

    /// Pages written to this site, most recently updated first
    async fn list_pages(&self, site: Option<&str>) -> StorageResult<Vec<StoredPage>>;

    /// Whether a farm site has been created
    async fn site_exists(&self, site: &str) -> StorageResult<bool>;
}

/// Ownership status of a site
#[async_trait]
pub trait StatusStorage: Send + Sync {
    /// An owner has logged in and claimed the site
    async fn is_claimed(&self, site: Option<&str>) -> StorageResult<bool>;

    /// An identity provider has been configured for the site
    async fn is_identified(&self, site: Option<&str>) -> StorageResult<bool>;
}
