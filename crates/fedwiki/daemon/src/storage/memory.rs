//! In-memory storage implementation

use super::traits::*;
use async_trait::async_trait;
use chrono::Utc;
use fedwiki_types::{Page, Slug};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

type SiteKey = Option<String>;

fn site_key(site: Option<&str>) -> SiteKey {
    site.map(str::to_string)
}

/// In-memory storage for development and testing
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    pages: Arc<RwLock<HashMap<(SiteKey, Slug), StoredPage>>>,
    defaults: Arc<RwLock<HashMap<Slug, Page>>>,
    claimed: Arc<RwLock<HashSet<SiteKey>>>,
    identified: Arc<RwLock<HashSet<SiteKey>>>,
}

impl InMemoryStorage {
    /// Create a new in-memory storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a read-only default page served to every site
    pub async fn add_default_page(&self, slug: Slug, page: Page) {
        self.defaults.write().await.insert(slug, page);
    }

    /// Mark a site as claimed by an owner
    pub async fn claim(&self, site: Option<&str>) {
        self.claimed.write().await.insert(site_key(site));
    }

    /// Mark a site as having an identity provider
    pub async fn identify(&self, site: Option<&str>) {
        self.identified.write().await.insert(site_key(site));
    }
}

#[async_trait]
impl PageStorage for InMemoryStorage {
    async fn get_page(&self, site: Option<&str>, slug: &Slug) -> StorageResult<Option<Page>> {
        let pages = self.pages.read().await;
        if let Some(stored) = pages.get(&(site_key(site), slug.clone())) {
            return Ok(Some(stored.page.clone()));
        }
        let defaults = self.defaults.read().await;
        Ok(defaults.get(slug).cloned())
    }

    async fn put_page(&self, site: Option<&str>, slug: &Slug, page: &Page) -> StorageResult<()> {
        let mut pages = self.pages.write().await;
        pages.insert(
            (site_key(site), slug.clone()),
            StoredPage {
                slug: slug.clone(),
                page: page.clone(),
                updated_at: Utc::now(),
            },
        );
        Ok(())
    }

    async fn page_exists(&self, site: Option<&str>, slug: &Slug) -> StorageResult<bool> {
        if self
            .pages
            .read()
            .await
            .contains_key(&(site_key(site), slug.clone()))
        {
            return Ok(true);
        }
        Ok(self.defaults.read().await.contains_key(slug))
    }

    async fn list_pages(&self, site: Option<&str>) -> StorageResult<Vec<StoredPage>> {
        let key = site_key(site);
        let pages = self.pages.read().await;
        let mut listed: Vec<StoredPage> = pages
            .iter()
            .filter(|((owner, _), _)| *owner == key)
            .map(|(_, stored)| stored.clone())
            .collect();
        listed.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(listed)
    }

    async fn site_exists(&self, site: &str) -> StorageResult<bool> {
        let pages = self.pages.read().await;
        Ok(pages.keys().any(|(owner, _)| owner.as_deref() == Some(site)))
    }
}

#[async_trait]
impl StatusStorage for InMemoryStorage {
    async fn is_claimed(&self, site: Option<&str>) -> StorageResult<bool> {
        Ok(self.claimed.read().await.contains(&site_key(site)))
    }

    async fn is_identified(&self, site: Option<&str>) -> StorageResult<bool> {
        Ok(self.identified.read().await.contains(&site_key(site)))
    }
}

impl Storage for InMemoryStorage {}
