//! Local page store
//!
//! Consulted before the network when local-storage mode is on, and the
//! place pages are written to in that mode.

use crate::error::ClientResult;
use async_trait::async_trait;
use fedwiki_types::{Page, Slug};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[async_trait]
pub trait LocalStore: Send + Sync {
    async fn get_page(&self, slug: &Slug) -> ClientResult<Option<Page>>;

    async fn put_page(&self, slug: &Slug, page: &Page) -> ClientResult<()>;
}

/// Process-local page store
#[derive(Debug, Clone, Default)]
pub struct InMemoryLocalStore {
    pages: Arc<RwLock<HashMap<Slug, Page>>>,
}

impl InMemoryLocalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.pages.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.pages.read().await.is_empty()
    }
}

#[async_trait]
impl LocalStore for InMemoryLocalStore {
    async fn get_page(&self, slug: &Slug) -> ClientResult<Option<Page>> {
        Ok(self.pages.read().await.get(slug).cloned())
    }

    async fn put_page(&self, slug: &Slug, page: &Page) -> ClientResult<()> {
        self.pages.write().await.insert(slug.clone(), page.clone());
        Ok(())
    }
}
