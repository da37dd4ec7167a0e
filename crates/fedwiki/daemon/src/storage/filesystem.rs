//! Filesystem storage implementation
//!
//! Layout under the data root:
//!
//! ```text
//! pages/<slug>                    pretty-printed page JSON
//! status/open_id.identity         present once the site is claimed
//! status/open_id.identifier       present once an identity provider is set
//! farm/<host>/pages/<slug>        the same, per farm site
//! ```

use super::traits::*;
use crate::error::StorageError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fedwiki_types::{random_hex, Page, Slug};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

const CLAIM_FILE: &str = "open_id.identity";
const IDENTIFIER_FILE: &str = "open_id.identifier";

/// One JSON file per page
#[derive(Debug)]
pub struct FileStorage {
    data_root: PathBuf,
    default_data: Option<PathBuf>,
    write_lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(data_root: impl Into<PathBuf>, default_data: Option<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
            default_data,
            write_lock: Mutex::new(()),
        }
    }

    /// Directory of `site`. A farm site key must be exactly one plain path
    /// component so it cannot name anything outside `farm/`.
    fn site_dir(&self, site: Option<&str>) -> StorageResult<PathBuf> {
        let Some(host) = site else {
            return Ok(self.data_root.clone());
        };
        let mut components = Path::new(host).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) if name == host => {
                Ok(self.data_root.join("farm").join(host))
            }
            _ => Err(StorageError::InvalidSite(host.to_string())),
        }
    }

    fn pages_dir(&self, site: Option<&str>) -> StorageResult<PathBuf> {
        Ok(self.site_dir(site)?.join("pages"))
    }

    fn status_file(&self, site: Option<&str>, name: &str) -> StorageResult<PathBuf> {
        Ok(self.site_dir(site)?.join("status").join(name))
    }

    fn default_page_path(&self, slug: &Slug) -> Option<PathBuf> {
        self.default_data
            .as_ref()
            .map(|root| root.join("pages").join(slug.as_str()))
    }
}

async fn read_page(path: &Path) -> StorageResult<Option<Page>> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| StorageError::InvalidData(format!("{}: {}", path.display(), e)))
}

async fn is_file(path: &Path) -> bool {
    fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}

#[async_trait]
impl PageStorage for FileStorage {
    async fn get_page(&self, site: Option<&str>, slug: &Slug) -> StorageResult<Option<Page>> {
        if let Some(page) = read_page(&self.pages_dir(site)?.join(slug.as_str())).await? {
            return Ok(Some(page));
        }
        match self.default_page_path(slug) {
            Some(path) => read_page(&path).await,
            None => Ok(None),
        }
    }

    async fn put_page(&self, site: Option<&str>, slug: &Slug, page: &Page) -> StorageResult<()> {
        let bytes = serde_json::to_vec_pretty(page)
            .map_err(|e| StorageError::InvalidData(e.to_string()))?;
        let dir = self.pages_dir(site)?;
        let target = dir.join(slug.as_str());
        let staging = dir.join(format!(".{}.{}.tmp", slug, random_hex(4)));

        // Overlapping writers must never interleave bytes in one file.
        let _guard = self.write_lock.lock().await;
        fs::create_dir_all(&dir).await?;
        fs::write(&staging, &bytes).await?;
        fs::rename(&staging, &target).await?;

        tracing::debug!(path = %target.display(), "Stored page");
        Ok(())
    }

    async fn page_exists(&self, site: Option<&str>, slug: &Slug) -> StorageResult<bool> {
        if is_file(&self.pages_dir(site)?.join(slug.as_str())).await {
            return Ok(true);
        }
        Ok(match self.default_page_path(slug) {
            Some(path) => is_file(&path).await,
            None => false,
        })
    }

    async fn list_pages(&self, site: Option<&str>) -> StorageResult<Vec<StoredPage>> {
        let dir = self.pages_dir(site)?;
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut listed = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Ok(slug) = Slug::parse(name.to_string_lossy().into_owned()) else {
                continue;
            };
            let Some(page) = read_page(&entry.path()).await? else {
                continue;
            };
            let modified = entry.metadata().await?.modified()?;
            listed.push(StoredPage {
                slug,
                page,
                updated_at: DateTime::<Utc>::from(modified),
            });
        }

        listed.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(listed)
    }

    async fn site_exists(&self, site: &str) -> StorageResult<bool> {
        Ok(fs::metadata(self.site_dir(Some(site))?)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false))
    }
}

#[async_trait]
impl StatusStorage for FileStorage {
    async fn is_claimed(&self, site: Option<&str>) -> StorageResult<bool> {
        Ok(is_file(&self.status_file(site, CLAIM_FILE)?).await)
    }

    async fn is_identified(&self, site: Option<&str>) -> StorageResult<bool> {
        Ok(is_file(&self.status_file(site, IDENTIFIER_FILE)?).await)
    }
}

impl Storage for FileStorage {}
