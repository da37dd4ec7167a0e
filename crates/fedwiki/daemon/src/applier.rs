//! Server-side action application
//!
//! One submitted action against one slug moves a page through:
//!
//! 1. the write gate ([`SiteAccess::may_write`])
//! 2. base page resolution (fork marker, `create`, standalone `fork`, or the
//!    stored page)
//! 3. story mutation ([`fedwiki_journal::apply_action`])
//! 4. journal append and persistence
//!
//! Every rejection happens before anything is written. The read-modify-write
//! is not guarded by a version check: the last writer wins.

use crate::auth::SiteAccess;
use crate::error::ApplyError;
use crate::remote::RemoteFetcher;
use crate::storage::Storage;
use fedwiki_journal::{apply_action, recognise, JournalError};
use fedwiki_types::{now_millis, validate_site, Action, ActionKind, JournalEntry, Page, Slug};
use std::sync::Arc;

/// Applies journal actions to stored pages
#[derive(Clone)]
pub struct ActionApplier {
    storage: Arc<dyn Storage>,
    remote: Arc<dyn RemoteFetcher>,
}

impl ActionApplier {
    pub fn new(storage: Arc<dyn Storage>, remote: Arc<dyn RemoteFetcher>) -> Self {
        Self { storage, remote }
    }

    /// Apply the JSON-encoded action `raw` to `slug` on `site`.
    ///
    /// Returns the action as it was appended to the journal.
    pub async fn apply(
        &self,
        site: Option<&str>,
        slug: &Slug,
        access: SiteAccess,
        raw: &str,
    ) -> Result<Action, ApplyError> {
        if !access.may_write() {
            tracing::warn!(%slug, "Rejected write to claimed site");
            return Err(ApplyError::Forbidden);
        }

        let mut action = parse_action(raw)?;

        let mut page = match action.take_fork() {
            Some(source) => self.fork_base(site, slug, &source, action.date).await?,
            None => self.base_page(site, slug, &action).await?,
        };

        apply_action(&mut page.story, &action);
        page.journal.push(action.clone().into());
        self.storage.put_page(site, slug, &page).await?;

        tracing::info!(
            %slug,
            site = site.unwrap_or("-"),
            action = action.type_name(),
            "Applied action"
        );
        Ok(action)
    }

    /// Copy `slug` from `source`, record the fork and persist it as the base.
    async fn fork_base(
        &self,
        site: Option<&str>,
        slug: &Slug,
        source: &str,
        date: Option<i64>,
    ) -> Result<Page, ApplyError> {
        validate_site(source).map_err(|e| ApplyError::BadRequest(e.to_string()))?;

        let mut page = self.remote.fetch_page(source, slug).await?;
        let date = date.unwrap_or_else(now_millis);
        let marker = Action::fork(Some(source.to_string())).with_date(date);
        page.journal.push(JournalEntry::from(marker));
        self.storage.put_page(site, slug, &page).await?;

        tracing::info!(%slug, %source, "Forked page ahead of action");
        Ok(page)
    }

    async fn base_page(
        &self,
        site: Option<&str>,
        slug: &Slug,
        action: &Action,
    ) -> Result<Page, ApplyError> {
        match &action.kind {
            ActionKind::Create { item } => {
                if self.storage.page_exists(site, slug).await? {
                    return Err(ApplyError::Conflict(slug.clone()));
                }
                let title = item.title.clone().unwrap_or_else(|| slug.to_string());
                Ok(Page::new(title))
            }
            ActionKind::Fork { site: source } => {
                let source = source
                    .as_deref()
                    .ok_or_else(|| ApplyError::BadRequest("fork action without site".into()))?;
                validate_site(source).map_err(|e| ApplyError::BadRequest(e.to_string()))?;
                Ok(self.remote.fetch_page(source, slug).await?)
            }
            _ => self
                .storage
                .get_page(site, slug)
                .await?
                .ok_or_else(|| ApplyError::NotFound(slug.clone())),
        }
    }
}

fn parse_action(raw: &str) -> Result<Action, ApplyError> {
    let entry: JournalEntry =
        serde_json::from_str(raw).map_err(|e| ApplyError::BadRequest(e.to_string()))?;
    if !entry_is_object(&entry) {
        return Err(ApplyError::BadRequest("action must be a JSON object".into()));
    }
    recognise(entry).map_err(|e| match e {
        JournalError::Unsupported(kind) => {
            tracing::warn!(%kind, "Unfamiliar action");
            ApplyError::NotImplemented(kind)
        }
        malformed @ JournalError::Malformed(_) => ApplyError::BadRequest(malformed.to_string()),
    })
}

fn entry_is_object(entry: &JournalEntry) -> bool {
    match entry {
        JournalEntry::Action(_) => true,
        JournalEntry::Unrecognized(raw) => raw.is_object(),
    }
}
