//! The client write path
//!
//! Every edit becomes an [`Action`] that is stamped, marked with fork
//! provenance when the page came from another site, folded into the
//! client's copy of the page and then persisted either to the local store
//! or to the server.
//!
//! The client copy's story moves forward by folding the new action onto the
//! story it already has, under the replay rules. It is never taken from a
//! rendered view, and items the journal does not mention are kept.

use crate::cache::LocalStore;
use crate::error::ClientResult;
use crate::sink::ActionSink;
use fedwiki_journal::replay_step;
use fedwiki_types::{now_millis, Action, ActionKind, Page, Slug};
use std::sync::Arc;

/// A page open for editing
#[derive(Debug, Clone, PartialEq)]
pub struct PageHandle {
    pub slug: Slug,
    pub page: Page,
    /// Set while the page is shown as it exists on another site
    pub remote_site: Option<String>,
}

impl PageHandle {
    pub fn new(slug: Slug, page: Page) -> Self {
        Self {
            slug,
            page,
            remote_site: None,
        }
    }

    pub fn from_site(slug: Slug, page: Page, site: impl Into<String>) -> Self {
        Self {
            slug,
            page,
            remote_site: Some(site.into()),
        }
    }

    /// Path segment pair locating this page in a lineup URL:
    /// `view/<slug>` for own pages, `<site>/<slug>` otherwise
    pub fn location(&self) -> String {
        match &self.remote_site {
            Some(site) => format!("{}/{}", site, self.slug),
            None => format!("view/{}", self.slug),
        }
    }
}

/// Where an action ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Persistence {
    /// Written to the local store
    Local,
    /// Accepted by the server
    Server,
    /// The server could not be reached or refused; the client copy keeps
    /// the edit anyway
    Unsaved { error: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    /// The action as dispatched
    pub action: Action,
    /// Site the page was claimed from by this submission
    pub forked_from: Option<String>,
    pub persistence: Persistence,
}

/// Dispatches edits to the local store or the server
#[derive(Clone)]
pub struct Writer {
    sink: Arc<dyn ActionSink>,
    local: Option<Arc<dyn LocalStore>>,
}

impl Writer {
    pub fn new(sink: Arc<dyn ActionSink>) -> Self {
        Self { sink, local: None }
    }

    /// Persist to `local` instead of the server (local-storage mode)
    pub fn with_local_store(mut self, local: Arc<dyn LocalStore>) -> Self {
        self.local = Some(local);
        self
    }

    pub async fn submit(
        &self,
        handle: &mut PageHandle,
        mut action: Action,
    ) -> ClientResult<SubmitOutcome> {
        let date = now_millis();
        action.stamp(date);

        let forked_from = match handle.remote_site.take() {
            Some(site) if !matches!(action.kind, ActionKind::Fork { .. }) => {
                let provenance = Action::fork(Some(site.clone())).with_date(date);
                handle.page.journal.push(provenance.into());
                tracing::info!(slug = %handle.slug, %site, "Claiming remote page");
                Some(site)
            }
            Some(site) => {
                tracing::debug!(slug = %handle.slug, %site, "Explicit fork");
                None
            }
            None => None,
        };

        replay_step(&mut handle.page, &action);
        handle.page.journal.push(action.clone().into());

        let persistence = match &self.local {
            Some(local) => {
                local.put_page(&handle.slug, &handle.page).await?;
                Persistence::Local
            }
            None => {
                // The server records the fork itself when it sees the marker.
                let outgoing = match &forked_from {
                    Some(site) => action.clone().with_fork_marker(site.clone()),
                    None => action.clone(),
                };
                match self.sink.send(&handle.slug, &outgoing).await {
                    Ok(()) => Persistence::Server,
                    Err(e) => {
                        tracing::warn!(slug = %handle.slug, error = %e, "Action not saved");
                        Persistence::Unsaved {
                            error: e.to_string(),
                        }
                    }
                }
            }
        };

        Ok(SubmitOutcome {
            action,
            forked_from,
            persistence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::InMemoryLocalStore;
    use crate::error::ClientError;
    use async_trait::async_trait;
    use fedwiki_types::{Item, ItemId};
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        sent: Mutex<Vec<(Slug, Action)>>,
        fail: bool,
    }

    #[async_trait]
    impl ActionSink for RecordingSink {
        async fn send(&self, slug: &Slug, action: &Action) -> ClientResult<()> {
            self.sent.lock().await.push((slug.clone(), action.clone()));
            if self.fail {
                return Err(ClientError::Api {
                    status: 500,
                    message: "boom".into(),
                });
            }
            Ok(())
        }
    }

    fn handle() -> PageHandle {
        let item = Item::new(ItemId::new("a"), "paragraph").with_field("text", "first");
        let mut page = Page::new("Notes");
        page.journal.push(Action::create("Notes").into());
        page.journal.push(Action::add(item.clone(), None).into());
        page.story.push(item);
        PageHandle::new(Slug::parse("notes").unwrap(), page)
    }

    fn edit() -> Action {
        Action::edit(Item::new(ItemId::new("a"), "paragraph").with_field("text", "changed"))
    }

    #[tokio::test]
    async fn test_submit_stamps_and_sends() {
        let sink = Arc::new(RecordingSink::default());
        let writer = Writer::new(sink.clone());
        let mut handle = handle();

        let outcome = writer.submit(&mut handle, edit()).await.unwrap();
        assert_eq!(outcome.persistence, Persistence::Server);
        assert!(outcome.action.date.is_some());
        assert_eq!(handle.page.journal.len(), 3);
        assert_eq!(handle.page.story[0].text(), Some("changed"));

        let sent = sink.sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert!(sent[0].1.fork.is_none());
    }

    #[tokio::test]
    async fn test_remote_page_is_claimed_with_fork_marker() {
        let sink = Arc::new(RecordingSink::default());
        let writer = Writer::new(sink.clone());
        let mut handle = handle();
        handle.remote_site = Some("a.example".into());
        assert_eq!(handle.location(), "a.example/notes");

        let outcome = writer.submit(&mut handle, edit()).await.unwrap();
        assert_eq!(outcome.forked_from.as_deref(), Some("a.example"));
        assert!(handle.remote_site.is_none());
        assert_eq!(handle.location(), "view/notes");

        let kinds: Vec<_> = handle
            .page
            .journal
            .iter()
            .filter_map(|entry| entry.type_name())
            .collect();
        assert_eq!(kinds, vec!["create", "add", "fork", "edit"]);
        assert_eq!(handle.page.journal[2].date(), outcome.action.date);

        let sent = sink.sent.lock().await;
        assert_eq!(sent[0].1.fork.as_deref(), Some("a.example"));
    }

    #[tokio::test]
    async fn test_explicit_fork_gets_no_extra_entry() {
        let sink = Arc::new(RecordingSink::default());
        let writer = Writer::new(sink);
        let mut handle = handle();
        handle.remote_site = Some("a.example".into());

        let outcome = writer
            .submit(&mut handle, Action::fork(Some("a.example".into())))
            .await
            .unwrap();
        assert!(outcome.forked_from.is_none());
        assert_eq!(handle.page.journal.len(), 3);
        assert!(handle.remote_site.is_none());
    }

    #[tokio::test]
    async fn test_transport_failure_is_optimistic() {
        let sink = Arc::new(RecordingSink {
            fail: true,
            ..Default::default()
        });
        let writer = Writer::new(sink);
        let mut handle = handle();

        let outcome = writer.submit(&mut handle, edit()).await.unwrap();
        assert!(matches!(outcome.persistence, Persistence::Unsaved { .. }));
        assert_eq!(handle.page.story[0].text(), Some("changed"));
    }

    #[tokio::test]
    async fn test_local_mode_stores_updated_page() {
        let sink = Arc::new(RecordingSink::default());
        let store = Arc::new(InMemoryLocalStore::new());
        let writer = Writer::new(sink.clone()).with_local_store(store.clone());
        let mut handle = handle();

        let outcome = writer.submit(&mut handle, edit()).await.unwrap();
        assert_eq!(outcome.persistence, Persistence::Local);
        assert!(sink.sent.lock().await.is_empty());

        let stored = store.get_page(&handle.slug).await.unwrap().unwrap();
        assert_eq!(stored, handle.page);
        assert_eq!(stored.story.len(), 1);
        assert_eq!(stored.story[0].text(), Some("changed"));
        assert_eq!(stored.journal.len(), 3);
    }

    #[tokio::test]
    async fn test_page_without_journal_keeps_its_story() {
        let store = Arc::new(InMemoryLocalStore::new());
        let writer =
            Writer::new(Arc::new(RecordingSink::default())).with_local_store(store.clone());
        let mut page = Page::new("Defaults");
        page.story = ["a", "b", "c"]
            .into_iter()
            .map(|id| Item::new(ItemId::new(id), "paragraph").with_field("text", id))
            .collect();
        let mut handle = PageHandle::new(Slug::parse("defaults").unwrap(), page);

        let changed = Item::new(ItemId::new("b"), "paragraph").with_field("text", "bee");
        writer.submit(&mut handle, Action::edit(changed)).await.unwrap();

        let stored = store.get_page(&handle.slug).await.unwrap().unwrap();
        let ids: Vec<&str> = stored.story.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(stored.story[1].text(), Some("bee"));
        assert_eq!(stored.journal.len(), 1);
    }
}
