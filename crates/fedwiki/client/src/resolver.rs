//! Federated page lookup
//!
//! A request for a slug is answered from, in order:
//!
//! 1. nothing at all, when the server already rendered the page
//! 2. the local store, in local-storage mode
//! 3. the first site in the search chain that has the page
//!
//! The chain is the request's explicit site alone, or a snapshot of the
//! session's [`ResolutionContext`]. Candidates are tried strictly one after
//! another so the first success in chain order always wins.

use crate::cache::LocalStore;
use crate::context::ResolutionContext;
use crate::fetcher::PageFetcher;
use fedwiki_journal::Replay;
use fedwiki_types::{Page, Revision, SiteRef, Slug};
use std::sync::Arc;

/// What the caller wants to see
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub slug: Slug,
    /// Show the page as of this revision instead of its head
    pub rev: Option<Revision>,
    /// Look only on this site
    pub site: Option<SiteRef>,
    /// The page markup came from the server; nothing to fetch
    pub was_server_generated: bool,
}

impl PageRequest {
    pub fn new(slug: Slug) -> Self {
        Self {
            slug,
            rev: None,
            site: None,
            was_server_generated: false,
        }
    }

    pub fn at_revision(mut self, rev: Revision) -> Self {
        self.rev = Some(rev);
        self
    }

    pub fn on_site(mut self, site: SiteRef) -> Self {
        self.site = Some(site);
        self
    }

    pub fn server_generated(mut self) -> Self {
        self.was_server_generated = true;
        self
    }
}

/// Where a resolved page came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSource {
    /// The local page store
    Local,
    /// The client's own site
    Origin,
    /// Another site, reached through the origin's proxy
    Remote(String),
}

impl From<&SiteRef> for PageSource {
    fn from(site: &SiteRef) -> Self {
        match site {
            SiteRef::Origin => PageSource::Origin,
            SiteRef::Remote(site) => PageSource::Remote(site.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Nothing fetched; the caller already has the content
    ServerGenerated,
    Found { page: Page, source: PageSource },
    /// Every candidate failed
    NotFound,
}

/// A resolution together with the context the caller should adopt
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub outcome: Resolution,
    pub context: ResolutionContext,
}

/// Resolves page requests across the local store and the site chain
#[derive(Clone)]
pub struct Resolver {
    fetcher: Arc<dyn PageFetcher>,
    local: Option<Arc<dyn LocalStore>>,
}

impl Resolver {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            fetcher,
            local: None,
        }
    }

    /// Consult `local` before the network (local-storage mode)
    pub fn with_local_store(mut self, local: Arc<dyn LocalStore>) -> Self {
        self.local = Some(local);
        self
    }

    pub async fn resolve(&self, request: &PageRequest, context: &ResolutionContext) -> Resolved {
        if request.was_server_generated {
            return Resolved {
                outcome: Resolution::ServerGenerated,
                context: context.clone(),
            };
        }

        if let Some(page) = self.local_copy(&request.slug).await {
            let mut context = context.clone();
            context.discover(&page);
            return Resolved {
                outcome: Resolution::Found {
                    page: truncate(page, request.rev),
                    source: PageSource::Local,
                },
                context,
            };
        }

        // A page that names its own site starts a fresh chain, and so does an
        // empty session.
        let (candidates, mut context) = match &request.site {
            Some(site) => (vec![site.clone()], ResolutionContext::new()),
            None if context.is_empty() => {
                let fresh = ResolutionContext::new();
                (fresh.sites().to_vec(), fresh)
            }
            None => (context.sites().to_vec(), context.clone()),
        };

        for site in candidates {
            match self.fetcher.fetch(&site, &request.slug).await {
                Ok(page) => {
                    context.push(site.clone());
                    let added = context.discover(&page);
                    tracing::debug!(
                        slug = %request.slug,
                        %site,
                        discovered = added,
                        context = %context,
                        "Resolved page"
                    );
                    return Resolved {
                        outcome: Resolution::Found {
                            page: truncate(page, request.rev),
                            source: PageSource::from(&site),
                        },
                        context,
                    };
                }
                Err(e) => {
                    tracing::debug!(slug = %request.slug, %site, error = %e, "Candidate failed");
                }
            }
        }

        tracing::info!(slug = %request.slug, context = %context, "Page not found on any site");
        Resolved {
            outcome: Resolution::NotFound,
            context,
        }
    }

    async fn local_copy(&self, slug: &Slug) -> Option<Page> {
        let local = self.local.as_ref()?;
        match local.get_page(slug).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(%slug, error = %e, "Local store read failed");
                None
            }
        }
    }
}

fn truncate(page: Page, rev: Option<Revision>) -> Page {
    match rev {
        Some(rev) => page.at_revision(rev),
        None => page,
    }
}
