//! Resolution context: the ordered chain of sites searched for a page
//!
//! A browsing session starts with just the origin. Each page loaded reveals
//! the sites it was forked from, and those are appended so later lookups
//! fall back to them. The context is a plain value: resolution takes a
//! snapshot and hands back an extended copy for the caller to keep.

use fedwiki_types::{Page, SiteRef};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolutionContext {
    sites: Vec<SiteRef>,
}

impl Default for ResolutionContext {
    fn default() -> Self {
        Self {
            sites: vec![SiteRef::Origin],
        }
    }
}

impl ResolutionContext {
    /// `["origin"]`
    pub fn new() -> Self {
        Self::default()
    }

    /// A context holding exactly `sites`, duplicates dropped
    pub fn from_sites(sites: impl IntoIterator<Item = SiteRef>) -> Self {
        let mut context = Self { sites: Vec::new() };
        for site in sites {
            context.push(site);
        }
        context
    }

    pub fn sites(&self) -> &[SiteRef] {
        &self.sites
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn contains(&self, site: &SiteRef) -> bool {
        self.sites.contains(site)
    }

    /// Append `site` unless already present. Returns whether it was added.
    pub fn push(&mut self, site: SiteRef) -> bool {
        if self.contains(&site) {
            return false;
        }
        self.sites.push(site);
        true
    }

    /// Learn the fork sites of `page`, newest first
    pub fn discover(&mut self, page: &Page) -> usize {
        page.fork_sites()
            .into_iter()
            .filter(|site| self.push(SiteRef::from(Some(site.clone()))))
            .count()
    }

    /// Fold another context's sites into this one, keeping this order first
    pub fn merge(&mut self, other: &ResolutionContext) {
        for site in &other.sites {
            self.push(site.clone());
        }
    }
}

impl fmt::Display for ResolutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.sites.iter().map(ToString::to_string).collect();
        f.write_str(&names.join(" => "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fedwiki_types::Action;

    fn remote(site: &str) -> SiteRef {
        SiteRef::Remote(site.to_string())
    }

    #[test]
    fn test_starts_at_origin() {
        let context = ResolutionContext::new();
        assert_eq!(context.sites(), &[SiteRef::Origin]);
        assert_eq!(context.to_string(), "origin");
    }

    #[test]
    fn test_discovery_is_append_only_and_deduplicated() {
        let mut page = Page::new("p");
        page.journal.push(Action::fork(Some("a.example".into())).into());
        page.journal.push(Action::fork(Some("b.example".into())).into());

        let mut context = ResolutionContext::from_sites([SiteRef::Origin, remote("a.example")]);
        assert_eq!(context.discover(&page), 1);
        assert_eq!(
            context.sites(),
            &[SiteRef::Origin, remote("a.example"), remote("b.example")]
        );
        assert_eq!(context.discover(&page), 0);
    }

    #[test]
    fn test_merge_keeps_existing_order() {
        let mut mine = ResolutionContext::from_sites([SiteRef::Origin, remote("b.example")]);
        let theirs = ResolutionContext::from_sites([remote("a.example"), remote("b.example")]);
        mine.merge(&theirs);
        assert_eq!(mine.to_string(), "origin => b.example => a.example");
    }
}
