//! Identifiers for pages, story items and sites
//!
//! Slugs and site names travel inside URLs, so both are validated on the way
//! in. Item ids are opaque random hex tokens.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Identifier validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("invalid slug: {0:?}")]
    InvalidSlug(String),

    #[error("invalid site: {0:?}")]
    InvalidSite(String),
}

/// Generate `bytes` random bytes rendered as lowercase hex.
pub fn random_hex(bytes: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..bytes).map(|_| format!("{:02x}", rng.gen::<u8>())).collect()
}

/// URL-safe page name within a site, `[a-z0-9-]+`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    pub fn parse(raw: impl Into<String>) -> Result<Self, IdError> {
        let raw = raw.into();
        let valid = !raw.is_empty()
            && raw
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-');
        if valid {
            Ok(Self(raw))
        } else {
            Err(IdError::InvalidSlug(raw))
        }
    }

    /// Derive the slug for a page title.
    ///
    /// Whitespace becomes `-`, anything outside `[A-Za-z0-9-]` is dropped and
    /// the rest is lowercased, so `"Welcome Visitors"` maps to
    /// `welcome-visitors`. A title with no usable characters has no slug.
    pub fn from_title(title: &str) -> Option<Self> {
        let slug: String = title
            .chars()
            .filter_map(|c| {
                if c.is_whitespace() {
                    Some('-')
                } else if c.is_ascii_alphanumeric() || c == '-' {
                    Some(c.to_ascii_lowercase())
                } else {
                    None
                }
            })
            .collect();
        (!slug.is_empty()).then_some(Self(slug))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Slug {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a story item, unique within one story
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Sixteen hex characters, the width the wiki has always used.
    pub fn generate() -> Self {
        Self(random_hex(8))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Check a site name: `host` or `host:port`, where `host` is one or more
/// non-empty `[a-zA-Z0-9-]` labels joined by `.` and `port` is decimal.
pub fn validate_site(site: &str) -> Result<(), IdError> {
    let (host, port) = match site.split_once(':') {
        Some((host, port)) => (host, Some(port)),
        None => (site, None),
    };
    let host_ok = host.split('.').all(|label| {
        !label.is_empty()
            && label
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-')
    });
    let port_ok = port.map_or(true, |port| {
        !port.is_empty() && port.len() <= 5 && port.bytes().all(|b| b.is_ascii_digit())
    });
    if host_ok && port_ok {
        Ok(())
    } else {
        Err(IdError::InvalidSite(site.to_string()))
    }
}

/// Where a page lives: the requester's own site or a named remote site
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum SiteRef {
    Origin,
    Remote(String),
}

impl SiteRef {
    pub const ORIGIN: &'static str = "origin";

    /// `"origin"` and the empty string both name the local site.
    pub fn parse(raw: &str) -> Result<Self, IdError> {
        if raw.is_empty() || raw == Self::ORIGIN {
            return Ok(SiteRef::Origin);
        }
        validate_site(raw)?;
        Ok(SiteRef::Remote(raw.to_string()))
    }

    pub fn remote(&self) -> Option<&str> {
        match self {
            SiteRef::Origin => None,
            SiteRef::Remote(site) => Some(site),
        }
    }

    pub fn is_origin(&self) -> bool {
        matches!(self, SiteRef::Origin)
    }
}

impl From<Option<String>> for SiteRef {
    fn from(value: Option<String>) -> Self {
        match value {
            None => SiteRef::Origin,
            Some(site) if site.is_empty() || site == SiteRef::ORIGIN => SiteRef::Origin,
            Some(site) => SiteRef::Remote(site),
        }
    }
}

impl From<SiteRef> for String {
    fn from(site: SiteRef) -> Self {
        match site {
            SiteRef::Origin => SiteRef::ORIGIN.to_string(),
            SiteRef::Remote(site) => site,
        }
    }
}

impl fmt::Display for SiteRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteRef::Origin => f.write_str(SiteRef::ORIGIN),
            SiteRef::Remote(site) => f.write_str(site),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_from_title() {
        let slug = |title| Slug::from_title(title).map(|s| s.to_string());
        assert_eq!(slug("Welcome Visitors").as_deref(), Some("welcome-visitors"));
        assert_eq!(slug("How to Wiki?").as_deref(), Some("how-to-wiki"));
        assert_eq!(slug("Ünïcode  x").as_deref(), Some("ncode--x"));
        assert_eq!(slug("???"), None);
        assert_eq!(slug(""), None);
    }

    #[test]
    fn test_slug_parse_rejects_path_characters() {
        assert!(Slug::parse("welcome-visitors").is_ok());
        assert!(Slug::parse("../etc").is_err());
        assert!(Slug::parse("Upper").is_err());
        assert!(Slug::parse("").is_err());
    }

    #[test]
    fn test_item_id_generate_is_hex() {
        let id = ItemId::generate();
        assert_eq!(id.as_str().len(), 16);
        assert!(id.as_str().bytes().all(|b| b.is_ascii_hexdigit()));
    }

    #[test]
    fn test_site_ref_serde() {
        let origin: SiteRef = serde_json::from_str("null").unwrap();
        assert_eq!(origin, SiteRef::Origin);
        let named: SiteRef = serde_json::from_str("\"origin\"").unwrap();
        assert_eq!(named, SiteRef::Origin);
        let remote: SiteRef = serde_json::from_str("\"fed.wiki.org:3000\"").unwrap();
        assert_eq!(remote.remote(), Some("fed.wiki.org:3000"));
        assert_eq!(serde_json::to_string(&SiteRef::Origin).unwrap(), "\"origin\"");
    }

    #[test]
    fn test_validate_site() {
        for ok in ["localhost:1111", "fed.wiki.org", "123.localhost:80", "a-b.example"] {
            assert!(validate_site(ok).is_ok(), "{ok}");
        }
        for bad in [
            "", ".", "..", "a/b", "a..b", ".example", "example.", "../outside", "x:", "x:ab",
            "a:1:2", "host:123456",
        ] {
            assert!(validate_site(bad).is_err(), "{bad}");
        }
    }
}
