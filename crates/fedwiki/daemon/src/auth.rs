//! Write authorization
//!
//! A site is open to anyone until an owner identity is configured or the
//! site is claimed. After that only the owner may write. Ownership is proven
//! with `Authorization: Bearer <owner token>`.

use crate::storage::{StatusStorage, StorageResult};
use axum::http::{header::AUTHORIZATION, HeaderMap};

/// What the daemon knows about the caller and the site
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SiteAccess {
    pub authenticated: bool,
    pub identified: bool,
    pub claimed: bool,
}

impl SiteAccess {
    pub fn may_write(&self) -> bool {
        self.authenticated || (!self.identified && !self.claimed)
    }
}

/// Decides whether a request comes from the site owner
#[derive(Debug, Clone, Default)]
pub struct Authenticator {
    owner_token: Option<String>,
}

impl Authenticator {
    pub fn new(owner_token: Option<String>) -> Self {
        Self { owner_token }
    }

    pub fn is_authenticated(&self, headers: &HeaderMap) -> bool {
        let Some(expected) = self.owner_token.as_deref() else {
            return false;
        };
        headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .is_some_and(|token| token.trim() == expected)
    }

    /// Gather the access facts for one request against one site
    pub async fn access<S>(
        &self,
        status: &S,
        site: Option<&str>,
        headers: &HeaderMap,
    ) -> StorageResult<SiteAccess>
    where
        S: StatusStorage + ?Sized,
    {
        Ok(SiteAccess {
            authenticated: self.is_authenticated(headers),
            identified: status.is_identified(site).await?,
            claimed: status.is_claimed(site).await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStorage;
    use axum::http::HeaderValue;

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        headers
    }

    #[test]
    fn test_open_site_is_writable() {
        assert!(SiteAccess::default().may_write());
    }

    #[test]
    fn test_claimed_or_identified_site_needs_owner() {
        let claimed = SiteAccess {
            claimed: true,
            ..Default::default()
        };
        let identified = SiteAccess {
            identified: true,
            ..Default::default()
        };
        assert!(!claimed.may_write());
        assert!(!identified.may_write());
        assert!(SiteAccess {
            authenticated: true,
            ..claimed
        }
        .may_write());
    }

    #[test]
    fn test_bearer_token() {
        let auth = Authenticator::new(Some("secret".into()));
        assert!(auth.is_authenticated(&bearer("secret")));
        assert!(!auth.is_authenticated(&bearer("guess")));
        assert!(!auth.is_authenticated(&HeaderMap::new()));
        assert!(!Authenticator::default().is_authenticated(&bearer("secret")));
    }

    #[tokio::test]
    async fn test_access_reads_site_status() {
        let storage = InMemoryStorage::new();
        storage.claim(Some("a.example")).await;
        let auth = Authenticator::default();

        let access = auth
            .access(&storage, Some("a.example"), &HeaderMap::new())
            .await
            .unwrap();
        assert!(access.claimed);
        assert!(!access.may_write());

        let other = auth.access(&storage, None, &HeaderMap::new()).await.unwrap();
        assert!(other.may_write());
    }
}
