//! Bundle submission: spawn a site holding the submitted pages

use crate::api::rest::state::{host_name, AppState};
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::{Host, State},
    Form, Json,
};
use fedwiki_types::{now_millis, validate_site, Action, Citation, IdError, Page, Slug};
use rand::Rng;
use serde::Deserialize;
use std::collections::BTreeMap;

const SUBMISSIONS_SLUG: &str = "recent-submissions";

/// Form body of `PUT /submit`
#[derive(Debug, Deserialize)]
pub struct SubmitForm {
    /// JSON object mapping slug to page
    pub bundle: String,
}

/// `PUT /submit`
///
/// Stores every page of the bundle under a freshly spawned site
/// `<n>.<host>`, records a citation of it on this site's
/// `recent-submissions` page, and returns the citation.
pub async fn submit_bundle(
    State(state): State<AppState>,
    Host(host): Host,
    Form(form): Form<SubmitForm>,
) -> ApiResult<Json<Citation>> {
    let bundle: BTreeMap<String, Page> = serde_json::from_str(&form.bundle)
        .map_err(|e| ApiError::BadRequest(format!("invalid bundle: {}", e)))?;
    let pages = bundle
        .into_iter()
        .map(|(slug, page)| {
            Slug::parse(slug)
                .map(|slug| (slug, page))
                .map_err(|e| ApiError::BadRequest(e.to_string()))
        })
        .collect::<ApiResult<Vec<_>>>()?;

    let local = state.site_for(&host)?;
    let (spawn, site) = spawn_site(&host)?;
    for (slug, page) in &pages {
        state.storage.put_page(Some(&spawn), slug, page).await?;
    }

    let text = pages
        .iter()
        .map(|(slug, page)| {
            let title = if page.title.is_empty() { slug.as_str() } else { &page.title };
            format!("<li> [[{}]]", title)
        })
        .collect::<Vec<_>>()
        .join("\n");
    let citation = Citation::new(site, Slug::parse("recent-changes")?, "Recent Changes", text);

    record_submission(&state, local, &citation).await?;

    tracing::info!(site = %citation.site, pages = pages.len(), "Spawned site from bundle");
    Ok(Json(citation))
}

/// Append the citation to this site's submissions page
async fn record_submission(
    state: &AppState,
    site: Option<&str>,
    citation: &Citation,
) -> ApiResult<()> {
    let slug = Slug::parse(SUBMISSIONS_SLUG)?;
    let mut page = state
        .storage
        .get_page(site, &slug)
        .await?
        .unwrap_or_else(|| Page::new("Recent Submissions"));

    let item = citation.to_item();
    page.story.push(item.clone());
    page.journal
        .push(Action::add(item, None).with_date(now_millis()).into());
    state.storage.put_page(site, &slug, &page).await?;
    Ok(())
}

/// Pick a new site name under `host`: the storage key (no port) and the
/// address others reach it at (port kept unless it is 80).
fn spawn_site(host: &str) -> Result<(String, String), IdError> {
    validate_site(host)?;
    let n: u32 = rand::thread_rng().gen_range(0..1_000_000);
    let spawn = format!("{}.{}", n, host_name(host));
    let site = match host.split_once(':') {
        Some((_, port)) if port != "80" => format!("{}:{}", spawn, port),
        _ => spawn.clone(),
    };
    Ok((spawn, site))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_site_keeps_port() {
        let (spawn, site) = spawn_site("localhost:1111").unwrap();
        assert!(spawn.ends_with(".localhost"));
        assert_eq!(site, format!("{}:1111", spawn));

        let (spawn, site) = spawn_site("wiki.example:80").unwrap();
        assert_eq!(site, spawn);
        let (spawn, site) = spawn_site("wiki.example").unwrap();
        assert_eq!(site, spawn);

        assert!(spawn_site("x/../../../escaped").is_err());
        assert!(spawn_site("..").is_err());
    }
}
