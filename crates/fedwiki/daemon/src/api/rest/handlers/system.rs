//! Site-wide listings

use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use crate::storage::StoredPage;
use axum::{
    extract::{Host, Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use fedwiki_types::{Citation, Item, ItemId, Page};
use serde::Serialize;

/// Age bins of the recent-changes page, youngest first
pub const TIMESPANS: [&str; 7] = ["Minute", "Hour", "Day", "Week", "Month", "Season", "Year"];

/// One entry of `/system/sitemap.json`
#[derive(Debug, Serialize)]
pub struct SitemapEntry {
    pub slug: String,
    pub title: String,
    /// Last write, ms since the epoch
    pub date: i64,
}

/// `GET /system/slugs.json`
pub async fn list_slugs(
    State(state): State<AppState>,
    Host(host): Host,
) -> ApiResult<Json<Vec<String>>> {
    let pages = state.storage.list_pages(state.site_for(&host)?).await?;
    Ok(Json(pages.into_iter().map(|p| p.slug.to_string()).collect()))
}

/// `GET /system/sitemap.json`
pub async fn sitemap(
    State(state): State<AppState>,
    Host(host): Host,
) -> ApiResult<Json<Vec<SitemapEntry>>> {
    let pages = state.storage.list_pages(state.site_for(&host)?).await?;
    let entries = pages
        .into_iter()
        .map(|stored| SitemapEntry {
            slug: stored.slug.to_string(),
            title: stored.page.title,
            date: stored.updated_at.timestamp_millis(),
        })
        .collect();
    Ok(Json(entries))
}

/// `GET /recent-changes.json`
pub async fn recent_changes(
    State(state): State<AppState>,
    Host(host): Host,
) -> ApiResult<Json<Page>> {
    let pages = state.storage.list_pages(state.site_for(&host)?).await?;
    Ok(Json(recent_changes_page(&host, &pages, Utc::now())))
}

/// `GET /data/<search>`: the first page holding a `data` item whose text
/// mentions `search`
pub async fn find_data(
    State(state): State<AppState>,
    Host(host): Host,
    Path(search): Path<String>,
) -> ApiResult<Json<Page>> {
    let pages = state.storage.list_pages(state.site_for(&host)?).await?;
    pages
        .into_iter()
        .find(|stored| {
            stored.page.story.iter().any(|item| {
                item.kind == "data" && item.text().is_some_and(|text| text.contains(&search))
            })
        })
        .map(|stored| Json(stored.page))
        .ok_or_else(|| ApiError::NotFound(format!("no dataset matching {:?}", search)))
}

/// Bin for something last touched `seconds` ago; `None` beyond a year.
pub fn timespan_since(seconds: f64) -> Option<&'static str> {
    let divisors = [60.0, 60.0, 24.0, 7.0, 4.0, 3.0, 4.0];
    let mut age = seconds;
    for (divisor, name) in divisors.iter().zip(TIMESPANS) {
        age /= divisor;
        if age < 1.0 {
            return Some(name);
        }
    }
    None
}

/// Build the synthetic recent-changes page for `site`
pub fn recent_changes_page(site: &str, pages: &[StoredPage], now: DateTime<Utc>) -> Page {
    let mut story = Vec::new();

    for timespan in TIMESPANS {
        let binned: Vec<&StoredPage> = pages
            .iter()
            .filter(|stored| {
                let age = (now - stored.updated_at).num_milliseconds() as f64 / 1000.0;
                timespan_since(age.max(0.0)) == Some(timespan)
            })
            .collect();
        if binned.is_empty() {
            continue;
        }

        story.push(
            Item::new(ItemId::generate(), "paragraph")
                .with_field("text", format!("<h3>Within a {}</h3>", timespan)),
        );
        for stored in binned.into_iter().filter(|s| !s.page.story.is_empty()) {
            let citation = Citation::new(site, stored.slug.clone(), stored.page.title.clone(), "");
            story.push(citation.to_item());
        }
    }

    Page {
        title: "Recent Changes".to_string(),
        story,
        journal: Vec::new(),
    }
}
