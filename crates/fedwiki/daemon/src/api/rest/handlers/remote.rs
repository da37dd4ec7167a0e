//! Proxy for pages held by other sites

use super::pages::{serve_page, slug_from_file};
use crate::api::rest::state::{host_name, AppState};
use crate::error::ApiResult;
use axum::{
    extract::{Host, Path, State},
    Json,
};
use fedwiki_types::{validate_site, Page};

/// `GET /remote/<site>/<slug>.json`
///
/// Served from storage when `site` is this host or a farm site held here,
/// otherwise relayed to the named site.
pub async fn get_remote_page(
    State(state): State<AppState>,
    Host(host): Host,
    Path((site, file)): Path<(String, String)>,
) -> ApiResult<Json<Page>> {
    validate_site(&site)?;
    let local = state.site_for(&host)?;
    let slug = slug_from_file(&file)?;
    let target = host_name(&site);

    if target == host_name(&host) {
        return serve_page(&state, local, &slug).await.map(Json);
    }
    if state.storage.site_exists(target).await? {
        return serve_page(&state, Some(target), &slug).await.map(Json);
    }

    tracing::debug!(%site, %slug, "Relaying remote page");
    let page = state.remote.fetch_page(&site, &slug).await?;
    Ok(Json(page))
}
