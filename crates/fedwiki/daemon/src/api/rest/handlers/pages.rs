//! Page handlers

use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::{Host, Path, State},
    Json,
};
use fedwiki_types::{Page, Slug};

/// Turn a `<slug>.json` path segment into a slug
pub(crate) fn slug_from_file(file: &str) -> ApiResult<Slug> {
    file.strip_suffix(".json")
        .and_then(|name| Slug::parse(name).ok())
        .ok_or_else(|| ApiError::NotFound(format!("no page at {}", file)))
}

/// Load a page from one of this daemon's sites
pub(crate) async fn serve_page(state: &AppState, site: Option<&str>, slug: &Slug) -> ApiResult<Page> {
    state
        .storage
        .get_page(site, slug)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("page {}", slug)))
}

/// `GET /<slug>.json`
pub async fn get_page(
    State(state): State<AppState>,
    Host(host): Host,
    Path(file): Path<String>,
) -> ApiResult<Json<Page>> {
    let slug = slug_from_file(&file)?;
    let page = serve_page(&state, state.site_for(&host)?, &slug).await?;
    Ok(Json(page))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_from_file() {
        assert_eq!(slug_from_file("welcome.json").unwrap().as_str(), "welcome");
        assert!(slug_from_file("welcome").is_err());
        assert!(slug_from_file("Welcome.json").is_err());
        assert!(slug_from_file(".json").is_err());
    }
}
