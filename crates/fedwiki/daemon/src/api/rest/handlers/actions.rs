//! Action submission handler

use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::{Host, Path, State},
    http::HeaderMap,
    Form,
};
use fedwiki_types::Slug;
use serde::Deserialize;

/// Form body of `PUT /page/<slug>/action`
#[derive(Debug, Deserialize)]
pub struct ActionForm {
    /// JSON-encoded action
    pub action: String,
}

/// `PUT /page/<slug>/action`
pub async fn put_action(
    State(state): State<AppState>,
    Host(host): Host,
    Path(slug): Path<String>,
    headers: HeaderMap,
    Form(form): Form<ActionForm>,
) -> ApiResult<&'static str> {
    let slug = Slug::parse(slug).map_err(|e| ApiError::NotFound(e.to_string()))?;
    let site = state.site_for(&host)?;

    let access = state
        .auth
        .access(state.storage.as_ref(), site, &headers)
        .await?;
    state.applier.apply(site, &slug, access, &form.action).await?;

    Ok("ok")
}
