//! API Router configuration

use super::handlers;
use super::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the wiki router
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.max_body_size;

    Router::new()
        // System
        .route("/system/slugs.json", get(handlers::list_slugs))
        .route("/system/sitemap.json", get(handlers::sitemap))
        .route("/recent-changes.json", get(handlers::recent_changes))
        .route("/data/:search", get(handlers::find_data))
        // Pages
        .route("/:file", get(handlers::get_page))
        .route("/remote/:site/:file", get(handlers::get_remote_page))
        .route("/page/:slug/action", put(handlers::put_action))
        .route("/submit", put(handlers::submit_bundle))
        // Middleware
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Wrap the router in a permissive CORS layer; pages are meant to be read
/// by other sites' clients.
pub fn with_cors(router: Router) -> Router {
    router.layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    )
}
