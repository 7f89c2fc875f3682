//! API route configuration.

use crate::api::handlers::{
    cleanup_expired_handler, create_link_handler, link_details_handler, links_by_tags_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Link management routes, nested under `/api`.
///
/// # Endpoints
///
/// - `POST /links`                  - Shorten a URL (reuses an active mapping if present)
/// - `GET  /links?tags=a,b`         - Active links carrying any of the tags
/// - `GET  /links/{code}`           - Details of a link in any state
/// - `POST /links/cleanup/expired`  - Run the expired-link sweep now
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/links",
            post(create_link_handler).get(links_by_tags_handler),
        )
        .route("/links/cleanup/expired", post(cleanup_expired_handler))
        .route("/links/{code}", get(link_details_handler))
}
