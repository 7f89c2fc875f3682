//! Handlers for link endpoints (create, details, tag search, cleanup).

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::link::{CleanupResponse, CreateLinkRequest, LinkResponse, TagQuery};
use crate::error::AppError;
use crate::state::AppState;

/// Shortens a URL, reusing an existing active mapping when there is one.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// {
///   "originalUrl": "https://example.com/article",
///   "tags": ["news"],               // optional
///   "expiresAt": "2030-01-01"       // optional, ISO-8601 date or date-time
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the URL is missing or malformed, or `expiresAt`
/// is not a valid date.
pub async fn create_link_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let original_url = payload.original_url.unwrap_or_default();

    let link = state
        .shorten_service
        .shorten(&original_url, payload.tags, payload.expires_at.as_deref())
        .await?;

    let short_url = state.link_service.short_url(&link.short_code);

    Ok((StatusCode::CREATED, Json(LinkResponse::new(link, short_url))))
}

/// Returns a link in whatever state it is in.
///
/// # Endpoint
///
/// `GET /api/links/{code}`
///
/// Does not record an access and does not deactivate an expired link.
pub async fn link_details_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state.link_service.get_details(&code).await?;
    let short_url = state.link_service.short_url(&link.short_code);

    Ok(Json(LinkResponse::new(link, short_url)))
}

/// Lists active links carrying any of the requested tags, newest first.
///
/// # Endpoint
///
/// `GET /api/links?tags=news,tech`
///
/// # Errors
///
/// Returns 400 Bad Request if no non-empty tag is given.
pub async fn links_by_tags_handler(
    State(state): State<AppState>,
    Query(query): Query<TagQuery>,
) -> Result<Json<Vec<LinkResponse>>, AppError> {
    let tags = query.normalized();
    if tags.is_empty() {
        return Err(AppError::bad_request(
            "At least one tag is required",
            json!({ "field": "tags" }),
        ));
    }

    let links = state.link_service.list_by_tags(&tags).await?;

    let items = links
        .into_iter()
        .map(|link| {
            let short_url = state.link_service.short_url(&link.short_code);
            LinkResponse::new(link, short_url)
        })
        .collect();

    Ok(Json(items))
}

/// Deactivates every expired link right away instead of waiting for the worker.
///
/// # Endpoint
///
/// `POST /api/links/cleanup/expired`
///
/// # Response
///
/// ```json
/// { "deactivatedCount": 3 }
/// ```
pub async fn cleanup_expired_handler(
    State(state): State<AppState>,
) -> Result<Json<CleanupResponse>, AppError> {
    let deactivated_count = state.sweep_service.sweep_expired().await?;

    Ok(Json(CleanupResponse { deactivated_count }))
}
