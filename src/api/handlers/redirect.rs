//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /s/{code}`
///
/// # Request Flow
///
/// 1. Look the code up
/// 2. Reject missing or inactive links
/// 3. Deactivate the link if it has expired, then reject it
/// 4. Record the access time
/// 5. Return 307 Temporary Redirect
///
/// # Errors
///
/// Returns 404 Not Found for missing, inactive and expired codes alike; the reason
/// is only in `error.details.reason` and the logs.
/// Returns 500 if the store fails, including while recording the access.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let original_url = state.resolve_service.resolve(&code).await?;

    debug!(code = %code, "Redirecting");

    Ok(Redirect::temporary(&original_url))
}
