//! Bulk deactivation of expired links.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Service that deactivates every active link whose expiry has passed.
///
/// Safe to run concurrently with resolution: both only ever move `is_active` from
/// `true` to `false`, so whichever runs first wins and the other is a no-op.
pub struct SweepService {
    repository: Arc<dyn LinkRepository>,
}

impl SweepService {
    /// Creates a new sweep service.
    pub fn new(repository: Arc<dyn LinkRepository>) -> Self {
        Self { repository }
    }

    /// Deactivates all links with `expires_at <= now` that are still active.
    ///
    /// Returns the number of links changed by this call; links already deactivated
    /// (lazily or by an earlier sweep) are not counted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn sweep_expired(&self) -> Result<u64, AppError> {
        let now = Utc::now();
        info!("Starting deactivation of expired short links");

        let deactivated = self
            .repository
            .deactivate_expired(now)
            .await
            .map_err(|e| e.context("sweep_expired", &now.to_rfc3339()))?;

        info!(deactivated, "Deactivated expired short links");
        Ok(deactivated)
    }
}
