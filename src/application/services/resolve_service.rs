//! Short code resolution service.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::domain::repositories::LinkRepository;
use crate::error::{AppError, NotFoundReason};

/// Service that resolves short codes to their original URLs for redirection.
///
/// Each call reads the clock once and runs two phases against that instant:
///
/// 1. **Evaluate** - look the code up and classify it as missing, inactive, expired or usable
/// 2. **Apply** - deactivate an expired link, or stamp `last_accessed_at` on a usable one
///
/// Both transitions are conditional single-record updates, so a concurrent sweep can
/// never be undone and a link deactivated mid-call is reported as not found.
pub struct ResolveService {
    repository: Arc<dyn LinkRepository>,
}

impl ResolveService {
    /// Creates a new resolve service.
    pub fn new(repository: Arc<dyn LinkRepository>) -> Self {
        Self { repository }
    }

    /// Resolves `code` to the URL to redirect to.
    ///
    /// A failure to record the access time fails the call; the caller never
    /// redirects without the access being persisted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] with reason `missing`, `inactive` or `expired`.
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        let now = Utc::now();

        let link = self
            .repository
            .find_by_code(code)
            .await
            .map_err(|e| e.context("resolve", code))?
            .ok_or_else(|| not_found(code, NotFoundReason::Missing))?;

        if !link.is_active {
            return Err(not_found(code, NotFoundReason::Inactive));
        }

        if link.is_expired_at(now) {
            let flipped = self
                .repository
                .deactivate(code)
                .await
                .map_err(|e| e.context("resolve", code))?;
            debug!(code, flipped, "Deactivated expired short link on access");
            return Err(not_found(code, NotFoundReason::Expired));
        }

        match self
            .repository
            .touch(code, now)
            .await
            .map_err(|e| e.context("resolve", code))?
        {
            Some(link) => {
                debug!(code, "Short link accessed");
                Ok(link.original_url)
            }
            // Deactivated between the lookup and the access stamp.
            None => Err(not_found(code, NotFoundReason::Inactive)),
        }
    }
}

fn not_found(code: &str, reason: NotFoundReason) -> AppError {
    warn!(code, reason = reason.as_str(), "Short link did not resolve");
    AppError::link_not_found(code, reason)
}
