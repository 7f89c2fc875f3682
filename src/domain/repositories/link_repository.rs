//! Repository trait for short link data access.

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Record store for short links.
///
/// Implementations rely on the store's own single-record atomicity; no application-level
/// locking is done around these calls. Deactivation is monotone (`true -> false`), so
/// concurrent [`Self::deactivate`] and [`Self::deactivate_expired`] calls commute.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryLinkRepository`] - in-process store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new active link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] with the short-code constraint in its details if the
    /// code is already taken (see [`AppError::is_code_collision`]).
    /// Returns [`AppError::Internal`] on store errors.
    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError>;

    /// Finds a link by short code regardless of its state.
    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError>;

    /// Finds an active link for `original_url` that has no expiry or expires after `now`.
    async fn find_reusable(
        &self,
        original_url: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<ShortLink>, AppError>;

    /// Records an access at `now` on a link that is still active and unexpired at `now`.
    ///
    /// `last_accessed_at` never moves backwards and never precedes `created_at`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(link))` with the updated record
    /// - `Ok(None)` if the link is missing, inactive, or expired at `now`
    async fn touch(&self, code: &str, now: DateTime<Utc>) -> Result<Option<ShortLink>, AppError>;

    /// Marks a single link inactive.
    ///
    /// Returns `Ok(true)` if this call flipped the flag, `Ok(false)` if the link was
    /// already inactive or does not exist.
    async fn deactivate(&self, code: &str) -> Result<bool, AppError>;

    /// Marks every active link with `expires_at <= now` inactive.
    ///
    /// Returns the number of links this call changed.
    async fn deactivate_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError>;

    /// Lists active links carrying at least one of `tags`, newest first.
    async fn find_active_by_tags(&self, tags: &[String]) -> Result<Vec<ShortLink>, AppError>;

    /// Checks that the store is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}
