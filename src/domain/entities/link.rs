//! Short link entity and its lifecycle predicates.

use chrono::{DateTime, Utc};

/// A stored mapping from a short code to an original URL.
///
/// `is_active` only ever moves from `true` to `false`. Expiration is evaluated
/// against a `now` supplied by the caller so that a single decision uses one clock read.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortLink {
    pub id: i64,
    pub short_code: String,
    pub original_url: String,
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub last_accessed_at: Option<DateTime<Utc>>,
    /// Reserved; carried through storage but never interpreted.
    pub custom_alias: Option<String>,
    /// Reserved; carried through storage but never interpreted.
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ShortLink {
    /// Returns true if the link has an expiry at or before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| e <= now)
    }

    /// Returns true if the link may still be handed out or redirected at `now`.
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && !self.is_expired_at(now)
    }

    /// Returns true if any of `tags` is present on this link.
    pub fn has_any_tag(&self, tags: &[String]) -> bool {
        self.tags.iter().any(|t| tags.contains(t))
    }
}

/// Input data for inserting a new short link.
///
/// New links are always active; `tags` are stored as given, duplicates included.
#[derive(Debug, Clone)]
pub struct NewShortLink {
    pub short_code: String,
    pub original_url: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
}
