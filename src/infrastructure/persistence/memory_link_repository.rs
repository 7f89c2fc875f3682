//! In-process implementation of the link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::{AppError, SHORT_CODE_CONSTRAINT};

#[derive(Default)]
struct Inner {
    links: HashMap<String, ShortLink>,
    next_id: i64,
}

/// Link repository backed by a `HashMap` behind an async `RwLock`.
///
/// Each call holds the lock for its whole read-modify-write, which gives the same
/// single-record atomicity the PostgreSQL backend relies on. Data is lost on restart.
///
/// # Use Cases
///
/// - Local development without PostgreSQL (`STORE_BACKEND=memory`)
/// - Service and handler tests
#[derive(Default)]
pub struct MemoryLinkRepository {
    inner: RwLock<Inner>,
}

impl MemoryLinkRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        debug!("Using in-memory link store");
        Self::default()
    }

    /// Stores a fully formed record as-is, bypassing the create path.
    ///
    /// Lets tests and seeding tools place links in any lifecycle state.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the code is already taken.
    pub async fn insert(&self, mut link: ShortLink) -> Result<ShortLink, AppError> {
        let mut inner = self.inner.write().await;
        if inner.links.contains_key(&link.short_code) {
            return Err(code_conflict(&link.short_code));
        }

        inner.next_id += 1;
        link.id = inner.next_id;
        inner.links.insert(link.short_code.clone(), link.clone());
        Ok(link)
    }

    /// Number of stored links in any state.
    pub async fn len(&self) -> usize {
        self.inner.read().await.links.len()
    }

    /// Returns true if no links are stored.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn code_conflict(code: &str) -> AppError {
    AppError::conflict(
        "Unique constraint violation",
        json!({ "constraint": SHORT_CODE_CONSTRAINT, "code": code }),
    )
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let now = Utc::now();
        self.insert(ShortLink {
            id: 0,
            short_code: new_link.short_code,
            original_url: new_link.original_url,
            is_active: true,
            expires_at: new_link.expires_at,
            tags: new_link.tags,
            last_accessed_at: None,
            custom_alias: None,
            user_id: None,
            created_at: now,
            updated_at: now,
        })
        .await
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        Ok(self.inner.read().await.links.get(code).cloned())
    }

    async fn find_reusable(
        &self,
        original_url: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<ShortLink>, AppError> {
        let inner = self.inner.read().await;

        Ok(inner
            .links
            .values()
            .filter(|l| l.original_url == original_url && l.is_usable_at(now))
            .min_by_key(|l| (l.created_at, l.id))
            .cloned())
    }

    async fn touch(&self, code: &str, now: DateTime<Utc>) -> Result<Option<ShortLink>, AppError> {
        let mut inner = self.inner.write().await;

        let Some(link) = inner.links.get_mut(code) else {
            return Ok(None);
        };
        if !link.is_usable_at(now) {
            return Ok(None);
        }

        let accessed = link
            .last_accessed_at
            .map_or(now, |prev| prev.max(now))
            .max(link.created_at);
        link.last_accessed_at = Some(accessed);
        link.updated_at = Utc::now();

        Ok(Some(link.clone()))
    }

    async fn deactivate(&self, code: &str) -> Result<bool, AppError> {
        let mut inner = self.inner.write().await;

        match inner.links.get_mut(code) {
            Some(link) if link.is_active => {
                link.is_active = false;
                link.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn deactivate_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let mut inner = self.inner.write().await;
        let mut changed = 0;

        for link in inner.links.values_mut() {
            if link.is_active && link.is_expired_at(now) {
                link.is_active = false;
                link.updated_at = Utc::now();
                changed += 1;
            }
        }

        Ok(changed)
    }

    async fn find_active_by_tags(&self, tags: &[String]) -> Result<Vec<ShortLink>, AppError> {
        let inner = self.inner.read().await;

        let mut links: Vec<ShortLink> = inner
            .links
            .values()
            .filter(|l| l.is_active && l.has_any_tag(tags))
            .cloned()
            .collect();
        links.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));

        Ok(links)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
