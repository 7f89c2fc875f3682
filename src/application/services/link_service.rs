//! Read-only link queries and the short URL projection.

use std::sync::Arc;

use tracing::debug;

use crate::domain::entities::ShortLink;
use crate::domain::repositories::LinkRepository;
use crate::error::{AppError, NotFoundReason};

/// Service for looking up links without changing their state.
pub struct LinkService {
    repository: Arc<dyn LinkRepository>,
    public_base_url: String,
}

impl LinkService {
    /// Creates a new link service.
    ///
    /// `public_base_url` is the address short codes are appended to, e.g.
    /// `https://sho.rt/s`. A trailing slash is ignored.
    pub fn new(repository: Arc<dyn LinkRepository>, public_base_url: impl Into<String>) -> Self {
        let public_base_url = public_base_url.into().trim_end_matches('/').to_string();
        Self {
            repository,
            public_base_url,
        }
    }

    /// Returns the stored link for `code` in whatever state it is in.
    ///
    /// Unlike resolution, this never deactivates an expired link or records an access.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn get_details(&self, code: &str) -> Result<ShortLink, AppError> {
        self.repository
            .find_by_code(code)
            .await
            .map_err(|e| e.context("get_details", code))?
            .ok_or_else(|| AppError::link_not_found(code, NotFoundReason::Missing))
    }

    /// Lists active links that carry any of `tags`, newest first.
    ///
    /// An empty tag list matches nothing and skips the store.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn list_by_tags(&self, tags: &[String]) -> Result<Vec<ShortLink>, AppError> {
        if tags.is_empty() {
            return Ok(Vec::new());
        }

        let links = self
            .repository
            .find_active_by_tags(tags)
            .await
            .map_err(|e| e.context("list_by_tags", &tags.join(",")))?;

        debug!(count = links.len(), "Listed short links by tag");
        Ok(links)
    }

    /// Constructs the public short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.public_base_url, code)
    }
}
