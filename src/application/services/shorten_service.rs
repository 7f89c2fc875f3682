//! Short link creation service.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::CodeGenerator;
use crate::utils::expiry::parse_expires_at;
use crate::utils::url_validator::validate_original_url;

/// Service that turns an original URL into a short link.
///
/// # Reuse
///
/// If an active, unexpired link already exists for the exact same URL, it is returned
/// unchanged and the submitted tags and expiry are ignored. Expired or deactivated links
/// are never revived; a fresh code is minted instead.
///
/// # Races
///
/// The lookup and the insert are separate store calls. Two concurrent requests for the
/// same URL may both miss the lookup and create two active codes for one URL.
pub struct ShortenService {
    repository: Arc<dyn LinkRepository>,
    generator: CodeGenerator,
}

impl ShortenService {
    /// Number of codes tried before giving up on a collision streak.
    pub const MAX_CODE_ATTEMPTS: usize = 5;

    /// Creates a new shortening service.
    pub fn new(repository: Arc<dyn LinkRepository>, generator: CodeGenerator) -> Self {
        Self {
            repository,
            generator,
        }
    }

    /// Shortens `original_url`, reusing a still-valid link for the same URL if one exists.
    ///
    /// # Arguments
    ///
    /// - `original_url` - absolute HTTP(S) URL
    /// - `tags` - stored as given, duplicates included
    /// - `expires_at` - optional ISO-8601 date or date-time; `None` means never expires
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is missing or malformed, or the
    /// expiry cannot be parsed.
    /// Returns [`AppError::Internal`] on store errors, or when
    /// [`Self::MAX_CODE_ATTEMPTS`] generated codes all collide.
    pub async fn shorten(
        &self,
        original_url: &str,
        tags: Vec<String>,
        expires_at: Option<&str>,
    ) -> Result<ShortLink, AppError> {
        let original_url = validate_original_url(original_url).map_err(|e| {
            AppError::bad_request(e.to_string(), json!({ "field": "originalUrl" }))
        })?;

        let expires_at = expires_at
            .map(parse_expires_at)
            .transpose()
            .map_err(|e| AppError::bad_request(e.to_string(), json!({ "field": "expiresAt" })))?;

        let now = Utc::now();
        if let Some(existing) = self
            .repository
            .find_reusable(&original_url, now)
            .await
            .map_err(|e| e.context("shorten", &original_url))?
        {
            info!(code = %existing.short_code, "Existing active short link found, reusing it");
            return Ok(existing);
        }

        self.create_with_fresh_code(original_url, tags, expires_at)
            .await
    }

    /// Inserts a new link, regenerating the code whenever the store reports a collision.
    async fn create_with_fresh_code(
        &self,
        original_url: String,
        tags: Vec<String>,
        expires_at: Option<chrono::DateTime<Utc>>,
    ) -> Result<ShortLink, AppError> {
        for attempt in 1..=Self::MAX_CODE_ATTEMPTS {
            let new_link = NewShortLink {
                short_code: self.generator.generate(),
                original_url: original_url.clone(),
                expires_at,
                tags: tags.clone(),
            };

            match self.repository.create(new_link).await {
                Ok(link) => {
                    info!(code = %link.short_code, attempt, "Created new short link");
                    return Ok(link);
                }
                Err(e) if e.is_code_collision() => {
                    warn!(attempt, "Short code collision, regenerating");
                }
                Err(e) => return Err(e.context("shorten", &original_url)),
            }
        }

        Err(AppError::internal(
            "Failed to generate unique short code",
            json!({
                "reason": "code_space_exhausted",
                "attempts": Self::MAX_CODE_ATTEMPTS,
                "code_length": self.generator.length(),
            }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use crate::error::SHORT_CODE_CONSTRAINT;
    use crate::infrastructure::persistence::MemoryLinkRepository;
    use chrono::{DateTime, Duration};

    fn test_link(code: &str, url: &str) -> ShortLink {
        let now = Utc::now();
        ShortLink {
            id: 1,
            short_code: code.to_string(),
            original_url: url.to_string(),
            is_active: true,
            expires_at: None,
            tags: vec![],
            last_accessed_at: None,
            custom_alias: None,
            user_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn collision() -> AppError {
        AppError::conflict(
            "Unique constraint violation",
            json!({ "constraint": SHORT_CODE_CONSTRAINT }),
        )
    }

    fn memory_service() -> (ShortenService, Arc<MemoryLinkRepository>) {
        let repo = Arc::new(MemoryLinkRepository::new());
        let service = ShortenService::new(repo.clone(), CodeGenerator::default());
        (service, repo)
    }

    #[tokio::test]
    async fn test_shorten_creates_active_link() {
        let (service, _repo) = memory_service();

        let link = service
            .shorten(
                "https://example.com/a",
                vec!["news".to_string(), "news".to_string()],
                None,
            )
            .await
            .unwrap();

        assert!(link.is_active);
        assert_eq!(link.original_url, "https://example.com/a");
        assert_eq!(link.short_code.len(), 8);
        assert!(link.expires_at.is_none());
        assert_eq!(link.tags, vec!["news".to_string(), "news".to_string()]);
        assert!(link.custom_alias.is_none());
        assert!(link.user_id.is_none());
    }

    #[tokio::test]
    async fn test_shorten_same_url_twice_reuses_code() {
        let (service, repo) = memory_service();

        let first = service
            .shorten("https://example.com/a", vec![], None)
            .await
            .unwrap();
        let second = service
            .shorten("https://example.com/a", vec!["other".to_string()], None)
            .await
            .unwrap();

        assert_eq!(first.short_code, second.short_code);
        assert!(second.tags.is_empty());
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_shorten_mints_fresh_code_after_expiry() {
        let (service, repo) = memory_service();
        let past = (Utc::now() - Duration::seconds(1)).to_rfc3339();

        let expired = service
            .shorten("https://example.com/a", vec![], Some(&past))
            .await
            .unwrap();
        let fresh = service
            .shorten("https://example.com/a", vec![], None)
            .await
            .unwrap();

        assert_ne!(expired.short_code, fresh.short_code);
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn test_shorten_mints_fresh_code_after_deactivation() {
        let (service, repo) = memory_service();

        let old = service
            .shorten("https://example.com/a", vec![], None)
            .await
            .unwrap();
        repo.deactivate(&old.short_code).await.unwrap();

        let fresh = service
            .shorten("https://example.com/a", vec![], None)
            .await
            .unwrap();

        assert_ne!(old.short_code, fresh.short_code);
        let old = repo.find_by_code(&old.short_code).await.unwrap().unwrap();
        assert!(!old.is_active);
    }

    #[tokio::test]
    async fn test_shorten_parses_expiry() {
        let (service, _repo) = memory_service();

        let link = service
            .shorten("https://example.com/a", vec![], Some("2099-01-01T00:00:00Z"))
            .await
            .unwrap();

        let expected: DateTime<Utc> = "2099-01-01T00:00:00Z".parse().unwrap();
        assert_eq!(link.expires_at, Some(expected));
    }

    #[tokio::test]
    async fn test_shorten_missing_url() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_find_reusable().times(0);
        mock_repo.expect_create().times(0);

        let service = ShortenService::new(Arc::new(mock_repo), CodeGenerator::default());
        let result = service.shorten("  ", vec![], None).await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_shorten_invalid_url() {
        let (service, _repo) = memory_service();

        let result = service.shorten("not-a-url", vec![], None).await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_shorten_invalid_expiry() {
        let (service, repo) = memory_service();

        let result = service
            .shorten("https://example.com", vec![], Some("next tuesday"))
            .await;

        let err = result.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_shorten_retries_on_collision() {
        let mut mock_repo = MockLinkRepository::new();

        mock_repo
            .expect_find_reusable()
            .times(1)
            .returning(|_, _| Ok(None));

        let mut calls = 0;
        mock_repo.expect_create().times(3).returning(move |new_link| {
            calls += 1;
            if calls < 3 {
                Err(collision())
            } else {
                Ok(test_link(&new_link.short_code, &new_link.original_url))
            }
        });

        let service = ShortenService::new(Arc::new(mock_repo), CodeGenerator::default());
        let link = service
            .shorten("https://example.com", vec![], None)
            .await
            .unwrap();

        assert_eq!(link.original_url, "https://example.com/");
    }

    #[tokio::test]
    async fn test_shorten_gives_up_after_max_attempts() {
        let mut mock_repo = MockLinkRepository::new();

        mock_repo
            .expect_find_reusable()
            .times(1)
            .returning(|_, _| Ok(None));
        mock_repo
            .expect_create()
            .times(ShortenService::MAX_CODE_ATTEMPTS)
            .returning(|_| Err(collision()));

        let service = ShortenService::new(Arc::new(mock_repo), CodeGenerator::default());
        let err = service
            .shorten("https://example.com", vec![], None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Internal { .. }));
        assert_eq!(err.to_error_info().details["reason"], "code_space_exhausted");
    }

    #[tokio::test]
    async fn test_shorten_store_failure_is_not_retried() {
        let mut mock_repo = MockLinkRepository::new();

        mock_repo
            .expect_find_reusable()
            .times(1)
            .returning(|_, _| Ok(None));
        mock_repo
            .expect_create()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let service = ShortenService::new(Arc::new(mock_repo), CodeGenerator::default());
        let err = service
            .shorten("https://example.com", vec![], None)
            .await
            .unwrap_err();

        let info = err.to_error_info();
        assert_eq!(info.code, "internal_error");
        assert_eq!(info.details["operation"], "shorten");
        assert_eq!(info.details["subject"], "https://example.com/");
    }

    #[tokio::test]
    async fn test_shorten_lookup_failure_propagates() {
        let mut mock_repo = MockLinkRepository::new();

        mock_repo
            .expect_find_reusable()
            .times(1)
            .returning(|_, _| Err(AppError::internal("Database error", json!({}))));
        mock_repo.expect_create().times(0);

        let service = ShortenService::new(Arc::new(mock_repo), CodeGenerator::default());
        let result = service.shorten("https://example.com", vec![], None).await;

        assert!(matches!(result.unwrap_err(), AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_shorten_uses_configured_code_length() {
        let repo = Arc::new(MemoryLinkRepository::new());
        let generator =
            CodeGenerator::new(crate::utils::code_generator::DEFAULT_ALPHABET, 12).unwrap();
        let service = ShortenService::new(repo, generator);

        let link = service
            .shorten("https://example.com", vec![], None)
            .await
            .unwrap();

        assert_eq!(link.short_code.len(), 12);
    }
}
