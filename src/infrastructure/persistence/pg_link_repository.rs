//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{FromRow, PgPool};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

const LINK_COLUMNS: &str = "id, short_code, original_url, is_active, expires_at, tags, \
     last_accessed_at, custom_alias, user_id, created_at, updated_at";

#[derive(FromRow)]
struct LinkRow {
    id: i64,
    short_code: String,
    original_url: String,
    is_active: bool,
    expires_at: Option<DateTime<Utc>>,
    tags: Vec<String>,
    last_accessed_at: Option<DateTime<Utc>>,
    custom_alias: Option<String>,
    user_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<LinkRow> for ShortLink {
    fn from(r: LinkRow) -> Self {
        ShortLink {
            id: r.id,
            short_code: r.short_code,
            original_url: r.original_url,
            is_active: r.is_active,
            expires_at: r.expires_at,
            tags: r.tags,
            last_accessed_at: r.last_accessed_at,
            custom_alias: r.custom_alias,
            user_id: r.user_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// PostgreSQL repository for short links.
///
/// Conditional updates are single statements, so each relies only on row-level atomicity.
/// Every statement is bounded by `query_timeout`; an elapsed timeout is reported as
/// [`AppError::Internal`].
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
    query_timeout: Duration,
}

impl PgLinkRepository {
    /// Default per-statement timeout.
    pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self::with_timeout(pool, Self::DEFAULT_QUERY_TIMEOUT)
    }

    /// Creates a new repository with a custom per-statement timeout.
    pub fn with_timeout(pool: Arc<PgPool>, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    async fn bounded<T, F>(&self, operation: &'static str, fut: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.query_timeout, fut).await {
            Ok(result) => result.map_err(AppError::from),
            Err(_) => {
                let timeout_ms = self.query_timeout.as_millis() as u64;
                tracing::error!(operation, timeout_ms, "Database operation timed out");
                Err(AppError::internal(
                    "Database operation timed out",
                    json!({ "operation": operation, "timeout_ms": timeout_ms }),
                ))
            }
        }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let sql = format!(
            r#"
            INSERT INTO short_links (short_code, original_url, expires_at, tags)
            VALUES ($1, $2, $3, $4)
            RETURNING {LINK_COLUMNS}
            "#
        );

        let row = self
            .bounded(
                "create",
                sqlx::query_as::<_, LinkRow>(&sql)
                    .bind(&new_link.short_code)
                    .bind(&new_link.original_url)
                    .bind(new_link.expires_at)
                    .bind(&new_link.tags)
                    .fetch_one(self.pool.as_ref()),
            )
            .await?;

        Ok(row.into())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM short_links WHERE short_code = $1");

        let row = self
            .bounded(
                "find_by_code",
                sqlx::query_as::<_, LinkRow>(&sql)
                    .bind(code)
                    .fetch_optional(self.pool.as_ref()),
            )
            .await?;

        Ok(row.map(Into::into))
    }

    async fn find_reusable(
        &self,
        original_url: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<ShortLink>, AppError> {
        let sql = format!(
            r#"
            SELECT {LINK_COLUMNS}
            FROM short_links
            WHERE original_url = $1
              AND is_active
              AND (expires_at IS NULL OR expires_at > $2)
            ORDER BY created_at, id
            LIMIT 1
            "#
        );

        let row = self
            .bounded(
                "find_reusable",
                sqlx::query_as::<_, LinkRow>(&sql)
                    .bind(original_url)
                    .bind(now)
                    .fetch_optional(self.pool.as_ref()),
            )
            .await?;

        Ok(row.map(Into::into))
    }

    async fn touch(&self, code: &str, now: DateTime<Utc>) -> Result<Option<ShortLink>, AppError> {
        // GREATEST ignores NULLs, so a first access is just max(now, created_at).
        let sql = format!(
            r#"
            UPDATE short_links
            SET last_accessed_at = GREATEST($2, created_at, last_accessed_at),
                updated_at = NOW()
            WHERE short_code = $1
              AND is_active
              AND (expires_at IS NULL OR expires_at > $2)
            RETURNING {LINK_COLUMNS}
            "#
        );

        let row = self
            .bounded(
                "touch",
                sqlx::query_as::<_, LinkRow>(&sql)
                    .bind(code)
                    .bind(now)
                    .fetch_optional(self.pool.as_ref()),
            )
            .await?;

        Ok(row.map(Into::into))
    }

    async fn deactivate(&self, code: &str) -> Result<bool, AppError> {
        let result = self
            .bounded(
                "deactivate",
                sqlx::query(
                    r#"
                    UPDATE short_links
                    SET is_active = FALSE, updated_at = NOW()
                    WHERE short_code = $1 AND is_active
                    "#,
                )
                .bind(code)
                .execute(self.pool.as_ref()),
            )
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn deactivate_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let result = self
            .bounded(
                "deactivate_expired",
                sqlx::query(
                    r#"
                    UPDATE short_links
                    SET is_active = FALSE, updated_at = NOW()
                    WHERE is_active AND expires_at <= $1
                    "#,
                )
                .bind(now)
                .execute(self.pool.as_ref()),
            )
            .await?;

        Ok(result.rows_affected())
    }

    async fn find_active_by_tags(&self, tags: &[String]) -> Result<Vec<ShortLink>, AppError> {
        let sql = format!(
            r#"
            SELECT {LINK_COLUMNS}
            FROM short_links
            WHERE is_active AND tags && $1
            ORDER BY created_at DESC, id DESC
            "#
        );

        let rows = self
            .bounded(
                "find_active_by_tags",
                sqlx::query_as::<_, LinkRow>(&sql)
                    .bind(tags)
                    .fetch_all(self.pool.as_ref()),
            )
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.bounded(
            "ping",
            sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(self.pool.as_ref()),
        )
        .await?;

        Ok(())
    }
}
