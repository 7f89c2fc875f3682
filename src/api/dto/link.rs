//! DTOs for link endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::formats::CommaSeparator;
use serde_with::{StringWithSeparator, serde_as};
use validator::{Validate, ValidationError};

use crate::domain::entities::ShortLink;

/// Upper bound on the length of a submitted URL.
pub const MAX_URL_LENGTH: u64 = 2048;
/// Upper bound on tags attached to one link.
pub const MAX_TAGS: u64 = 32;
/// Upper bound on the length of a single tag.
pub const MAX_TAG_LENGTH: usize = 64;

/// Request body for `POST /api/links`.
///
/// `originalUrl` is optional at the serde level so a missing value is reported
/// through the regular validation error instead of a body rejection. Unknown
/// fields are rejected.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateLinkRequest {
    #[serde(default)]
    #[validate(length(max = MAX_URL_LENGTH, message = "URL is too long"))]
    pub original_url: Option<String>,

    #[serde(default)]
    #[validate(
        length(max = MAX_TAGS, message = "Too many tags"),
        custom(function = "validate_tags")
    )]
    pub tags: Vec<String>,

    /// ISO-8601 date or date-time; absent or `null` means the link never expires.
    #[serde(default)]
    pub expires_at: Option<String>,
}

fn validate_tags(tags: &[String]) -> Result<(), ValidationError> {
    if tags
        .iter()
        .any(|t| t.trim().is_empty() || t.chars().count() > MAX_TAG_LENGTH)
    {
        let mut err = ValidationError::new("tag_format");
        err.message =
            Some(format!("Tags must be non-empty and at most {MAX_TAG_LENGTH} characters").into());
        err.add_param("max".into(), &MAX_TAG_LENGTH);
        return Err(err);
    }
    Ok(())
}

/// Projection of a link returned by every link endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    pub short_code: String,
    pub original_url: String,
    pub short_url: String,
    pub tags: Vec<String>,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_accessed_at: Option<DateTime<Utc>>,
}

impl LinkResponse {
    /// Builds the projection; `short_url` comes from the link service.
    pub fn new(link: ShortLink, short_url: String) -> Self {
        Self {
            short_code: link.short_code,
            original_url: link.original_url,
            short_url,
            tags: link.tags,
            is_active: link.is_active,
            last_accessed_at: link.last_accessed_at,
        }
    }
}

/// Query parameters for `GET /api/links?tags=a,b`.
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct TagQuery {
    #[serde_as(as = "Option<StringWithSeparator::<CommaSeparator, String>>")]
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl TagQuery {
    /// Requested tags, trimmed, with empty entries dropped.
    pub fn normalized(self) -> Vec<String> {
        self.tags
            .unwrap_or_default()
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// Response body for `POST /api/links/cleanup/expired`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupResponse {
    pub deactivated_count: u64,
}
