//! Parsing of user-supplied expiration dates.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Errors that can occur while parsing an expiration date.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid expiration date '{0}': expected an ISO-8601 date or date-time")]
pub struct ExpiryParseError(pub String);

/// Parses an ISO-8601 expiration string into a UTC timestamp.
///
/// # Accepted Forms
///
/// - RFC 3339 with offset: `2026-12-31T23:59:59+02:00`, `2026-12-31T23:59:59.5Z`
/// - Date-time without offset, read as UTC: `2026-12-31T23:59:59`
/// - Bare date, read as midnight UTC: `2026-12-31`
///
/// Past dates are accepted; such a link is created already expired.
pub fn parse_expires_at(input: &str) -> Result<DateTime<Utc>, ExpiryParseError> {
    let trimmed = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        && let Some(midnight) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(midnight.and_utc());
    }

    Err(ExpiryParseError(trimmed.to_string()))
}
