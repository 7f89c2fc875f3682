//! Validation of original URLs submitted for shortening.
//!
//! URLs are stored in the `url` crate's serialized form: percent-encoded, with the
//! scheme and host lowercased. That form is always a valid `Location` header value,
//! and equivalent spellings of one URL find the same link.

use url::Url;

/// Errors that can occur during URL validation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("Original URL is required")]
    Missing,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,
}

/// Checks that `input` is a well-formed absolute HTTP(S) URL and returns its serialized form.
///
/// # Errors
///
/// - [`UrlValidationError::Missing`] for empty or whitespace-only input
/// - [`UrlValidationError::InvalidFormat`] for unparsable input
/// - [`UrlValidationError::UnsupportedProtocol`] for non-HTTP(S) schemes
///   (`javascript:`, `data:`, `file:`, ...)
/// - [`UrlValidationError::MissingHost`] when the authority is empty
pub fn validate_original_url(input: &str) -> Result<String, UrlValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlValidationError::Missing);
    }

    let url = Url::parse(trimmed).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(url.to_string())
}
