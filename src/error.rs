//! Application error type and its HTTP representation.
//!
//! Every layer returns [`AppError`]. Handlers convert it into a JSON body of the form:
//!
//! ```json
//! { "error": { "code": "not_found", "message": "Short link not found", "details": { ... } } }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

/// Name of the unique constraint guarding `short_links.short_code`.
pub const SHORT_CODE_CONSTRAINT: &str = "short_links_short_code_key";

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Why a short code did not resolve.
///
/// All three map to `404 Not Found`; the reason is kept in the error details and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundReason {
    Missing,
    Inactive,
    Expired,
}

impl NotFoundReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Inactive => "inactive",
            Self::Expired => "expired",
        }
    }

    fn message(&self) -> &'static str {
        match self {
            Self::Missing => "Short link not found",
            Self::Inactive => "Short link is not active",
            Self::Expired => "Short link has expired",
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, details: Value },
    #[error("{message}")]
    NotFound { message: String, details: Value },
    #[error("{message}")]
    Conflict { message: String, details: Value },
    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Builds a `NotFound` error for a short code, recording why it did not resolve.
    pub fn link_not_found(code: &str, reason: NotFoundReason) -> Self {
        Self::not_found(
            reason.message(),
            json!({ "code": code, "reason": reason.as_str() }),
        )
    }

    /// Returns the not-found reason carried in the details, if any.
    pub fn not_found_reason(&self) -> Option<NotFoundReason> {
        let Self::NotFound { details, .. } = self else {
            return None;
        };

        match details.get("reason").and_then(Value::as_str) {
            Some("missing") => Some(NotFoundReason::Missing),
            Some("inactive") => Some(NotFoundReason::Inactive),
            Some("expired") => Some(NotFoundReason::Expired),
            _ => None,
        }
    }

    /// True when the error is a unique violation on the short-code constraint.
    pub fn is_code_collision(&self) -> bool {
        match self {
            Self::Conflict { details, .. } => {
                details.get("constraint").and_then(Value::as_str) == Some(SHORT_CODE_CONSTRAINT)
            }
            _ => false,
        }
    }

    /// Adds operation context to a store failure before it leaves a service.
    ///
    /// Client-facing errors (`Validation`, `NotFound`) pass through untouched.
    pub fn context(self, operation: &'static str, subject: &str) -> Self {
        match self {
            Self::Internal {
                message,
                mut details,
            } => {
                if let Value::Object(map) = &mut details {
                    map.insert("operation".into(), json!(operation));
                    map.insert("subject".into(), json!(subject));
                }
                Self::Internal { message, details }
            }
            Self::Conflict {
                message,
                mut details,
            } => {
                if let Value::Object(map) = &mut details {
                    map.insert("operation".into(), json!(operation));
                    map.insert("subject".into(), json!(subject));
                }
                Self::Conflict { message, details }
            }
            other => other,
        }
    }

    fn parts(&self) -> (StatusCode, &'static str, &str, &Value) {
        match self {
            Self::Validation { message, details } => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                message,
                details,
            ),
            Self::NotFound { message, details } => {
                (StatusCode::NOT_FOUND, "not_found", message, details)
            }
            Self::Conflict { message, details } => {
                (StatusCode::CONFLICT, "conflict", message, details)
            }
            Self::Internal { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                message,
                details,
            ),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.parts().0
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        let (_, code, message, details) = self.parts();
        ErrorInfo {
            code,
            message: message.to_string(),
            details: details.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": db.constraint() }),
            );
        }

        tracing::error!(error = %e, "Database error");
        AppError::internal("Database error", json!({ "reason": e.to_string() }))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::bad_request("Validation failed", json!(errors))
    }
}
