//! Error types for agora.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // === Client Errors ===
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("This forum is locked")]
    ForumLocked,

    #[error("This topic is locked")]
    TopicLocked,

    #[error("You are not the author of this post")]
    NotOwner,

    #[error("The first post of a topic cannot be deleted; delete the topic instead")]
    CannotDeleteFirstPost,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    // === Server Errors ===
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            // 4xx Client Errors
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ConstraintViolation(_) => StatusCode::CONFLICT,
            Self::ForumLocked | Self::TopicLocked | Self::NotOwner | Self::CannotDeleteFirstPost => {
                StatusCode::FORBIDDEN
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,

            // 5xx Server Errors
            Self::Database(_) | Self::Config(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::ConstraintViolation(_) => "CONSTRAINT_VIOLATION",
            Self::ForumLocked => "FORUM_LOCKED",
            Self::TopicLocked => "TOPIC_LOCKED",
            Self::NotOwner => "NOT_OWNER",
            Self::CannotDeleteFirstPost => "CANNOT_DELETE_FIRST_POST",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns whether this error should be logged at error level.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        // Log server errors
        if self.is_server_error() {
            tracing::error!(error = %self, code = code, "Server error occurred");
        } else {
            tracing::debug!(error = %self, code = code, "Client error occurred");
        }

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

// === From implementations ===

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_status_codes() {
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::ConstraintViolation("dup".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(AppError::ForumLocked.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::TopicLocked.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::NotOwner.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::CannotDeleteFirstPost.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::Unauthorized.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(AppError::ForumLocked.error_code(), "FORUM_LOCKED");
        assert_eq!(AppError::TopicLocked.error_code(), "TOPIC_LOCKED");
        assert_eq!(AppError::NotOwner.error_code(), "NOT_OWNER");
        assert_eq!(
            AppError::CannotDeleteFirstPost.error_code(),
            "CANNOT_DELETE_FIRST_POST"
        );
    }

    #[test]
    fn test_server_error_detection() {
        assert!(AppError::Database("boom".into()).is_server_error());
        assert!(!AppError::NotFound("x".into()).is_server_error());
    }
}
