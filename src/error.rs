//! Custom error types and handling
//!
//! This module defines the application's error type, its classification
//! into fatal startup failures and recoverable outcomes, and its conversion
//! to HTTP responses for the Axum framework.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::db::dsn::ConfigParseError;
use crate::models::GraphError;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Startup / context resolution errors
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] ConfigParseError),

    #[error("Invalid contest identifier: {0:?} (expected a base-10 integer or \"ALL\")")]
    InvalidIdentifier(String),

    #[error("Contest {0} not found")]
    ContestNotFound(i64),

    #[error("Database unavailable: {0}")]
    DatabaseUnavailable(String),

    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    // Resource errors
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    // Database errors
    #[error("Database error: {0}")]
    Database(String),

    // Internal errors
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

/// Error details in response
#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

impl AppError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigParse(_) => "CONFIG_PARSE_ERROR",
            Self::InvalidIdentifier(_) => "INVALID_IDENTIFIER",
            Self::ContestNotFound(_) => "CONTEST_NOT_FOUND",
            Self::DatabaseUnavailable(_) => "DATABASE_UNAVAILABLE",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::AlreadyExists(_) => "ALREADY_EXISTS",
            Self::InvalidReference(_) => "INVALID_REFERENCE",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidIdentifier(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::ContestNotFound(_) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::AlreadyExists(_) => StatusCode::CONFLICT,
            Self::InvalidReference(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::DatabaseUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::ConfigParse(_) | Self::Database(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Whether this error must abort startup.
    ///
    /// A missing contest is a business outcome the operator may choose to
    /// tolerate; everything that prevents establishing the context is not.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ConfigParse(_)
                | Self::InvalidIdentifier(_)
                | Self::DatabaseUnavailable(_)
                | Self::Database(_)
                | Self::Internal(_)
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Log internal errors but don't expose details to clients
        let message = match &self {
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                "An internal error occurred".to_string()
            }
            AppError::Database(e) | AppError::DatabaseUnavailable(e) => {
                tracing::error!("Database error: {}", e);
                "A database error occurred".to_string()
            }
            AppError::ConfigParse(e) => {
                tracing::error!("Configuration error: {}", e);
                "A configuration error occurred".to_string()
            }
            _ => self.to_string(),
        };

        let body = ErrorResponse {
            error: ErrorDetails {
                code: self.error_code().to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation() {
                    AppError::AlreadyExists(db_err.message().to_string())
                } else if db_err.is_foreign_key_violation() {
                    AppError::InvalidReference(db_err.message().to_string())
                } else if db_err.is_check_violation() {
                    AppError::Validation(db_err.message().to_string())
                } else {
                    AppError::Database(db_err.to_string())
                }
            }
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => AppError::DatabaseUnavailable(err.to_string()),
            _ => AppError::Database(err.to_string()),
        }
    }
}

impl From<GraphError> for AppError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::Duplicate { .. } => AppError::AlreadyExists(err.to_string()),
            GraphError::MissingReference { .. } | GraphError::CrossContest { .. } => {
                AppError::InvalidReference(err.to_string())
            }
            GraphError::Invalid(_) => AppError::Validation(err.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::dsn::UriError;

    #[test]
    fn test_fatal_classification() {
        assert!(AppError::InvalidIdentifier("abc".into()).is_fatal());
        assert!(AppError::DatabaseUnavailable("down".into()).is_fatal());
        assert!(AppError::ConfigParse(ConfigParseError::MissingDatabaseField).is_fatal());
        assert!(AppError::Database("no column found".into()).is_fatal());
        assert!(!AppError::ContestNotFound(42).is_fatal());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::ContestNotFound(1).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::InvalidIdentifier("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(ConfigParseError::MalformedUri(UriError::MissingDatabaseSeparator))
                .error_code(),
            "CONFIG_PARSE_ERROR"
        );
    }

    #[test]
    fn test_pool_timeout_is_unavailable() {
        let err = AppError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, AppError::DatabaseUnavailable(_)));
    }
}
