// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Global Application Error Enum.
/// Every failure a request can hit ends up here and is rendered at the boundary,
/// never terminating the process.
#[derive(Debug)]
pub enum AppError {
    // 400 Bad Request (empty required field, malformed submission)
    ValidationError(String),

    // 409 Conflict (username already registered)
    DuplicateAccount(String),

    // 401 Unauthorized (bad credentials or no session on a gated route)
    AuthError(String),

    // 404 Not Found (session references an account that no longer exists)
    AccountNotFound(String),

    // 409 Conflict (operation attempted against a passed account)
    StateViolation(String),

    // 503 Service Unavailable (durable store cannot be opened or written)
    StorageUnavailable(String),

    // 500 Internal Server Error
    InternalServerError(String),
}

impl AppError {
    /// Entry point the client should be sent to after this error.
    pub fn redirect_hint(&self) -> Option<&'static str> {
        match self {
            AppError::AuthError(_) => Some("/login"),
            AppError::AccountNotFound(_) => Some("/register"),
            AppError::StateViolation(_) => Some("/"),
            _ => None,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(msg) => write!(f, "validation error: {}", msg),
            AppError::DuplicateAccount(msg) => write!(f, "duplicate account: {}", msg),
            AppError::AuthError(msg) => write!(f, "authentication error: {}", msg),
            AppError::AccountNotFound(msg) => write!(f, "account not found: {}", msg),
            AppError::StateViolation(msg) => write!(f, "state violation: {}", msg),
            AppError::StorageUnavailable(msg) => write!(f, "storage unavailable: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response carrying the user-visible message
/// and, where one applies, the entry point to redirect to.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let redirect = self.redirect_hint();
        let (status, error_message) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::StorageUnavailable(msg) => {
                tracing::error!("Storage unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Storage unavailable".to_string(),
                )
            }
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::DuplicateAccount(msg) => (StatusCode::CONFLICT, msg),
            AppError::AuthError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::AccountNotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::StateViolation(msg) => (StatusCode::CONFLICT, msg),
        };
        let body = Json(json!({
            "error": error_message,
            "redirect": redirect,
        }));

        (status, body).into_response()
    }
}

/// Converts `sqlx::Error` into `AppError::InternalServerError`.
/// Allows using `?` operator on database queries.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::StorageUnavailable(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}
