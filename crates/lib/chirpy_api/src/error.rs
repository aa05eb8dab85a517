//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chirpy_core::auth::AuthError;
use chirpy_core::chirps::ChirpError;
use chirpy_core::users::UserError;
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, "validation_error", m.as_str()),
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, "not_found", m.as_str()),
            AppError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, "unauthorized", m.as_str()),
            AppError::Forbidden(m) => (StatusCode::FORBIDDEN, "forbidden", m.as_str()),
            AppError::Conflict(m) => (StatusCode::CONFLICT, "conflict", m.as_str()),
            AppError::Internal(detail) => {
                error!(%detail, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error",
                )
            }
        };
        let body = Json(ErrorResponse {
            error: error.to_string(),
            message: message.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => AppError::NotFound("row not found".into()),
            _ => AppError::Internal(e.to_string()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::CredentialError => {
                AppError::Unauthorized("Incorrect email or password".into())
            }
            AuthError::MissingCredential => {
                AppError::Unauthorized("Missing or malformed authorization header".into())
            }
            AuthError::Malformed(_)
            | AuthError::InvalidSignature
            | AuthError::Expired
            | AuthError::InvalidSubject(_) => AppError::Unauthorized("Invalid or expired token".into()),
            AuthError::NotFound => AppError::NotFound("Refresh token not found".into()),
            AuthError::Unauthorized => {
                AppError::Unauthorized("Refresh token expired or revoked".into())
            }
            AuthError::InvalidApiKey => AppError::Unauthorized("Invalid API key".into()),
            AuthError::Forbidden(msg) => AppError::Forbidden(msg),
            AuthError::DbError(e) => AppError::from(e),
            e @ (AuthError::DuplicateKey
            | AuthError::Entropy(_)
            | AuthError::Signing(_)
            | AuthError::Internal(_)) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<UserError> for AppError {
    fn from(e: UserError) -> Self {
        match e {
            UserError::NotFound(msg) => AppError::NotFound(msg),
            UserError::DuplicateEmail(email) => {
                AppError::Conflict(format!("Email '{email}' is already registered"))
            }
            UserError::Validation(msg) => AppError::Validation(msg),
            UserError::Auth(e) => AppError::from(e),
            UserError::DbError(e) => AppError::from(e),
        }
    }
}

impl From<ChirpError> for AppError {
    fn from(e: ChirpError) -> Self {
        match e {
            ChirpError::NotFound(msg) => AppError::NotFound(msg),
            ChirpError::Validation(msg) => AppError::Validation(msg),
            ChirpError::Forbidden(msg) => AppError::Forbidden(msg),
            ChirpError::DbError(e) => AppError::from(e),
        }
    }
}
