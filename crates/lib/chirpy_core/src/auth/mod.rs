//! Authentication and authorization logic.
//!
//! Access tokens are stateless HS256 JWTs ([`jwt`]). Refresh tokens are
//! opaque random strings ([`refresh_token`]) persisted behind the
//! [`store::RefreshTokenStore`] trait. [`session::SessionManager`] ties the
//! two together; [`ownership`] guards per-user resources.

pub mod header;
pub mod jwt;
pub mod memory;
pub mod ownership;
pub mod password;
pub mod queries;
pub mod refresh_token;
pub mod session;
pub mod store;

use thiserror::Error;

/// Authentication errors.
///
/// `Expired` and `Revoked` refresh records are both reported as
/// [`AuthError::Unauthorized`]; only access tokens surface `Expired`.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    CredentialError,

    /// No `Authorization` header, or one without the expected scheme prefix.
    #[error("Missing or malformed authorization header")]
    MissingCredential,

    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token expired")]
    Expired,

    #[error("Invalid token subject: {0}")]
    InvalidSubject(String),

    #[error("Refresh token not found")]
    NotFound,

    #[error("Refresh token expired or revoked")]
    Unauthorized,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Refresh token already exists")]
    DuplicateKey,

    #[error("Entropy source unavailable: {0}")]
    Entropy(String),

    #[error("Token signing failed: {0}")]
    Signing(String),

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// True for failures that indicate a server-side fault rather than a
    /// rejected credential.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AuthError::DuplicateKey
                | AuthError::Entropy(_)
                | AuthError::Signing(_)
                | AuthError::DbError(_)
                | AuthError::Internal(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_errors_are_classified() {
        assert!(AuthError::DuplicateKey.is_internal());
        assert!(AuthError::Entropy("os".into()).is_internal());
        assert!(AuthError::Signing("hmac".into()).is_internal());
        assert!(!AuthError::Expired.is_internal());
        assert!(!AuthError::Unauthorized.is_internal());
        assert!(!AuthError::MissingCredential.is_internal());
    }
}
