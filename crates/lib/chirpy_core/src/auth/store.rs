//! Refresh token persistence interface.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::AuthError;
use crate::models::auth::RefreshTokenRecord;

/// Storage backend for refresh token records.
///
/// Every operation is a single atomic statement keyed by the token string.
/// Implementations:
/// - [`super::queries::PgRefreshTokenStore`]: PostgreSQL
/// - [`super::memory::InMemoryRefreshTokenStore`]: process-local
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Insert a new active record.
    ///
    /// Fails with [`AuthError::DuplicateKey`] if the token string exists.
    async fn insert(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshTokenRecord, AuthError>;

    /// Point lookup by token string. [`AuthError::NotFound`] if absent.
    async fn find_by_token(&self, token: &str) -> Result<RefreshTokenRecord, AuthError>;

    /// Mark the record revoked.
    ///
    /// Idempotent: revoking twice succeeds and keeps the first revocation
    /// instant. [`AuthError::NotFound`] if absent.
    async fn revoke(&self, token: &str) -> Result<(), AuthError>;

    /// Delete every record. Only reachable through the platform-gated reset.
    async fn drop_all(&self) -> Result<(), AuthError>;
}
