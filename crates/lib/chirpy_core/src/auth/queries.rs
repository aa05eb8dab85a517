//! Refresh token database queries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::AuthError;
use super::store::RefreshTokenStore;
use crate::models::auth::RefreshTokenRecord;

type RefreshTokenRow = (
    String,
    Uuid,
    DateTime<Utc>,
    DateTime<Utc>,
    DateTime<Utc>,
    Option<DateTime<Utc>>,
);

fn into_record(row: RefreshTokenRow) -> RefreshTokenRecord {
    let (token, user_id, created_at, updated_at, expires_at, revoked_at) = row;
    RefreshTokenRecord {
        token,
        user_id,
        created_at,
        updated_at,
        expires_at,
        revoked_at,
    }
}

/// PostgreSQL-backed [`RefreshTokenStore`] over the `refresh_tokens` table.
#[derive(Debug, Clone)]
pub struct PgRefreshTokenStore {
    pool: PgPool,
}

impl PgRefreshTokenStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RefreshTokenStore for PgRefreshTokenStore {
    async fn insert(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshTokenRecord, AuthError> {
        let row = sqlx::query_as::<_, RefreshTokenRow>(
            "INSERT INTO refresh_tokens (token, created_at, updated_at, user_id, expires_at, revoked_at) \
             VALUES ($1, now(), now(), $2, $3, NULL) \
             RETURNING token, user_id, created_at, updated_at, expires_at, revoked_at",
        )
        .bind(token)
        .bind(user_id)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AuthError::DuplicateKey
            } else {
                AuthError::from(e)
            }
        })?;
        Ok(into_record(row))
    }

    async fn find_by_token(&self, token: &str) -> Result<RefreshTokenRecord, AuthError> {
        let row = sqlx::query_as::<_, RefreshTokenRow>(
            "SELECT token, user_id, created_at, updated_at, expires_at, revoked_at \
             FROM refresh_tokens WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        row.map(into_record).ok_or(AuthError::NotFound)
    }

    async fn revoke(&self, token: &str) -> Result<(), AuthError> {
        let result = sqlx::query(
            "UPDATE refresh_tokens \
             SET revoked_at = COALESCE(revoked_at, now()), updated_at = now() \
             WHERE token = $1",
        )
        .bind(token)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AuthError::NotFound);
        }
        Ok(())
    }

    async fn drop_all(&self) -> Result<(), AuthError> {
        sqlx::query("TRUNCATE TABLE refresh_tokens")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// Check if an error is a unique constraint violation.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        return db_err.is_unique_violation();
    }
    false
}
