//! User database queries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{UserError, UserStore};
use crate::auth::queries::is_unique_violation;
use crate::models::user::{User, UserWithPassword};

type UserRow = (Uuid, DateTime<Utc>, DateTime<Utc>, String, bool);

const USER_COLUMNS: &str = "id, created_at, updated_at, email, is_chirpy_red";

fn into_user(row: UserRow) -> User {
    let (id, created_at, updated_at, email, is_chirpy_red) = row;
    User {
        id,
        created_at,
        updated_at,
        email,
        is_chirpy_red,
    }
}

fn map_write_error(email: &str, e: sqlx::Error) -> UserError {
    if is_unique_violation(&e) {
        UserError::DuplicateEmail(email.to_string())
    } else {
        UserError::from(e)
    }
}

/// PostgreSQL-backed [`UserStore`] over the `users` table.
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, email: &str, hashed_password: &str) -> Result<User, UserError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (email, hashed_password) VALUES ($1, $2) RETURNING {USER_COLUMNS}"
        ))
        .bind(email)
        .bind(hashed_password)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(email, e))?;
        Ok(into_user(row))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserWithPassword>, UserError> {
        let row = sqlx::query_as::<_, (Uuid, DateTime<Utc>, DateTime<Utc>, String, bool, String)>(
            &format!("SELECT {USER_COLUMNS}, hashed_password FROM users WHERE email = $1"),
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(
            |(id, created_at, updated_at, email, is_chirpy_red, hashed_password)| {
                UserWithPassword {
                    user: into_user((id, created_at, updated_at, email, is_chirpy_red)),
                    hashed_password,
                }
            },
        ))
    }

    async fn update_credentials(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<User, UserError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET email = $2, hashed_password = $3, updated_at = now() \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(email)
        .bind(hashed_password)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(email, e))?;
        row.map(into_user)
            .ok_or_else(|| UserError::NotFound(id.to_string()))
    }

    async fn upgrade_to_red(&self, id: Uuid) -> Result<(), UserError> {
        let result = sqlx::query(
            "UPDATE users SET is_chirpy_red = TRUE, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn drop_all(&self) -> Result<(), UserError> {
        sqlx::query("TRUNCATE TABLE users CASCADE")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
