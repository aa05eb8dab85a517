//! Chirp database queries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{ChirpError, ChirpStore};
use crate::models::chirp::Chirp;
use crate::uuid::uuidv7;

type ChirpRow = (Uuid, DateTime<Utc>, DateTime<Utc>, String, Uuid);

fn into_chirp(row: ChirpRow) -> Chirp {
    let (id, created_at, updated_at, body, user_id) = row;
    Chirp {
        id,
        created_at,
        updated_at,
        body,
        user_id,
    }
}

/// PostgreSQL-backed [`ChirpStore`] over the `chirps` table.
#[derive(Debug, Clone)]
pub struct PgChirpStore {
    pool: PgPool,
}

impl PgChirpStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChirpStore for PgChirpStore {
    async fn create(&self, user_id: Uuid, body: &str) -> Result<Chirp, ChirpError> {
        let row = sqlx::query_as::<_, ChirpRow>(
            "INSERT INTO chirps (id, body, user_id) VALUES ($1, $2, $3) \
             RETURNING id, created_at, updated_at, body, user_id",
        )
        .bind(uuidv7())
        .bind(body)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(into_chirp(row))
    }

    async fn list(&self) -> Result<Vec<Chirp>, ChirpError> {
        let rows = sqlx::query_as::<_, ChirpRow>(
            "SELECT id, created_at, updated_at, body, user_id FROM chirps \
             ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(into_chirp).collect())
    }

    async fn get(&self, id: Uuid) -> Result<Chirp, ChirpError> {
        let row = sqlx::query_as::<_, ChirpRow>(
            "SELECT id, created_at, updated_at, body, user_id FROM chirps WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(into_chirp)
            .ok_or_else(|| ChirpError::NotFound(id.to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<(), ChirpError> {
        let result = sqlx::query("DELETE FROM chirps WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ChirpError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn drop_all(&self) -> Result<(), ChirpError> {
        sqlx::query("TRUNCATE TABLE chirps")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
