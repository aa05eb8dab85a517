//! In-memory chirp store.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use super::{ChirpError, ChirpStore};
use crate::models::chirp::Chirp;
use crate::uuid::uuidv7;

/// Process-local [`ChirpStore`] keyed by chirp ID.
#[derive(Debug, Default)]
pub struct InMemoryChirpStore {
    chirps: DashMap<Uuid, Chirp>,
}

impl InMemoryChirpStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChirpStore for InMemoryChirpStore {
    async fn create(&self, user_id: Uuid, body: &str) -> Result<Chirp, ChirpError> {
        let now = Utc::now();
        let chirp = Chirp {
            id: uuidv7(),
            created_at: now,
            updated_at: now,
            body: body.to_string(),
            user_id,
        };
        self.chirps.insert(chirp.id, chirp.clone());
        Ok(chirp)
    }

    async fn list(&self) -> Result<Vec<Chirp>, ChirpError> {
        let mut chirps: Vec<Chirp> = self.chirps.iter().map(|c| c.value().clone()).collect();
        // Ties on created_at fall back to the time-ordered v7 id.
        chirps.sort_by_key(|c| (c.created_at, c.id));
        Ok(chirps)
    }

    async fn get(&self, id: Uuid) -> Result<Chirp, ChirpError> {
        self.chirps
            .get(&id)
            .map(|c| c.value().clone())
            .ok_or_else(|| ChirpError::NotFound(id.to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<(), ChirpError> {
        self.chirps
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| ChirpError::NotFound(id.to_string()))
    }

    async fn drop_all(&self) -> Result<(), ChirpError> {
        self.chirps.clear();
        Ok(())
    }
}
