//! Chirps: short text posts owned by a user.

pub mod memory;
pub mod queries;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthError;
use crate::auth::ownership::authorize_owner;
use crate::models::chirp::Chirp;

/// Maximum chirp length in characters.
pub const MAX_CHIRP_LENGTH: usize = 140;

/// Chirp errors.
#[derive(Debug, Error)]
pub enum ChirpError {
    #[error("Chirp not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),
}

/// Storage backend for chirps.
#[async_trait]
pub trait ChirpStore: Send + Sync {
    async fn create(&self, user_id: Uuid, body: &str) -> Result<Chirp, ChirpError>;

    /// All chirps, oldest first.
    async fn list(&self) -> Result<Vec<Chirp>, ChirpError>;

    /// [`ChirpError::NotFound`] if absent.
    async fn get(&self, id: Uuid) -> Result<Chirp, ChirpError>;

    /// [`ChirpError::NotFound`] if absent.
    async fn delete(&self, id: Uuid) -> Result<(), ChirpError>;

    async fn drop_all(&self) -> Result<(), ChirpError>;
}

/// Reject empty bodies and bodies over [`MAX_CHIRP_LENGTH`] characters.
pub fn validate_body(body: &str) -> Result<(), ChirpError> {
    if body.trim().is_empty() {
        return Err(ChirpError::Validation("Chirp is empty".into()));
    }
    if body.chars().count() > MAX_CHIRP_LENGTH {
        return Err(ChirpError::Validation("Chirp is too long".into()));
    }
    Ok(())
}

/// Validate and store a chirp owned by `user_id`.
pub async fn post(store: &dyn ChirpStore, user_id: Uuid, body: &str) -> Result<Chirp, ChirpError> {
    validate_body(body)?;
    store.create(user_id, body).await
}

/// Delete a chirp on behalf of an authenticated caller who must own it.
pub async fn delete_owned(
    store: &dyn ChirpStore,
    caller: Uuid,
    chirp_id: Uuid,
) -> Result<(), ChirpError> {
    let chirp = store.get(chirp_id).await?;
    authorize_owner(caller, &chirp).map_err(|e| match e {
        AuthError::Forbidden(msg) => ChirpError::Forbidden(msg),
        other => ChirpError::Forbidden(other.to_string()),
    })?;
    store.delete(chirp.id).await?;
    info!(%chirp_id, user_id = %caller, "chirp deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::memory::InMemoryChirpStore;
    use super::*;

    #[test]
    fn length_limit_is_inclusive() {
        assert!(validate_body(&"a".repeat(MAX_CHIRP_LENGTH)).is_ok());
        assert!(matches!(
            validate_body(&"a".repeat(MAX_CHIRP_LENGTH + 1)),
            Err(ChirpError::Validation(_))
        ));
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        assert!(validate_body(&"é".repeat(MAX_CHIRP_LENGTH)).is_ok());
    }

    #[test]
    fn empty_body_is_rejected() {
        assert!(matches!(validate_body("   "), Err(ChirpError::Validation(_))));
    }

    #[tokio::test]
    async fn only_the_owner_can_delete() {
        let store = InMemoryChirpStore::new();
        let u1 = Uuid::new_v4();
        let u2 = Uuid::new_v4();
        let chirp = post(&store, u1, "mine").await.expect("post");

        assert!(matches!(
            delete_owned(&store, u2, chirp.id).await,
            Err(ChirpError::Forbidden(_))
        ));
        assert_eq!(store.get(chirp.id).await.expect("still there"), chirp);

        delete_owned(&store, u1, chirp.id).await.expect("owner delete");
        assert!(matches!(store.get(chirp.id).await, Err(ChirpError::NotFound(_))));
    }

    #[tokio::test]
    async fn deleting_missing_chirp_is_not_found() {
        let store = InMemoryChirpStore::new();
        assert!(matches!(
            delete_owned(&store, Uuid::new_v4(), Uuid::new_v4()).await,
            Err(ChirpError::NotFound(_))
        ));
    }
}
