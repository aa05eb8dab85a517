//! In-memory refresh token store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use super::AuthError;
use super::store::RefreshTokenStore;
use crate::models::auth::RefreshTokenRecord;

/// Process-local [`RefreshTokenStore`] for tests and database-less runs.
#[derive(Debug, Default)]
pub struct InMemoryRefreshTokenStore {
    records: DashMap<String, RefreshTokenRecord>,
}

impl InMemoryRefreshTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl RefreshTokenStore for InMemoryRefreshTokenStore {
    async fn insert(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshTokenRecord, AuthError> {
        match self.records.entry(token.to_string()) {
            Entry::Occupied(_) => Err(AuthError::DuplicateKey),
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let record = RefreshTokenRecord {
                    token: token.to_string(),
                    user_id,
                    created_at: now,
                    updated_at: now,
                    expires_at,
                    revoked_at: None,
                };
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }

    async fn find_by_token(&self, token: &str) -> Result<RefreshTokenRecord, AuthError> {
        self.records
            .get(token)
            .map(|r| r.value().clone())
            .ok_or(AuthError::NotFound)
    }

    async fn revoke(&self, token: &str) -> Result<(), AuthError> {
        let mut record = self.records.get_mut(token).ok_or(AuthError::NotFound)?;
        let now = Utc::now();
        record.revoked_at.get_or_insert(now);
        record.updated_at = now;
        Ok(())
    }

    async fn drop_all(&self) -> Result<(), AuthError> {
        self.records.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn expiry() -> DateTime<Utc> {
        Utc::now() + Duration::days(60)
    }

    #[tokio::test]
    async fn insert_then_find() {
        let store = InMemoryRefreshTokenStore::new();
        let user = Uuid::new_v4();
        let inserted = store.insert("tok", user, expiry()).await.expect("insert");
        assert_eq!(inserted.user_id, user);
        assert!(inserted.revoked_at.is_none());

        let found = store.find_by_token("tok").await.expect("find");
        assert_eq!(found, inserted);
    }

    #[tokio::test]
    async fn duplicate_insert_is_rejected() {
        let store = InMemoryRefreshTokenStore::new();
        store.insert("tok", Uuid::new_v4(), expiry()).await.expect("insert");
        assert!(matches!(
            store.insert("tok", Uuid::new_v4(), expiry()).await,
            Err(AuthError::DuplicateKey)
        ));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn missing_token_is_not_found() {
        let store = InMemoryRefreshTokenStore::new();
        assert!(matches!(
            store.find_by_token("nope").await,
            Err(AuthError::NotFound)
        ));
        assert!(matches!(store.revoke("nope").await, Err(AuthError::NotFound)));
    }

    #[tokio::test]
    async fn revoke_is_idempotent_and_keeps_first_instant() {
        let store = InMemoryRefreshTokenStore::new();
        store.insert("tok", Uuid::new_v4(), expiry()).await.expect("insert");

        store.revoke("tok").await.expect("first revoke");
        let first = store.find_by_token("tok").await.expect("find").revoked_at;
        assert!(first.is_some());

        store.revoke("tok").await.expect("second revoke");
        let second = store.find_by_token("tok").await.expect("find").revoked_at;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn drop_all_clears_everything() {
        let store = InMemoryRefreshTokenStore::new();
        store.insert("a", Uuid::new_v4(), expiry()).await.expect("insert");
        store.insert("b", Uuid::new_v4(), expiry()).await.expect("insert");
        store.drop_all().await.expect("drop");
        assert!(store.is_empty());
    }
}
