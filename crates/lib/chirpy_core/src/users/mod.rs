//! User accounts.
//!
//! Persistence sits behind [`UserStore`]; passwords are hashed with
//! [`crate::auth::password`] before they reach a store.

pub mod memory;
pub mod queries;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::AuthError;
use crate::auth::password::hash_password;
use crate::models::user::{User, UserWithPassword};

/// User management errors.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),
}

/// Storage backend for users.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create a user; [`UserError::DuplicateEmail`] if the email is taken.
    async fn create(&self, email: &str, hashed_password: &str) -> Result<User, UserError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserWithPassword>, UserError>;

    /// Replace email and password hash of an existing user.
    async fn update_credentials(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<User, UserError>;

    /// Set the Chirpy Red membership flag.
    async fn upgrade_to_red(&self, id: Uuid) -> Result<(), UserError>;

    async fn drop_all(&self) -> Result<(), UserError>;
}

fn validate_credentials(email: &str, password: &str) -> Result<(), UserError> {
    if email.trim().is_empty() {
        return Err(UserError::Validation("email is required".into()));
    }
    if password.is_empty() {
        return Err(UserError::Validation("password is required".into()));
    }
    Ok(())
}

/// Register a new account with a bcrypt-hashed password.
pub async fn register(store: &dyn UserStore, email: &str, password: &str) -> Result<User, UserError> {
    validate_credentials(email, password)?;
    let hashed = hash_password(password)?;
    store.create(email, &hashed).await
}

/// Change the email and password of `user_id`.
pub async fn update_credentials(
    store: &dyn UserStore,
    user_id: Uuid,
    email: &str,
    password: &str,
) -> Result<User, UserError> {
    validate_credentials(email, password)?;
    let hashed = hash_password(password)?;
    store.update_credentials(user_id, email, &hashed).await
}

#[cfg(test)]
mod tests {
    use super::memory::InMemoryUserStore;
    use super::*;
    use crate::auth::password::verify_password;

    #[tokio::test]
    async fn register_stores_a_hash_not_the_password() {
        let store = InMemoryUserStore::new();
        let user = register(&store, "walt@breakingbad.com", "123456").await.expect("register");
        assert!(!user.is_chirpy_red);

        let stored = store
            .find_by_email("walt@breakingbad.com")
            .await
            .expect("find")
            .expect("present");
        assert_eq!(stored.user, user);
        assert_ne!(stored.hashed_password, "123456");
        assert!(verify_password("123456", &stored.hashed_password).unwrap());
    }

    #[tokio::test]
    async fn blank_fields_are_rejected() {
        let store = InMemoryUserStore::new();
        assert!(matches!(register(&store, " ", "pw").await, Err(UserError::Validation(_))));
        assert!(matches!(register(&store, "a@b.c", "").await, Err(UserError::Validation(_))));
    }

    #[tokio::test]
    async fn update_replaces_email_and_password() {
        let store = InMemoryUserStore::new();
        let user = register(&store, "old@example.com", "old").await.expect("register");

        let updated = update_credentials(&store, user.id, "new@example.com", "new")
            .await
            .expect("update");
        assert_eq!(updated.id, user.id);
        assert_eq!(updated.email, "new@example.com");
        assert!(updated.updated_at >= user.updated_at);

        assert!(store.find_by_email("old@example.com").await.unwrap().is_none());
        let stored = store.find_by_email("new@example.com").await.unwrap().unwrap();
        assert!(verify_password("new", &stored.hashed_password).unwrap());
    }
}
