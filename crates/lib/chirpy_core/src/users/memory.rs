//! In-memory user store.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use super::{UserError, UserStore};
use crate::models::user::{User, UserWithPassword};

/// Process-local [`UserStore`] keyed by user ID.
///
/// Emails are claimed through a separate index so uniqueness holds under
/// concurrent writers.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: DashMap<Uuid, UserWithPassword>,
    emails: DashMap<String, Uuid>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `email` for `id`. Returns `Ok(true)` if this call took it.
    fn claim_email(&self, email: &str, id: Uuid) -> Result<bool, UserError> {
        match self.emails.entry(email.to_string()) {
            Entry::Occupied(owner) if *owner.get() == id => Ok(false),
            Entry::Occupied(_) => Err(UserError::DuplicateEmail(email.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(id);
                Ok(true)
            }
        }
    }

    fn release_email(&self, email: &str, id: Uuid) {
        self.emails.remove_if(email, |_, owner| *owner == id);
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, email: &str, hashed_password: &str) -> Result<User, UserError> {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            email: email.to_string(),
            is_chirpy_red: false,
        };
        self.claim_email(email, user.id)?;
        self.users.insert(
            user.id,
            UserWithPassword {
                user: user.clone(),
                hashed_password: hashed_password.to_string(),
            },
        );
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserWithPassword>, UserError> {
        let Some(id) = self.emails.get(email).map(|owner| *owner.value()) else {
            return Ok(None);
        };
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn update_credentials(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<User, UserError> {
        let old_email = self
            .users
            .get(&id)
            .map(|u| u.user.email.clone())
            .ok_or_else(|| UserError::NotFound(id.to_string()))?;
        let claimed = self.claim_email(email, id)?;

        let Some(mut entry) = self.users.get_mut(&id) else {
            if claimed {
                self.release_email(email, id);
            }
            return Err(UserError::NotFound(id.to_string()));
        };
        entry.user.email = email.to_string();
        entry.user.updated_at = Utc::now();
        entry.hashed_password = hashed_password.to_string();
        let updated = entry.user.clone();
        drop(entry);

        if old_email != email {
            self.release_email(&old_email, id);
        }
        Ok(updated)
    }

    async fn upgrade_to_red(&self, id: Uuid) -> Result<(), UserError> {
        let mut entry = self
            .users
            .get_mut(&id)
            .ok_or_else(|| UserError::NotFound(id.to_string()))?;
        entry.user.is_chirpy_red = true;
        entry.user.updated_at = Utc::now();
        Ok(())
    }

    async fn drop_all(&self) -> Result<(), UserError> {
        self.users.clear();
        self.emails.clear();
        Ok(())
    }
}
