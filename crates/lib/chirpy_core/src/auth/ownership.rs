//! Resource ownership guard.
//!
//! Callers must pass an identity already produced by
//! [`super::session::SessionManager::authenticate`]; this module never looks
//! at credentials.

use uuid::Uuid;

use super::AuthError;
use crate::models::chirp::Chirp;

/// A resource with a fixed owning user.
pub trait Owned {
    fn owner_id(&self) -> Uuid;
}

impl Owned for Chirp {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

/// Allow iff `caller` is `owner`.
pub fn authorize(caller: Uuid, owner: Uuid) -> Result<(), AuthError> {
    if caller == owner {
        Ok(())
    } else {
        Err(AuthError::Forbidden(format!(
            "user {caller} does not own this resource"
        )))
    }
}

/// [`authorize`] against a resource's recorded owner.
pub fn authorize_owner<R: Owned>(caller: Uuid, resource: &R) -> Result<(), AuthError> {
    authorize(caller, resource.owner_id())
}
