//! Business logic composed from core stores.

pub mod auth;
