//! Session manager: login, refresh, revoke, authenticate.
//!
//! Refresh records move Active → Expired or Active → Revoked and never back.
//! Only an Active record can be exchanged or revoked; the other two states
//! are reported identically as [`AuthError::Unauthorized`].

use std::sync::Arc;

use chrono::{Duration, Utc};
use http::HeaderMap;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::AuthError;
use super::header;
use super::jwt::{self, ACCESS_TOKEN_TTL_SECS};
use super::refresh_token::{REFRESH_TOKEN_TTL_DAYS, generate_refresh_token};
use super::store::RefreshTokenStore;
use crate::models::auth::{RefreshTokenState, TokenPair};

/// Deployment platform. Only `Dev` permits destructive admin resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Dev,
    Production,
}

impl Platform {
    /// `"dev"` selects [`Platform::Dev`]; anything else is production.
    pub fn from_label(label: &str) -> Self {
        if label == "dev" {
            Platform::Dev
        } else {
            Platform::Production
        }
    }

    pub fn allows_reset(self) -> bool {
        self == Platform::Dev
    }
}

/// Immutable session settings, fixed at process start.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// HMAC secret for access tokens.
    pub jwt_secret: String,
    /// Key expected in `Authorization: ApiKey <key>` from webhook callers.
    pub api_key: String,
    pub platform: Platform,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
}

impl SessionConfig {
    /// Config with the standard lifetimes (1 hour access, 60 days refresh).
    pub fn new(jwt_secret: impl Into<String>, api_key: impl Into<String>, platform: Platform) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            api_key: api_key.into(),
            platform,
            access_token_ttl: Duration::seconds(ACCESS_TOKEN_TTL_SECS),
            refresh_token_ttl: Duration::days(REFRESH_TOKEN_TTL_DAYS),
        }
    }
}

/// Issues, exchanges and revokes session tokens.
#[derive(Clone)]
pub struct SessionManager {
    config: Arc<SessionConfig>,
    store: Arc<dyn RefreshTokenStore>,
}

impl SessionManager {
    pub fn new(config: SessionConfig, store: Arc<dyn RefreshTokenStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn secret(&self) -> &[u8] {
        self.config.jwt_secret.as_bytes()
    }

    fn mint(&self, user_id: Uuid) -> Result<String, AuthError> {
        jwt::make_access_token(user_id, self.secret(), self.config.access_token_ttl)
            .inspect_err(|e| error!(%user_id, "access token signing failed: {e}"))
    }

    /// Issue an access token and a persisted refresh token.
    ///
    /// `credentials_valid` is the outcome of the caller's password check.
    pub async fn login(&self, user_id: Uuid, credentials_valid: bool) -> Result<TokenPair, AuthError> {
        if !credentials_valid {
            debug!(%user_id, "login rejected: invalid credentials");
            return Err(AuthError::CredentialError);
        }

        let access_token = self.mint(user_id)?;
        let refresh_token = generate_refresh_token()
            .inspect_err(|e| error!("refresh token generation failed: {e}"))?;
        let expires_at = Utc::now() + self.config.refresh_token_ttl;
        self.store
            .insert(&refresh_token, user_id, expires_at)
            .await
            .inspect_err(|e| error!(%user_id, "refresh token insert failed: {e}"))?;

        info!(%user_id, "session issued");
        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Exchange an active refresh token for a new access token.
    ///
    /// The refresh token itself is left untouched (no rotation).
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, AuthError> {
        let record = self.store.find_by_token(refresh_token).await?;
        match record.state_at(Utc::now()) {
            RefreshTokenState::Active => self.mint(record.user_id),
            state => {
                debug!(user_id = %record.user_id, ?state, "refresh rejected");
                Err(AuthError::Unauthorized)
            }
        }
    }

    /// Revoke an active refresh token.
    pub async fn revoke(&self, refresh_token: &str) -> Result<(), AuthError> {
        let record = self.store.find_by_token(refresh_token).await?;
        match record.state_at(Utc::now()) {
            RefreshTokenState::Active => {
                self.store.revoke(refresh_token).await?;
                info!(user_id = %record.user_id, "refresh token revoked");
                Ok(())
            }
            state => {
                debug!(user_id = %record.user_id, ?state, "revoke rejected");
                Err(AuthError::Unauthorized)
            }
        }
    }

    /// Validate `Authorization: Bearer <access token>` and return the caller.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Uuid, AuthError> {
        let token = header::bearer_token(headers)?;
        jwt::verify_access_token(token, self.secret())
            .inspect_err(|e| debug!("access token rejected: {e}"))
    }

    /// Validate `Authorization: ApiKey <key>` against the configured key.
    pub fn authenticate_api_key(&self, headers: &HeaderMap) -> Result<(), AuthError> {
        let key = header::api_key(headers)?;
        if self.config.api_key.is_empty() || key != self.config.api_key {
            debug!("api key rejected");
            return Err(AuthError::InvalidApiKey);
        }
        Ok(())
    }

    /// Drop every refresh token. Refused outside [`Platform::Dev`].
    pub async fn reset_tokens(&self) -> Result<(), AuthError> {
        if !self.config.platform.allows_reset() {
            warn!(platform = ?self.config.platform, "refresh token reset refused");
            return Err(AuthError::Forbidden("reset is only allowed in dev".into()));
        }
        self.store.drop_all().await?;
        info!("all refresh tokens dropped");
        Ok(())
    }
}
