//! API server configuration.

use chirpy_core::auth::jwt::resolve_jwt_secret;
use chirpy_core::auth::session::{Platform, SessionConfig};

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:8080").
    pub bind_addr: String,
    /// PostgreSQL connection URL.
    pub pg_connection_url: String,
    /// JWT signing secret.
    pub jwt_secret: String,
    /// Shared key the Polka payment provider sends with webhooks.
    pub polka_key: String,
    /// Deployment platform label; `"dev"` enables `/admin/reset`.
    pub platform: String,
    /// Directory served under `/app/`.
    pub filepath_root: String,
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable           | Default                                     |
    /// |--------------------|---------------------------------------------|
    /// | `BIND_ADDR`        | `127.0.0.1:8080`                            |
    /// | `DATABASE_URL`     | `postgres://localhost:5432/chirpy`          |
    /// | `JWT_SECRET` / `AUTH_SECRET` | generated & persisted to file     |
    /// | `POLKA_KEY`        | empty (every webhook is rejected)           |
    /// | `PLATFORM`         | `production`                                |
    /// | `FILEPATH_ROOT`    | `.`                                         |
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".into()),
            pg_connection_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost:5432/chirpy".into()),
            jwt_secret: resolve_jwt_secret(),
            polka_key: std::env::var("POLKA_KEY").unwrap_or_default(),
            platform: std::env::var("PLATFORM").unwrap_or_else(|_| "production".into()),
            filepath_root: std::env::var("FILEPATH_ROOT").unwrap_or_else(|_| ".".into()),
        }
    }

    pub fn platform(&self) -> Platform {
        Platform::from_label(&self.platform)
    }

    /// Session settings derived from this config.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::new(&self.jwt_secret, &self.polka_key, self.platform())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(platform: &str) -> ApiConfig {
        ApiConfig {
            bind_addr: "127.0.0.1:0".into(),
            pg_connection_url: String::new(),
            jwt_secret: "secret".into(),
            polka_key: "f271c81ff7084ee5b99a5091b42d486e".into(),
            platform: platform.into(),
            filepath_root: ".".into(),
        }
    }

    #[test]
    fn only_dev_platform_allows_reset() {
        assert!(config("dev").session_config().platform.allows_reset());
        assert!(!config("production").session_config().platform.allows_reset());
        assert!(!config("").session_config().platform.allows_reset());
    }

    #[test]
    fn session_config_carries_secrets() {
        let session = config("dev").session_config();
        assert_eq!(session.jwt_secret, "secret");
        assert_eq!(session.api_key, "f271c81ff7084ee5b99a5091b42d486e");
    }
}
