//! # chirpy_api
//!
//! HTTP API library for Chirpy.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use chirpy_core::auth::memory::InMemoryRefreshTokenStore;
use chirpy_core::auth::queries::PgRefreshTokenStore;
use chirpy_core::auth::session::SessionManager;
use chirpy_core::auth::store::RefreshTokenStore;
use chirpy_core::chirps::ChirpStore;
use chirpy_core::chirps::memory::InMemoryChirpStore;
use chirpy_core::chirps::queries::PgChirpStore;
use chirpy_core::users::UserStore;
use chirpy_core::users::memory::InMemoryUserStore;
use chirpy_core::users::queries::PgUserStore;
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ApiConfig;
use crate::handlers::{admin, auth, chirps, health, users, webhooks};
use crate::middleware::metrics::Metrics;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: ApiConfig,
    /// Token issuance and verification.
    pub sessions: SessionManager,
    pub users: Arc<dyn UserStore>,
    pub chirps: Arc<dyn ChirpStore>,
    /// Static file hit counter.
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Build state over explicit stores.
    pub fn new(
        config: ApiConfig,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
        users: Arc<dyn UserStore>,
        chirps: Arc<dyn ChirpStore>,
    ) -> Self {
        let sessions = SessionManager::new(config.session_config(), refresh_tokens);
        Self {
            config,
            sessions,
            users,
            chirps,
            metrics: Arc::new(Metrics::default()),
        }
    }

    /// State backed by PostgreSQL.
    pub fn postgres(config: ApiConfig, pool: PgPool) -> Self {
        Self::new(
            config,
            Arc::new(PgRefreshTokenStore::new(pool.clone())),
            Arc::new(PgUserStore::new(pool.clone())),
            Arc::new(PgChirpStore::new(pool)),
        )
    }

    /// State backed by process-local stores; nothing survives a restart.
    pub fn in_memory(config: ApiConfig) -> Self {
        Self::new(
            config,
            Arc::new(InMemoryRefreshTokenStore::new()),
            Arc::new(InMemoryUserStore::new()),
            Arc::new(InMemoryChirpStore::new()),
        )
    }
}

/// Run embedded database migrations.
///
/// Delegates to `chirpy_core::migrate::migrate()` which owns the migration files.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    chirpy_core::migrate::migrate(pool).await
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no access token required)
    let public = Router::new()
        .route("/api/healthz", get(health::healthz))
        .route("/api/users", post(users::create_user_handler))
        .route("/api/login", post(auth::login_handler))
        .route("/api/refresh", post(auth::refresh_handler))
        .route("/api/revoke", post(auth::revoke_handler))
        .route("/api/chirps", get(chirps::list_chirps_handler))
        .route("/api/chirps/{chirp_id}", get(chirps::get_chirp_handler))
        .route("/api/polka/webhooks", post(webhooks::polka_webhook_handler))
        .route("/admin/metrics", get(admin::metrics_handler))
        .route("/admin/reset", post(admin::reset_handler));

    // Protected routes (require a valid access token)
    let protected = Router::new()
        .route("/api/users", axum::routing::put(users::update_user_handler))
        .route("/api/chirps", post(chirps::create_chirp_handler))
        .route(
            "/api/chirps/{chirp_id}",
            axum::routing::delete(chirps::delete_chirp_handler),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    // Static files, counted and uncached
    let files = Router::new()
        .nest_service("/app", ServeDir::new(&state.config.filepath_root))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::metrics::count_hits,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .merge(files)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}
