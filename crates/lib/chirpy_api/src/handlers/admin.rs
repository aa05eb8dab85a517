//! Admin handlers: file server metrics and dev-only reset.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use tracing::{info, warn};

use crate::AppState;
use crate::error::{AppError, AppResult};

/// `GET /admin/metrics`
pub async fn metrics_handler(State(state): State<AppState>) -> Html<String> {
    Html(format!(
        "<html>\n  <body>\n    <h1>Welcome, Chirpy Admin</h1>\n    \
         <p>Chirpy has been visited {} times!</p>\n  </body>\n</html>\n",
        state.metrics.hits()
    ))
}

/// `POST /admin/reset`: wipe all data. Refused outside the dev platform.
pub async fn reset_handler(State(state): State<AppState>) -> AppResult<StatusCode> {
    if !state.sessions.config().platform.allows_reset() {
        warn!(platform = %state.config.platform, "reset refused");
        return Err(AppError::Forbidden("Reset is only allowed in dev".into()));
    }

    state.metrics.reset();
    state.sessions.reset_tokens().await?;
    state.chirps.drop_all().await?;
    state.users.drop_all().await?;
    info!("all data reset");
    Ok(StatusCode::OK)
}
