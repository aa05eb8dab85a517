//! Session request handlers.

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use chirpy_core::auth::header::bearer_token;

use crate::AppState;
use crate::error::AppResult;
use crate::models::{CredentialsRequest, LoginResponse, RefreshResponse};
use crate::services::auth;

/// `POST /api/login`: authenticate with email + password.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> AppResult<Json<LoginResponse>> {
    let resp = auth::login(&state, &body.email, &body.password).await?;
    Ok(Json(resp))
}

/// `POST /api/refresh`: exchange the bearer refresh token for a new access token.
///
/// The refresh token itself is not rotated.
pub async fn refresh_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<RefreshResponse>> {
    let refresh_token = bearer_token(&headers)?;
    let token = state.sessions.refresh(refresh_token).await?;
    Ok(Json(RefreshResponse { token }))
}

/// `POST /api/revoke`: revoke the bearer refresh token.
pub async fn revoke_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<StatusCode> {
    let refresh_token = bearer_token(&headers)?;
    state.sessions.revoke(refresh_token).await?;
    Ok(StatusCode::NO_CONTENT)
}
