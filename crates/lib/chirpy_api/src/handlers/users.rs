//! User account handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use chirpy_core::users;
use tracing::info;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{CredentialsRequest, UserResponse};

/// `POST /api/users`: register a new account.
pub async fn create_user_handler(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = users::register(state.users.as_ref(), &body.email, &body.password).await?;
    info!(user_id = %user.id, "user registered");
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// `PUT /api/users`: change the caller's email and password.
pub async fn update_user_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    Json(body): Json<CredentialsRequest>,
) -> AppResult<Json<UserResponse>> {
    let user =
        users::update_credentials(state.users.as_ref(), user_id, &body.email, &body.password)
            .await?;
    Ok(Json(user.into()))
}
