//! Login flow: password check, then token issuance.

use chirpy_core::auth::password::verify_password;
use tracing::{debug, info};

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::LoginResponse;

/// Authenticate with email + password and issue a token pair.
///
/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn login(state: &AppState, email: &str, password: &str) -> AppResult<LoginResponse> {
    let Some(found) = state.users.find_by_email(email).await? else {
        debug!(email, "login for unknown email");
        return Err(AppError::Unauthorized("Incorrect email or password".into()));
    };

    let valid = verify_password(password, &found.hashed_password)?;
    let pair = state.sessions.login(found.user.id, valid).await?;

    info!(user_id = %found.user.id, "user logged in");
    Ok(LoginResponse {
        user: found.user.into(),
        token: pair.access_token,
        refresh_token: pair.refresh_token,
    })
}
