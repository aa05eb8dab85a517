//! Authentication middleware: Bearer access token verification.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::debug;
use uuid::Uuid;

use crate::AppState;
use crate::error::AppError;

/// Caller identity stored in request extensions by [`require_auth`].
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub Uuid);

/// Axum middleware: verifies `Authorization: Bearer <access token>` and
/// injects [`AuthenticatedUser`] into request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user_id = state
        .sessions
        .authenticate(request.headers())
        .map_err(|e| {
            debug!(error = %e, path = %request.uri().path(), "access token rejected");
            AppError::from(e)
        })?;

    request.extensions_mut().insert(AuthenticatedUser(user_id));

    Ok(next.run(request).await)
}
