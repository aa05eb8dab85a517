//! Polka payment webhook.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use tracing::{debug, info};

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{EVENT_USER_UPGRADED, PolkaWebhookRequest};

/// `POST /api/polka/webhooks`: requires `Authorization: ApiKey <key>`.
///
/// The key is checked before the body is read. Events other than
/// `user.upgraded` are acknowledged and ignored.
pub async fn polka_webhook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<StatusCode> {
    state.sessions.authenticate_api_key(&headers)?;

    let event: PolkaWebhookRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::Validation(format!("Invalid webhook body: {e}")))?;

    if event.event != EVENT_USER_UPGRADED {
        debug!(event = %event.event, "ignoring polka event");
        return Ok(StatusCode::NO_CONTENT);
    }

    state.users.upgrade_to_red(event.data.user_id).await?;
    info!(user_id = %event.data.user_id, "user upgraded to chirpy red");
    Ok(StatusCode::NO_CONTENT)
}
