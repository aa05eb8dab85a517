//! Chirp handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chirpy_core::chirps;
use uuid::Uuid;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{ChirpResponse, CreateChirpRequest};

fn parse_chirp_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::Validation(format!("Invalid chirp ID: {raw}")))
}

/// `POST /api/chirps`: post a chirp as the caller.
pub async fn create_chirp_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    Json(body): Json<CreateChirpRequest>,
) -> AppResult<(StatusCode, Json<ChirpResponse>)> {
    let chirp = chirps::post(state.chirps.as_ref(), user_id, &body.body).await?;
    Ok((StatusCode::CREATED, Json(chirp.into())))
}

/// `GET /api/chirps`: all chirps, oldest first.
pub async fn list_chirps_handler(State(state): State<AppState>) -> AppResult<Json<Vec<ChirpResponse>>> {
    let all = state.chirps.list().await?;
    Ok(Json(all.into_iter().map(ChirpResponse::from).collect()))
}

/// `GET /api/chirps/{chirp_id}`
pub async fn get_chirp_handler(
    State(state): State<AppState>,
    Path(chirp_id): Path<String>,
) -> AppResult<Json<ChirpResponse>> {
    let chirp = state.chirps.get(parse_chirp_id(&chirp_id)?).await?;
    Ok(Json(chirp.into()))
}

/// `DELETE /api/chirps/{chirp_id}`: only the author may delete.
pub async fn delete_chirp_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    Path(chirp_id): Path<String>,
) -> AppResult<StatusCode> {
    chirps::delete_owned(state.chirps.as_ref(), user_id, parse_chirp_id(&chirp_id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
