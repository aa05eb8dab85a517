//! Liveness probe.

use axum::http::{StatusCode, header::CONTENT_TYPE};
use axum::response::IntoResponse;

/// `GET /api/healthz`
pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, [(CONTENT_TYPE, "text/plain; charset=utf-8")], "OK")
}
