//! Static file hit counting.

use std::sync::atomic::{AtomicU64, Ordering};

use axum::{
    extract::{Request, State},
    http::{HeaderValue, header::CACHE_CONTROL},
    middleware::Next,
    response::Response,
};

use crate::AppState;

/// Process-wide counters shown on `/admin/metrics`.
#[derive(Debug, Default)]
pub struct Metrics {
    file_server_hits: AtomicU64,
}

impl Metrics {
    pub fn record_hit(&self) {
        self.file_server_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> u64 {
        self.file_server_hits.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.file_server_hits.store(0, Ordering::Relaxed);
    }
}

/// Counts every request to the file server and disables caching so each
/// visit reaches it.
pub async fn count_hits(State(state): State<AppState>, request: Request, next: Next) -> Response {
    state.metrics.record_hit();
    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hits_accumulate_and_reset() {
        let metrics = Metrics::default();
        metrics.record_hit();
        metrics.record_hit();
        assert_eq!(metrics.hits(), 2);
        metrics.reset();
        assert_eq!(metrics.hits(), 0);
    }
}
