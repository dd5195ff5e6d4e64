//! Prometheus text exposition endpoint.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};

use crate::routes::AppState;

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/metrics", get(handler))
}

/// Handle `GET /metrics`.
///
/// Renders one consistent snapshot of the registry. Reading metrics never
/// triggers a provider call and never counts as a fetch attempt.
async fn handler(State(state): State<AppState>) -> impl IntoResponse {
    // ---
    let body = state.metrics.snapshot().render();

    (
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        body,
    )
        .into_response()
}
