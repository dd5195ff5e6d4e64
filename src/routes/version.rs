//! Deployed-version endpoint.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::routes::AppState;

// ---

/// JSON response body for the `/version` endpoint.
#[derive(Serialize)]
struct VersionResponse {
    version: String,
}

/// Handle `GET /version`.
///
/// Reports the configured version string, falling back to the crate default
/// when `APP_VERSION` is unset. Useful for checking what a deployment is
/// actually running.
async fn version(State(state): State<AppState>) -> Json<VersionResponse> {
    // ---
    Json(VersionResponse {
        version: state.config.app_version.clone(),
    })
}

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/version", get(version))
}
