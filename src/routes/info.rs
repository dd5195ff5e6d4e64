//! Service metadata endpoint.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::routes::AppState;

// ---

/// Human-facing service name reported by `GET /`.
const SERVICE_NAME: &str = "hivetemp";

/// Endpoints advertised on the index, in routing order.
const ENDPOINTS: [&str; 5] = ["/", "/version", "/temperature", "/metrics", "/health"];

/// JSON response body for the `/` endpoint.
#[derive(Serialize)]
struct InfoResponse {
    // ---
    name: &'static str,
    version: String,
    endpoints: [&'static str; 5],
}

/// Handle `GET /`.
///
/// Static service metadata only: no provider call, no metrics mutation.
async fn info(State(state): State<AppState>) -> Json<InfoResponse> {
    // ---
    Json(InfoResponse {
        name: SERVICE_NAME,
        version: state.config.app_version.clone(),
        endpoints: ENDPOINTS,
    })
}

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/", get(info))
}
