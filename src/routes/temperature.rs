//! Current-temperature endpoint.
//!
//! `GET /temperature` runs one fetch-and-classify pass against the configured
//! senseBox and reports either the classified reading or a typed error body.
//! The HTTP mapping of the error taxonomy lives here and nowhere else:
//! network failures and timeouts are `503`, a missing box or measurement is
//! `404`, and malformed or non-finite provider data is `502`.

use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};

use crate::error::FetchError;
use crate::models::{Status, TemperatureResult};
use crate::routes::AppState;

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/temperature", get(handler))
}

async fn handler(State(state): State<AppState>) -> impl IntoResponse {
    // ---
    info!(
        "GET /temperature - Fetching latest reading for box {}",
        state.config.sensebox_id
    );

    match state.service.fetch(&state.config.sensebox_id).await {
        Ok(result) => (StatusCode::OK, Json(TemperatureBody::from(result))).into_response(),
        Err(e) => {
            error!("GET /temperature - Fetch failed: {}", e);
            let body = ErrorBody {
                error_kind: e.kind(),
                message: e.to_string(),
            };
            (status_for(&e), Json(body)).into_response()
        }
    }
}

/// HTTP status for each failure kind.
fn status_for(error: &FetchError) -> StatusCode {
    // ---
    match error {
        FetchError::Network(_) | FetchError::Timeout(_) => StatusCode::SERVICE_UNAVAILABLE,
        FetchError::NotFound(_) => StatusCode::NOT_FOUND,
        FetchError::Parse(_) | FetchError::InvalidInput(_) => StatusCode::BAD_GATEWAY,
    }
}

/// JSON body for a successful `/temperature` response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TemperatureBody {
    // ---
    sensor_id: String,
    temperature_value: f64,
    status: Status,
    observed_at: DateTime<Utc>,
}

impl From<TemperatureResult> for TemperatureBody {
    fn from(result: TemperatureResult) -> Self {
        Self {
            sensor_id: result.reading.sensor_id,
            temperature_value: result.reading.value,
            status: result.status,
            observed_at: result.reading.observed_at,
        }
    }
}

/// JSON body for a failed `/temperature` response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    // ---
    error_kind: &'static str,
    message: String,
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::models::Reading;
    use std::time::Duration;

    #[test]
    fn test_status_mapping_covers_the_whole_taxonomy() {
        // ---
        assert_eq!(
            status_for(&FetchError::Network("down".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_for(&FetchError::Timeout(Duration::from_secs(10))),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_for(&FetchError::NotFound("gone".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&FetchError::Parse("junk".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&FetchError::InvalidInput(f64::NAN)),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_success_body_uses_camel_case_fields() {
        // ---
        let result = TemperatureResult {
            reading: Reading {
                sensor_id: "sensor-42".to_string(),
                value: 22.5,
                observed_at: Utc::now(),
            },
            status: Status::Good,
        };

        let body = serde_json::to_value(TemperatureBody::from(result)).unwrap();
        assert_eq!(body["sensorId"], "sensor-42");
        assert_eq!(body["temperatureValue"], 22.5);
        assert_eq!(body["status"], "Good");
        assert!(body["observedAt"].is_string());
    }

    #[test]
    fn test_error_body_uses_camel_case_fields() {
        // ---
        let error = FetchError::NotFound("no senseBox with id x".into());
        let body = serde_json::to_value(ErrorBody {
            error_kind: error.kind(),
            message: error.to_string(),
        })
        .unwrap();

        assert_eq!(body["errorKind"], "NotFoundError");
        assert_eq!(body["message"], "no senseBox with id x");
    }
}
