//! Provider access for senseBox temperature readings.
//!
//! [`SensorClient`] is the narrow seam between the service layer and the
//! outside world; tests substitute stubs for it. [`OpenSenseMapClient`] is
//! the production implementation against the OpenSenseMap boxes API.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::FetchError;
use crate::models::Reading;

// ---

/// Sensor title that marks the temperature sensor inside a box document.
pub const TEMPERATURE_SENSOR_TITLE: &str = "Temperatur";

/// Measurements older than this are treated as missing rather than served.
const MAX_MEASUREMENT_AGE_SECS: i64 = 3600;

/// Source of temperature readings.
#[async_trait]
pub trait SensorClient: Send + Sync {
    /// Fetch the latest temperature reading for one senseBox.
    async fn fetch_latest(&self, box_id: &str) -> Result<Reading, FetchError>;
}

/// HTTP client for the OpenSenseMap boxes API.
pub struct OpenSenseMapClient {
    // ---
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl OpenSenseMapClient {
    /// Build a client with a hard per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        // ---
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Map transport-level failures onto the pipeline error taxonomy.
    fn classify_transport_error(&self, error: reqwest::Error) -> FetchError {
        // ---
        if error.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else if error.is_decode() {
            FetchError::Parse(format!("malformed provider response: {}", error))
        } else {
            FetchError::Network(error.to_string())
        }
    }
}

#[async_trait]
impl SensorClient for OpenSenseMapClient {
    async fn fetch_latest(&self, box_id: &str) -> Result<Reading, FetchError> {
        // ---
        let url = format!("{}/{}?format=json", self.base_url, box_id);
        tracing::debug!("Fetching box document from: {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| self.classify_transport_error(e))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(format!(
                "no senseBox with id {}",
                box_id
            )));
        }
        if !response.status().is_success() {
            return Err(FetchError::Network(format!(
                "provider answered HTTP {} for box {}",
                response.status(),
                box_id
            )));
        }

        let document: SenseBox = response
            .json()
            .await
            .map_err(|e| self.classify_transport_error(e))?;

        extract_reading(box_id, &document, Utc::now())
    }
}

// ---
// Wire types for the slice of the box document we consume. Unknown fields
// are ignored, and every field we touch is optional so that absence maps to
// a typed error instead of a serde failure.

#[derive(Debug, Deserialize)]
struct SenseBox {
    #[serde(default)]
    sensors: Vec<SenseBoxSensor>,
}

#[derive(Debug, Deserialize)]
struct SenseBoxSensor {
    #[serde(rename = "_id")]
    id: Option<String>,
    title: Option<String>,
    #[serde(rename = "lastMeasurement")]
    last_measurement: Option<LastMeasurement>,
}

#[derive(Debug, Deserialize)]
struct LastMeasurement {
    value: Option<serde_json::Value>,
    #[serde(rename = "createdAt")]
    created_at: Option<String>,
}

/// Pull the temperature reading out of a box document.
///
/// `now` is injected so the freshness check is testable without a clock.
fn extract_reading(
    box_id: &str,
    document: &SenseBox,
    now: DateTime<Utc>,
) -> Result<Reading, FetchError> {
    // ---
    let sensor = document
        .sensors
        .iter()
        .find(|sensor| sensor.title.as_deref() == Some(TEMPERATURE_SENSOR_TITLE))
        .ok_or_else(|| {
            FetchError::NotFound(format!(
                "box {} has no \"{}\" sensor",
                box_id, TEMPERATURE_SENSOR_TITLE
            ))
        })?;

    let measurement = sensor.last_measurement.as_ref().ok_or_else(|| {
        FetchError::Parse(format!("box {} sensor has no lastMeasurement", box_id))
    })?;

    let raw_value = measurement.value.as_ref().ok_or_else(|| {
        FetchError::Parse(format!("box {} measurement has no value field", box_id))
    })?;
    let value = numeric_value(raw_value).ok_or_else(|| {
        FetchError::Parse(format!(
            "box {} measurement value is not numeric: {}",
            box_id, raw_value
        ))
    })?;

    let created_at = measurement.created_at.as_deref().ok_or_else(|| {
        FetchError::Parse(format!(
            "box {} measurement has no createdAt field",
            box_id
        ))
    })?;
    let observed_at = DateTime::parse_from_rfc3339(created_at)
        .map_err(|e| {
            FetchError::Parse(format!(
                "box {} measurement timestamp {:?} is invalid: {}",
                box_id, created_at, e
            ))
        })?
        .with_timezone(&Utc);

    let age = now.signed_duration_since(observed_at);
    if age > chrono::Duration::seconds(MAX_MEASUREMENT_AGE_SECS) {
        return Err(FetchError::NotFound(format!(
            "latest measurement for box {} is {}s old (freshness bound is {}s)",
            box_id,
            age.num_seconds(),
            MAX_MEASUREMENT_AGE_SECS
        )));
    }

    Ok(Reading {
        sensor_id: sensor.id.clone().unwrap_or_else(|| box_id.to_string()),
        value,
        observed_at,
    })
}

/// Accept the measurement value as either a JSON number or a numeric string.
/// OpenSenseMap serializes measurement values as strings.
fn numeric_value(value: &serde_json::Value) -> Option<f64> {
    // ---
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn test_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 26, 18, 45, 0).unwrap()
    }

    fn document(sensors: serde_json::Value) -> SenseBox {
        // ---
        serde_json::from_value(json!({ "sensors": sensors })).unwrap()
    }

    fn temperature_sensor(value: serde_json::Value, created_at: &str) -> serde_json::Value {
        // ---
        json!({
            "_id": "sensor-42",
            "title": TEMPERATURE_SENSOR_TITLE,
            "lastMeasurement": { "value": value, "createdAt": created_at }
        })
    }

    #[test]
    fn test_extracts_reading_from_string_value() {
        // ---
        let doc = document(json!([
            temperature_sensor(json!("22.5"), "2025-03-26T18:40:00Z")
        ]));

        let reading = extract_reading("box-1", &doc, test_now()).unwrap();
        assert_eq!(reading.value, 22.5);
        assert_eq!(reading.sensor_id, "sensor-42");
        assert_eq!(
            reading.observed_at,
            Utc.with_ymd_and_hms(2025, 3, 26, 18, 40, 0).unwrap()
        );
    }

    #[test]
    fn test_extracts_reading_from_numeric_value() {
        // ---
        let doc = document(json!([
            temperature_sensor(json!(7.25), "2025-03-26T18:40:00Z")
        ]));

        let reading = extract_reading("box-1", &doc, test_now()).unwrap();
        assert_eq!(reading.value, 7.25);
    }

    #[test]
    fn test_missing_temperature_sensor_is_not_found() {
        // ---
        // A box with sensors, none of them temperature
        let doc = document(json!([
            { "_id": "s1", "title": "rel. Luftfeuchte" },
            { "_id": "s2", "title": "Luftdruck" }
        ]));
        assert!(matches!(
            extract_reading("box-1", &doc, test_now()),
            Err(FetchError::NotFound(_))
        ));

        // A box with no sensors at all
        let doc = document(json!([]));
        assert!(matches!(
            extract_reading("box-1", &doc, test_now()),
            Err(FetchError::NotFound(_))
        ));
    }

    #[test]
    fn test_sensor_title_match_is_exact() {
        // ---
        let doc = document(json!([
            temperature_sensor(json!("20.0"), "2025-03-26T18:40:00Z")
        ]));
        let doc_lowercase = {
            let mut altered = json!([
                temperature_sensor(json!("20.0"), "2025-03-26T18:40:00Z")
            ]);
            altered[0]["title"] = json!("temperatur");
            document(altered)
        };

        assert!(extract_reading("box-1", &doc, test_now()).is_ok());
        assert!(matches!(
            extract_reading("box-1", &doc_lowercase, test_now()),
            Err(FetchError::NotFound(_))
        ));
    }

    #[test]
    fn test_missing_measurement_fields_are_parse_errors() {
        // ---
        // No lastMeasurement at all
        let doc = document(json!([
            { "_id": "s1", "title": TEMPERATURE_SENSOR_TITLE }
        ]));
        assert!(matches!(
            extract_reading("box-1", &doc, test_now()),
            Err(FetchError::Parse(_))
        ));

        // Measurement with no value
        let doc = document(json!([{
            "_id": "s1",
            "title": TEMPERATURE_SENSOR_TITLE,
            "lastMeasurement": { "createdAt": "2025-03-26T18:40:00Z" }
        }]));
        assert!(matches!(
            extract_reading("box-1", &doc, test_now()),
            Err(FetchError::Parse(_))
        ));

        // Measurement with no timestamp
        let doc = document(json!([{
            "_id": "s1",
            "title": TEMPERATURE_SENSOR_TITLE,
            "lastMeasurement": { "value": "21.0" }
        }]));
        assert!(matches!(
            extract_reading("box-1", &doc, test_now()),
            Err(FetchError::Parse(_))
        ));
    }

    #[test]
    fn test_non_numeric_value_is_parse_error() {
        // ---
        let doc = document(json!([
            temperature_sensor(json!("not-a-number"), "2025-03-26T18:40:00Z")
        ]));
        assert!(matches!(
            extract_reading("box-1", &doc, test_now()),
            Err(FetchError::Parse(_))
        ));

        let doc = document(json!([
            temperature_sensor(json!([21.0]), "2025-03-26T18:40:00Z")
        ]));
        assert!(matches!(
            extract_reading("box-1", &doc, test_now()),
            Err(FetchError::Parse(_))
        ));
    }

    #[test]
    fn test_malformed_timestamp_is_parse_error() {
        // ---
        let doc = document(json!([
            temperature_sensor(json!("21.0"), "five minutes ago")
        ]));
        assert!(matches!(
            extract_reading("box-1", &doc, test_now()),
            Err(FetchError::Parse(_))
        ));
    }

    #[test]
    fn test_stale_measurement_is_not_found() {
        // ---
        let now = test_now();

        // Two hours old - stale
        let stale = (now - chrono::Duration::hours(2)).to_rfc3339();
        let doc = document(json!([temperature_sensor(json!("21.0"), &stale)]));
        assert!(matches!(
            extract_reading("box-1", &doc, now),
            Err(FetchError::NotFound(_))
        ));

        // Exactly at the freshness bound - still served
        let edge = (now - chrono::Duration::seconds(MAX_MEASUREMENT_AGE_SECS)).to_rfc3339();
        let doc = document(json!([temperature_sensor(json!("21.0"), &edge)]));
        assert!(extract_reading("box-1", &doc, now).is_ok());

        // One second past the bound - stale
        let past = (now - chrono::Duration::seconds(MAX_MEASUREMENT_AGE_SECS + 1)).to_rfc3339();
        let doc = document(json!([temperature_sensor(json!("21.0"), &past)]));
        assert!(matches!(
            extract_reading("box-1", &doc, now),
            Err(FetchError::NotFound(_))
        ));
    }

    #[test]
    fn test_unknown_document_fields_are_ignored() {
        // ---
        let doc: SenseBox = serde_json::from_value(json!({
            "_id": "box-1",
            "name": "Bienenstock",
            "exposure": "outdoor",
            "sensors": [{
                "_id": "s1",
                "title": TEMPERATURE_SENSOR_TITLE,
                "unit": "°C",
                "sensorType": "HDC1080",
                "lastMeasurement": {
                    "value": "19.4",
                    "createdAt": "2025-03-26T18:40:00Z"
                }
            }]
        }))
        .unwrap();

        let reading = extract_reading("box-1", &doc, test_now()).unwrap();
        assert_eq!(reading.value, 19.4);
    }

    #[test]
    fn test_numeric_value_accepts_padded_strings() {
        // ---
        assert_eq!(numeric_value(&json!(" 22.5 ")), Some(22.5));
        assert_eq!(numeric_value(&json!("-3.25")), Some(-3.25));
        assert_eq!(numeric_value(&json!(18)), Some(18.0));
        assert_eq!(numeric_value(&json!(null)), None);
        assert_eq!(numeric_value(&json!({ "v": 1 })), None);
    }
}
