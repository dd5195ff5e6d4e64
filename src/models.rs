//! Domain models for the temperature pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::FetchError;

// ---

/// Readings below this many degrees Celsius classify as too cold.
pub const LOW_THRESHOLD_C: f64 = 10.0;

/// Readings above this many degrees Celsius classify as too hot.
pub const HIGH_THRESHOLD_C: f64 = 36.0;

/// A single temperature measurement as reported by the provider.
#[derive(Debug, Clone)]
pub struct Reading {
    // ---
    pub sensor_id: String,
    pub value: f64,
    pub observed_at: DateTime<Utc>,
}

/// Coarse classification of a temperature reading.
///
/// Both thresholds belong to `Good`: 10.0 exactly and 36.0 exactly are
/// acceptable, only values strictly outside the band alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    TooCold,
    Good,
    TooHot,
}

/// A classified reading, the end product of a fetch.
#[derive(Debug, Clone)]
pub struct TemperatureResult {
    // ---
    pub reading: Reading,
    pub status: Status,
}

impl Status {
    /// Classify a temperature in degrees Celsius.
    ///
    /// Every finite value maps to exactly one variant; NaN and infinities
    /// are rejected with [`FetchError::InvalidInput`] rather than silently
    /// landing in a band.
    pub fn classify(temperature: f64) -> Result<Self, FetchError> {
        // ---
        if !temperature.is_finite() {
            return Err(FetchError::InvalidInput(temperature));
        }

        if temperature < LOW_THRESHOLD_C {
            Ok(Status::TooCold)
        } else if temperature <= HIGH_THRESHOLD_C {
            Ok(Status::Good)
        } else {
            Ok(Status::TooHot)
        }
    }
}
