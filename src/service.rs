//! Fetch-and-classify orchestration.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::client::SensorClient;
use crate::error::FetchError;
use crate::metrics::{MetricsRegistry, Outcome};
use crate::models::{Status, TemperatureResult};

// ---

/// Ties the provider client, the classifier and the metrics registry
/// together. Cheap to clone; clones share one client and one registry.
#[derive(Clone)]
pub struct TemperatureService {
    // ---
    client: Arc<dyn SensorClient>,
    metrics: Arc<MetricsRegistry>,
}

impl TemperatureService {
    pub fn new(client: Arc<dyn SensorClient>, metrics: Arc<MetricsRegistry>) -> Self {
        Self { client, metrics }
    }

    /// Fetch the latest reading for `box_id` and classify it.
    ///
    /// Exactly one metrics event is recorded per invocation, whichever way
    /// it ends: success counts under `success` and moves the gauge to the
    /// observed value, failures count under their mapped outcome and leave
    /// the gauge alone. The failure itself is returned unchanged so the
    /// route layer can translate it.
    pub async fn fetch(&self, box_id: &str) -> Result<TemperatureResult, FetchError> {
        // ---
        let result = self.attempt(box_id).await;

        match &result {
            Ok(r) => {
                self.metrics.record(Outcome::Success, Some(r.reading.value));
                debug!(
                    "Fetched box {}: {}°C via sensor {} ({:?})",
                    box_id, r.reading.value, r.reading.sensor_id, r.status
                );
            }
            Err(e) => {
                self.metrics.record(e.outcome(), None);
                warn!("Fetch for box {} failed: {}", box_id, e);
            }
        }

        result
    }

    async fn attempt(&self, box_id: &str) -> Result<TemperatureResult, FetchError> {
        // ---
        let reading = self.client.fetch_latest(box_id).await?;
        let status = Status::classify(reading.value)?;

        Ok(TemperatureResult { reading, status })
    }
}
