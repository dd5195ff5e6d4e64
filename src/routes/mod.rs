use std::sync::Arc;

use axum::Router;

use crate::{Config, MetricsRegistry, TemperatureService};

mod health;
mod info;
mod metrics;
mod temperature;
mod version;

// ---

/// State shared by every route in the gateway.
#[derive(Clone)]
pub struct AppState {
    // ---
    pub service: TemperatureService,
    pub metrics: Arc<MetricsRegistry>,
    pub config: Config,
}

pub fn router(
    service: TemperatureService,
    metrics: Arc<MetricsRegistry>,
    config: Config,
) -> Router {
    // ---
    Router::new()
        .merge(info::router())
        .merge(version::router())
        .merge(temperature::router())
        .merge(metrics::router())
        .merge(health::router())
        .with_state(AppState {
            service,
            metrics,
            config,
        })
}
