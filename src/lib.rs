//! Core library for the `hivetemp` temperature service.
//!
//! The pipeline behind `GET /temperature`:
//!
//! ```text
//! TemperatureService::fetch
//!   -> SensorClient::fetch_latest    (bounded provider call)
//!   -> Status::classify              (fixed thresholds)
//!   -> MetricsRegistry::record       (one event per attempt)
//! ```
//!
//! The `/metrics` route reads the registry and renders Prometheus text; it
//! never calls the provider. Route modules follow the Explicit Module
//! Boundary Pattern (EMBP): `routes::router` is the only entry point the
//! binary needs besides startup wiring.

pub mod client;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod routes;
pub mod service;

// Re-exported so routes/*.rs, the binary and the integration tests depend on
// the crate root rather than on individual sibling modules.
pub use client::{OpenSenseMapClient, SensorClient};
pub use config::Config;
pub use error::FetchError;
pub use metrics::{MetricsRegistry, MetricsSnapshot, Outcome};
pub use models::{Reading, Status, TemperatureResult};
pub use service::TemperatureService;
