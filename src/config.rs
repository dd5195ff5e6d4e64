//! Configuration loader for the `hivetemp` service.
//!
//! This module centralizes all runtime configuration values and their defaults,
//! loading from environment variables (with optional `.env` file support
//! provided by the caller). By consolidating configuration logic here, we
//! avoid scattering `env::var` calls throughout the codebase.

use std::env;

use anyhow::{anyhow, Result};

// ---

/// senseBox queried when `SENSEBOX_ID` is not set: the monitored beehive box.
const DEFAULT_SENSEBOX_ID: &str = "5eba5fbad46fb8001b799786";

/// Version string reported when `APP_VERSION` is not set.
const DEFAULT_APP_VERSION: &str = "0.0.1";

/// Public OpenSenseMap boxes API.
const DEFAULT_API_BASE: &str = "https://api.opensensemap.org/boxes";

/// Per-request provider timeout in seconds.
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Parse an optional integer environment variable with a default value.
macro_rules! parse_env_u64 {
    ($var_name:expr, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.parse::<u64>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Read an optional string environment variable with a default value.
macro_rules! env_or {
    ($var_name:expr, $default:expr) => {
        env::var($var_name).unwrap_or_else(|_| $default.to_string())
    };
}

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// senseBox identifier queried on `/temperature`.
    pub sensebox_id: String,

    /// Version string reported by `/` and `/version`.
    pub app_version: String,

    /// OpenSenseMap boxes API base URL.
    pub api_base: String,

    /// Upper bound on a single provider call, in seconds.
    pub fetch_timeout_secs: u64,
}

/// Load configuration from environment variables with defaults.
///
/// Optional:
/// - `SENSEBOX_ID` – senseBox to query (default: the monitored beehive box)
/// - `APP_VERSION` – reported version string (default: 0.0.1)
/// - `SENSOR_API_BASE` – provider base URL (default: public OpenSenseMap API)
/// - `FETCH_TIMEOUT_SECS` – provider call timeout (default: 10)
///
/// Returns an error if any variable is set but invalid.
pub fn load_from_env() -> Result<Config> {
    // ---
    let sensebox_id = env_or!("SENSEBOX_ID", DEFAULT_SENSEBOX_ID);
    let app_version = env_or!("APP_VERSION", DEFAULT_APP_VERSION);
    let api_base = env_or!("SENSOR_API_BASE", DEFAULT_API_BASE);
    let fetch_timeout_secs = parse_env_u64!("FETCH_TIMEOUT_SECS", DEFAULT_FETCH_TIMEOUT_SECS);

    Ok(Config {
        sensebox_id,
        app_version,
        api_base,
        fetch_timeout_secs,
    })
}

impl Config {
    /// Log the loaded configuration for debugging purposes.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  SENSEBOX_ID        : {}", self.sensebox_id);
        tracing::info!("  APP_VERSION        : {}", self.app_version);
        tracing::info!("  SENSOR_API_BASE    : {}", self.api_base);
        tracing::info!("  FETCH_TIMEOUT_SECS : {}", self.fetch_timeout_secs);
    }
}
