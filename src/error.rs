//! Typed failures for the fetch-and-classify pipeline.
//!
//! Every failure the pipeline can produce is one of these variants. Nothing
//! below the route layer recovers from them: the client and classifier
//! return them, the service records them, and `routes::temperature` maps
//! them to HTTP status codes and wire labels.

use std::time::Duration;

use crate::metrics::Outcome;

// ---

/// Failure kinds surfaced by the provider client and the classifier.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The provider was unreachable or answered with an unexpected status.
    #[error("provider request failed: {0}")]
    Network(String),

    /// The provider did not answer within the configured bound. Treated as
    /// a network failure for accounting and status-code purposes.
    #[error("provider request timed out after {0:?}")]
    Timeout(Duration),

    /// The provider has no such senseBox, no temperature sensor on it, or
    /// no usable measurement for it.
    #[error("{0}")]
    NotFound(String),

    /// A response arrived but required fields were missing or malformed.
    #[error("{0}")]
    Parse(String),

    /// The measured value is not a finite number.
    #[error("temperature is not a finite number: {0}")]
    InvalidInput(f64),
}

impl FetchError {
    /// Wire label reported as `errorKind` in error payloads. Timeouts
    /// report as `NetworkError`.
    pub fn kind(&self) -> &'static str {
        // ---
        match self {
            FetchError::Network(_) | FetchError::Timeout(_) => "NetworkError",
            FetchError::NotFound(_) => "NotFoundError",
            FetchError::Parse(_) => "ParseError",
            FetchError::InvalidInput(_) => "InvalidInputError",
        }
    }

    /// The outcome counter this failure is recorded under.
    pub fn outcome(&self) -> Outcome {
        // ---
        match self {
            FetchError::Network(_) | FetchError::Timeout(_) => Outcome::NetworkError,
            FetchError::NotFound(_) => Outcome::NotFound,
            FetchError::Parse(_) => Outcome::ParseError,
            FetchError::InvalidInput(_) => Outcome::InvalidInput,
        }
    }
}
