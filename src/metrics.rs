//! Process-wide fetch metrics and their Prometheus text rendering.
//!
//! One [`MetricsRegistry`] is created at startup and shared between the
//! service layer (writer) and the `/metrics` route (reader). All state for
//! one fetch attempt moves together: [`MetricsRegistry::record`] applies
//! the total increment, the outcome increment, and the gauge update inside
//! a single critical section, so a concurrent [`MetricsRegistry::snapshot`]
//! can never observe a total that disagrees with the sum of the outcome
//! counters.

use std::fmt::Write;
use std::sync::{Mutex, MutexGuard};

// ---

/// How a fetch attempt ended. Timeouts are recorded as `NetworkError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    NetworkError,
    NotFound,
    ParseError,
    InvalidInput,
}

impl Outcome {
    /// All outcomes in declaration order. Rendering iterates this so the
    /// exposition output is deterministic.
    pub const ALL: [Outcome; 5] = [
        Outcome::Success,
        Outcome::NetworkError,
        Outcome::NotFound,
        Outcome::ParseError,
        Outcome::InvalidInput,
    ];

    /// Label value for the `outcome` dimension.
    pub fn as_str(self) -> &'static str {
        // ---
        match self {
            Outcome::Success => "success",
            Outcome::NetworkError => "network_error",
            Outcome::NotFound => "not_found",
            Outcome::ParseError => "parse_error",
            Outcome::InvalidInput => "invalid_input",
        }
    }
}

/// Point-in-time copy of every counter plus the gauge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsSnapshot {
    // ---
    pub requests_total: u64,
    pub success_total: u64,
    pub network_error_total: u64,
    pub not_found_total: u64,
    pub parse_error_total: u64,
    pub invalid_input_total: u64,
    /// Last successfully observed temperature, `None` until the first
    /// successful fetch.
    pub last_temperature: Option<f64>,
}

impl MetricsSnapshot {
    /// Counter value for one outcome kind.
    pub fn outcome_total(&self, outcome: Outcome) -> u64 {
        // ---
        match outcome {
            Outcome::Success => self.success_total,
            Outcome::NetworkError => self.network_error_total,
            Outcome::NotFound => self.not_found_total,
            Outcome::ParseError => self.parse_error_total,
            Outcome::InvalidInput => self.invalid_input_total,
        }
    }

    /// Sum over all outcome counters. Always equal to `requests_total`.
    pub fn outcomes_sum(&self) -> u64 {
        // ---
        Outcome::ALL
            .iter()
            .map(|outcome| self.outcome_total(*outcome))
            .sum()
    }

    /// Render the snapshot in Prometheus text exposition format.
    ///
    /// Line order is fixed: the total counter, the five outcome counters in
    /// declaration order, then the gauge. The gauge is omitted entirely
    /// until a first successful fetch has set it.
    pub fn render(&self) -> String {
        // ---
        let mut out = String::new();

        let _ = writeln!(out, "# TYPE hivetemp_requests_total counter");
        let _ = writeln!(out, "hivetemp_requests_total {}", self.requests_total);

        let _ = writeln!(out, "# TYPE hivetemp_fetch_outcomes_total counter");
        for outcome in Outcome::ALL {
            let _ = writeln!(
                out,
                "hivetemp_fetch_outcomes_total{{outcome=\"{}\"}} {}",
                outcome.as_str(),
                self.outcome_total(outcome)
            );
        }

        if let Some(value) = self.last_temperature {
            let _ = writeln!(out, "# TYPE hivetemp_last_temperature gauge");
            let _ = writeln!(out, "hivetemp_last_temperature {}", value);
        }

        out
    }
}

/// Shared mutable metrics state.
///
/// A plain mutex around the whole snapshot instead of per-counter atomics:
/// the total and its outcome counter must move as a pair, and the lock is
/// held only for a handful of integer writes.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    inner: Mutex<MetricsSnapshot>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one finished fetch attempt.
    ///
    /// Increments the total, increments exactly one outcome counter, and
    /// moves the gauge when `last_temperature` is `Some`. Failed attempts
    /// pass `None` and leave the gauge untouched.
    pub fn record(&self, outcome: Outcome, last_temperature: Option<f64>) {
        // ---
        let mut inner = self.lock_inner();

        inner.requests_total += 1;
        match outcome {
            Outcome::Success => inner.success_total += 1,
            Outcome::NetworkError => inner.network_error_total += 1,
            Outcome::NotFound => inner.not_found_total += 1,
            Outcome::ParseError => inner.parse_error_total += 1,
            Outcome::InvalidInput => inner.invalid_input_total += 1,
        }
        if let Some(value) = last_temperature {
            inner.last_temperature = Some(value);
        }
    }

    /// Take a consistent copy of the current state.
    pub fn snapshot(&self) -> MetricsSnapshot {
        self.lock_inner().clone()
    }

    fn lock_inner(&self) -> MutexGuard<'_, MetricsSnapshot> {
        // A poisoned lock only means another thread panicked while holding
        // it; the counters themselves are plain integers and stay usable.
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
