// crates/parity-harness-core/src/metrics.rs
// ============================================================================
// Module: Request Metrics Aggregator
// Description: Thread-safe recorder of per-request timing samples.
// Purpose: Accumulate latency data across a run and summarize it on demand.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! [`MetricsAggregator`] collects [`RequestMetric`] samples from any number of
//! concurrent callers and answers statistical queries over a snapshot.
//! Invariants:
//! - Samples are append-only; only [`MetricsAggregator::reset`] removes them.
//! - The lock is held only to append or to copy; queries never sort or scan
//!   the live sequence.
//! - Every statistic in a [`MetricsSummary`] comes from one snapshot.
//! - No operation fails; absence of data yields zero-valued results.
//!
//! ## Percentile rule
//! Percentiles use truncating nearest-rank selection: over `n` ascending
//! durations the `p`-th percentile is the element at index
//! `floor((n - 1) * p / 100)`, clamped to `[0, n - 1]`. There is no
//! interpolation, so `p = 0` is the minimum and `p = 100` the maximum. Linear
//! interpolation would give different numbers for the same samples.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;

// ============================================================================
// SECTION: Request Metric
// ============================================================================

/// Timing sample for one completed request.
///
/// # Invariants
/// - Immutable once recorded.
/// - `status` is the HTTP status actually received; requests that never
///   received a response are not represented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestMetric {
    /// HTTP method (uppercase).
    pub method: String,
    /// Request path relative to the base address.
    pub path: String,
    /// HTTP status code received.
    pub status: u16,
    /// Round-trip duration measured around the network call.
    pub duration: Duration,
    /// Wall-clock time the request was started.
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
}

impl RequestMetric {
    /// Builds a metric stamped with the current wall-clock start time.
    #[must_use]
    pub fn new(
        method: impl Into<String>,
        path: impl Into<String>,
        status: u16,
        duration: Duration,
    ) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            status,
            duration,
            started_at: OffsetDateTime::now_utc(),
        }
    }

    /// Overrides the recorded start time.
    #[must_use]
    pub const fn started_at(mut self, started_at: OffsetDateTime) -> Self {
        self.started_at = started_at;
        self
    }
}

// ============================================================================
// SECTION: Summary
// ============================================================================

/// Summary statistics over one consistent snapshot of samples.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSummary {
    /// Number of samples in the snapshot.
    pub total_requests: usize,
    /// Smallest duration.
    pub min: Duration,
    /// Largest duration.
    pub max: Duration,
    /// Arithmetic mean duration (truncated to whole nanoseconds).
    pub mean: Duration,
    /// 50th percentile.
    pub p50: Duration,
    /// 95th percentile.
    pub p95: Duration,
    /// 99th percentile.
    pub p99: Duration,
    /// Sample count per HTTP status code.
    pub by_status: BTreeMap<u16, usize>,
}

// ============================================================================
// SECTION: Aggregator
// ============================================================================

/// Thread-safe, append-only store of request metrics.
///
/// Share it between threads with `Arc`; every method takes `&self`.
#[derive(Debug, Default)]
pub struct MetricsAggregator {
    /// Recorded samples in arrival order.
    samples: Mutex<Vec<RequestMetric>>,
}

impl MetricsAggregator {
    /// Creates an empty aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one sample.
    pub fn record(&self, metric: RequestMetric) {
        self.lock().push(metric);
    }

    /// Discards all samples.
    pub fn reset(&self) {
        self.lock().clear();
    }

    /// Returns the number of recorded samples.
    #[must_use]
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    /// Returns a copy of every recorded sample in arrival order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<RequestMetric> {
        self.lock().clone()
    }

    /// Returns the `p`-th percentile duration using truncating nearest-rank.
    ///
    /// `p` is clamped to `[0, 100]`; `NaN` is treated as zero. Returns
    /// [`Duration::ZERO`] when no samples exist.
    #[must_use]
    pub fn percentile(&self, p: f64) -> Duration {
        let mut durations = self.durations();
        durations.sort_unstable();
        percentile_of_sorted(&durations, p)
    }

    /// Returns summary statistics computed from a single snapshot.
    #[must_use]
    pub fn summary(&self) -> MetricsSummary {
        let snapshot = self.snapshot();
        summarize(&snapshot)
    }

    /// Copies the durations under the lock.
    fn durations(&self) -> Vec<Duration> {
        self.lock().iter().map(|metric| metric.duration).collect()
    }

    /// Acquires the sample lock, recovering from poisoning.
    fn lock(&self) -> MutexGuard<'_, Vec<RequestMetric>> {
        self.samples.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ============================================================================
// SECTION: Statistics
// ============================================================================

/// Computes a [`MetricsSummary`] over a snapshot.
fn summarize(snapshot: &[RequestMetric]) -> MetricsSummary {
    if snapshot.is_empty() {
        return MetricsSummary::default();
    }
    let mut durations: Vec<Duration> = snapshot.iter().map(|metric| metric.duration).collect();
    durations.sort_unstable();

    let mut by_status = BTreeMap::new();
    for metric in snapshot {
        *by_status.entry(metric.status).or_insert(0_usize) += 1;
    }

    MetricsSummary {
        total_requests: durations.len(),
        min: durations.first().copied().unwrap_or_default(),
        max: durations.last().copied().unwrap_or_default(),
        mean: mean_of(&durations),
        p50: percentile_of_sorted(&durations, 50.0),
        p95: percentile_of_sorted(&durations, 95.0),
        p99: percentile_of_sorted(&durations, 99.0),
        by_status,
    }
}

/// Selects the truncating nearest-rank percentile from ascending durations.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "Rank is floored and clamped to the sample range before indexing."
)]
pub(crate) fn percentile_of_sorted(sorted: &[Duration], p: f64) -> Duration {
    let Some(last) = sorted.len().checked_sub(1) else {
        return Duration::ZERO;
    };
    let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 100.0) };
    let rank = (last as f64 * p / 100.0).floor() as usize;
    sorted.get(rank.min(last)).copied().unwrap_or_default()
}

/// Returns the arithmetic mean of the durations.
fn mean_of(durations: &[Duration]) -> Duration {
    if durations.is_empty() {
        return Duration::ZERO;
    }
    let total: u128 = durations.iter().map(Duration::as_nanos).sum();
    let count = u128::try_from(durations.len()).unwrap_or(u128::MAX);
    let mean = total / count;
    Duration::from_nanos(u64::try_from(mean).unwrap_or(u64::MAX))
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
