// crates/parity-harness-core/src/metrics/tests.rs
// ============================================================================
// Module: Metrics Aggregator Unit Tests
// Description: Unit coverage for sample recording and statistics.
// Purpose: Pin the percentile rule and snapshot consistency.
// Dependencies: proptest
// ============================================================================

//! ## Overview
//! Unit coverage for [`super::MetricsAggregator`] statistics.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use proptest::prelude::*;

use super::MetricsAggregator;
use super::RequestMetric;
use super::percentile_of_sorted;

fn sample(status: u16, millis: u64) -> RequestMetric {
    RequestMetric::new("GET", "/api/things", status, Duration::from_millis(millis))
}

fn aggregator_with(millis: &[u64]) -> MetricsAggregator {
    let aggregator = MetricsAggregator::new();
    for value in millis {
        aggregator.record(sample(200, *value));
    }
    aggregator
}

#[test]
fn empty_summary_is_zero_valued() {
    let aggregator = MetricsAggregator::new();
    let summary = aggregator.summary();
    assert_eq!(summary.total_requests, 0);
    assert_eq!(summary.min, Duration::ZERO);
    assert_eq!(summary.max, Duration::ZERO);
    assert_eq!(summary.mean, Duration::ZERO);
    assert_eq!(summary.p50, Duration::ZERO);
    assert_eq!(summary.p95, Duration::ZERO);
    assert_eq!(summary.p99, Duration::ZERO);
    assert!(summary.by_status.is_empty());
    assert_eq!(aggregator.percentile(50.0), Duration::ZERO);
}

#[test]
fn percentile_truncates_rank() {
    // n = 10 → p50 index floor(9 * 0.5) = 4, p95 index floor(8.55) = 8.
    let aggregator = aggregator_with(&[10, 1, 9, 2, 8, 3, 7, 4, 6, 5]);
    assert_eq!(aggregator.percentile(50.0), Duration::from_millis(5));
    assert_eq!(aggregator.percentile(95.0), Duration::from_millis(9));
    assert_eq!(aggregator.percentile(99.0), Duration::from_millis(9));
    assert_eq!(aggregator.percentile(100.0), Duration::from_millis(10));
}

#[test]
fn percentile_clamps_out_of_range_arguments() {
    let aggregator = aggregator_with(&[3, 1, 2]);
    assert_eq!(aggregator.percentile(-5.0), Duration::from_millis(1));
    assert_eq!(aggregator.percentile(250.0), Duration::from_millis(3));
    assert_eq!(aggregator.percentile(f64::NAN), Duration::from_millis(1));
}

#[test]
fn single_sample_answers_every_percentile() {
    let aggregator = aggregator_with(&[42]);
    for p in [0.0, 1.0, 50.0, 99.9, 100.0] {
        assert_eq!(aggregator.percentile(p), Duration::from_millis(42));
    }
}

#[test]
fn summary_counts_by_status() {
    let aggregator = MetricsAggregator::new();
    aggregator.record(sample(200, 4));
    aggregator.record(sample(404, 2));
    aggregator.record(sample(200, 6));
    aggregator.record(sample(500, 8));

    let summary = aggregator.summary();
    assert_eq!(summary.total_requests, 4);
    assert_eq!(summary.min, Duration::from_millis(2));
    assert_eq!(summary.max, Duration::from_millis(8));
    assert_eq!(summary.mean, Duration::from_millis(5));
    assert_eq!(summary.p50, Duration::from_millis(4));
    assert_eq!(summary.by_status.get(&200), Some(&2));
    assert_eq!(summary.by_status.get(&404), Some(&1));
    assert_eq!(summary.by_status.get(&500), Some(&1));
}

#[test]
fn reset_starts_a_fresh_sequence() {
    let aggregator = aggregator_with(&[100, 200, 300]);
    aggregator.reset();
    assert_eq!(aggregator.count(), 0);

    aggregator.record(sample(201, 7));
    let summary = aggregator.summary();
    assert_eq!(summary.total_requests, 1);
    assert_eq!(summary.max, Duration::from_millis(7));
    assert_eq!(summary.by_status.len(), 1);
}

#[test]
fn snapshot_is_detached_from_later_records() {
    let aggregator = aggregator_with(&[1, 2]);
    let snapshot = aggregator.snapshot();
    aggregator.record(sample(200, 3));
    assert_eq!(snapshot.len(), 2);
    assert_eq!(aggregator.count(), 3);
}

#[test]
fn concurrent_records_are_not_lost() {
    let aggregator = Arc::new(MetricsAggregator::new());
    let handles: Vec<_> = (0..100_u64)
        .map(|worker| {
            let aggregator = Arc::clone(&aggregator);
            thread::spawn(move || {
                for i in 0..100_u64 {
                    aggregator.record(sample(200, worker + i));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("recorder thread");
    }
    assert_eq!(aggregator.count(), 10_000);
    assert_eq!(aggregator.summary().total_requests, 10_000);
}

#[test]
fn summary_survives_concurrent_reset() {
    let aggregator = Arc::new(MetricsAggregator::new());
    let writer = {
        let aggregator = Arc::clone(&aggregator);
        thread::spawn(move || {
            for i in 0..2_000_u64 {
                aggregator.record(sample(200, i % 50));
                if i % 250 == 0 {
                    aggregator.reset();
                }
            }
        })
    };
    for _ in 0..200 {
        let summary = aggregator.summary();
        let counted: usize = summary.by_status.values().sum();
        assert_eq!(counted, summary.total_requests);
        assert!(summary.min <= summary.p50);
        assert!(summary.p50 <= summary.max);
    }
    writer.join().expect("writer thread");
}

#[test]
fn percentile_of_empty_slice_is_zero() {
    assert_eq!(percentile_of_sorted(&[], 50.0), Duration::ZERO);
}

proptest! {
    #[test]
    fn extreme_percentiles_match_min_and_max(values in prop::collection::vec(0_u64..1_000_000, 1..200)) {
        let aggregator = aggregator_with(&values);
        let min = values.iter().copied().min().unwrap();
        let max = values.iter().copied().max().unwrap();
        prop_assert_eq!(aggregator.percentile(0.0), Duration::from_millis(min));
        prop_assert_eq!(aggregator.percentile(100.0), Duration::from_millis(max));
    }

    #[test]
    fn percentiles_are_monotonic(values in prop::collection::vec(0_u64..10_000, 1..100)) {
        let summary = aggregator_with(&values).summary();
        prop_assert!(summary.min <= summary.p50);
        prop_assert!(summary.p50 <= summary.p95);
        prop_assert!(summary.p95 <= summary.p99);
        prop_assert!(summary.p99 <= summary.max);
        prop_assert!(summary.min <= summary.mean && summary.mean <= summary.max);
    }
}
