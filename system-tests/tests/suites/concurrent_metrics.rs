// system-tests/tests/suites/concurrent_metrics.rs
// ============================================================================
// Module: Concurrent Metrics Tests
// Description: End-to-end latency accounting under concurrent requests.
// Purpose: Validate no lost samples and exact status breakdowns.
// Dependencies: system-tests helpers
// ============================================================================

//! ## Overview
//! Drives one shared [`HarnessClient`] from many threads against a mock
//! backend and checks the aggregated summary. Clients here keep no idle
//! connections: the mock answers each request on whichever worker picks it
//! up, and a reused keep-alive connection can stall behind a busy worker.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parity_harness_client::HarnessClient;
use parity_harness_client::HarnessClientConfig;
use parity_harness_client::RequestOption;
use parity_harness_core::BackendKind;
use parity_harness_core::MetricsAggregator;
use parity_harness_core::Role;
use system_tests::artifacts::read_metrics_summary;
use system_tests::artifacts::write_metrics_summary;
use tempfile::tempdir;

use crate::helpers;
use crate::helpers::mock_backend::MockBackend;

type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Builds settings for `backend` with connection reuse disabled.
fn unpooled(base_url: &str, backend: BackendKind) -> HarnessClientConfig {
    HarnessClientConfig::new(base_url, backend)
        .with_timeout(Duration::from_secs(10))
        .with_pool_max_idle_per_host(0)
}

/// Issues `count` GETs from `count` threads through one client.
fn concurrent_gets(client: &HarnessClient, count: usize) -> Result<Vec<u16>, String> {
    thread::scope(|scope| {
        let handles: Vec<_> = (0..count)
            .map(|i| {
                scope.spawn(move || {
                    let option = RequestOption::query("request", i.to_string());
                    client.get("/api/items", &[option]).map(|response| response.status().as_u16())
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .map_err(|_| "request thread panicked".to_string())?
                    .map_err(|err| err.to_string())
            })
            .collect()
    })
}

#[test]
fn fifty_concurrent_requests_split_by_status() -> TestResult {
    helpers::logging::init();
    let backend = MockBackend::start(8, |n| if n % 2 == 0 { 200 } else { 404 });
    let client = HarnessClient::with_config(unpooled(backend.base_url(), BackendKind::Reference))?;

    let statuses = concurrent_gets(&client, 50)?;

    assert_eq!(statuses.len(), 50);
    assert_eq!(backend.served(), 50);
    let summary = client.metrics().summary();
    assert_eq!(summary.total_requests, 50);
    assert_eq!(summary.by_status.get(&200), Some(&25));
    assert_eq!(summary.by_status.get(&404), Some(&25));
    assert_eq!(summary.by_status.len(), 2);
    assert!(summary.min <= summary.p50 && summary.p50 <= summary.p95);
    assert!(summary.p95 <= summary.p99 && summary.p99 <= summary.max);
    Ok(())
}

#[test]
fn summary_artifact_round_trips() -> TestResult {
    helpers::logging::init();
    let backend = MockBackend::start(2, |_| 200);
    let client = HarnessClient::with_config(unpooled(backend.base_url(), BackendKind::Candidate))?;
    let token = client.token_for(&Role::Administrator.into())?;
    for _ in 0..5 {
        client.get("/api/health", &[RequestOption::bearer(&token)])?;
    }

    let dir = tempdir()?;
    let summary = client.metrics().summary();
    let path = write_metrics_summary(dir.path(), "health", client.backend(), &summary)?;

    assert!(path.ends_with("health.candidate.metrics.json"));
    assert_eq!(read_metrics_summary(&path)?, summary);
    Ok(())
}

#[test]
fn backends_report_into_separate_or_shared_aggregators() -> TestResult {
    helpers::logging::init();
    let reference_backend = MockBackend::start(2, |_| 200);
    let candidate_backend = MockBackend::start(2, |_| 403);
    let shared = Arc::new(MetricsAggregator::new());
    let reference = HarnessClient::with_metrics(
        unpooled(reference_backend.base_url(), BackendKind::Reference),
        Arc::clone(&shared),
    )?;
    let candidate = HarnessClient::with_metrics(
        unpooled(candidate_backend.base_url(), BackendKind::Candidate),
        Arc::clone(&shared),
    )?;
    let isolated =
        HarnessClient::with_config(unpooled(candidate_backend.base_url(), BackendKind::Candidate))?;

    concurrent_gets(&reference, 10)?;
    concurrent_gets(&candidate, 10)?;
    concurrent_gets(&isolated, 4)?;

    let summary = shared.summary();
    assert_eq!(summary.total_requests, 20);
    assert_eq!(summary.by_status.get(&200), Some(&10));
    assert_eq!(summary.by_status.get(&403), Some(&10));
    assert_eq!(isolated.metrics().count(), 4);

    shared.reset();
    assert_eq!(reference.metrics().count(), 0);
    Ok(())
}
