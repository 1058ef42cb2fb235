// system-tests/tests/suites/live_backend.rs
// ============================================================================
// Module: Live Backend Tests
// Description: Harness control flow against a running backend.
// Purpose: Validate seeding and authorization outcomes on a real server.
// Dependencies: system-tests helpers
// ============================================================================

//! ## Overview
//! Seeds the backend's Postgres store, then drives its HTTP API with the
//! administrator and no-scope identities. Configuration comes from the
//! `PARITY_*` environment variables.

use parity_harness_client::RequestOption;
use parity_harness_core::MembershipRole;
use parity_harness_core::Role;
use system_tests::ParityHarness;

use crate::helpers;

type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Project-scoped listing route shared by both backends.
const PROJECT_ROUTE: &str = "/api/projects";

#[test]
fn seeding_is_idempotent_against_postgres() -> TestResult {
    helpers::logging::init();
    let harness = ParityHarness::from_env()?;
    let first = harness.seed_defaults()?;
    let second = harness.seed_defaults()?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn administrator_and_no_scope_diverge() -> TestResult {
    helpers::logging::init();
    let harness = ParityHarness::from_env()?;
    let fixtures = harness.seed_defaults()?;
    let project = RequestOption::project_id(fixtures.project_id);

    let admin = harness.client().get(PROJECT_ROUTE, &[
        harness.auth(&Role::Administrator.into())?,
        project.clone(),
    ])?;
    let no_scope = harness.client().get(PROJECT_ROUTE, &[
        harness.auth(&Role::NoScope.into())?,
        project,
    ])?;

    assert!(admin.is_success(), "administrator got {}", admin.status());
    assert!(!no_scope.is_success(), "no-scope got {}", no_scope.status());
    let summary = harness.metrics().summary();
    assert_eq!(summary.total_requests, 2);
    Ok(())
}

#[test]
fn dynamic_identity_is_recognized() -> TestResult {
    helpers::logging::init();
    let harness = ParityHarness::from_env()?;
    let fixtures = harness.seed_defaults()?;
    let suffix = format!("run-{}", uuid::Uuid::new_v4().simple());
    let (identity, user_id) = harness.provision_dynamic(&suffix)?;
    harness.provisioner().grant_project_membership(
        fixtures.project_id,
        user_id,
        MembershipRole::Member,
    )?;

    let response = harness.client().get(PROJECT_ROUTE, &[
        harness.auth(&identity)?,
        RequestOption::project_id(fixtures.project_id),
    ])?;
    assert!(response.is_success(), "dynamic identity got {}", response.status());
    Ok(())
}
