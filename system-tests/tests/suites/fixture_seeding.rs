// system-tests/tests/suites/fixture_seeding.rs
// ============================================================================
// Module: Fixture Seeding Tests
// Description: End-to-end default fixture seeding on an embedded store.
// Purpose: Validate convergence of repeated seeding runs.
// Dependencies: system-tests helpers
// ============================================================================

//! ## Overview
//! Seeds the default fixture set through [`ParityHarness`] and inspects the
//! store between runs.

use parity_harness_config::HarnessConfig;
use parity_harness_core::IDENTITY_CATALOG;
use parity_harness_core::MembershipRole;
use parity_harness_core::Role;
use parity_harness_core::TestUser;
use parity_harness_store_sqlite::SqliteFixtureStore;
use system_tests::ParityHarness;
use tempfile::tempdir;
use uuid::Uuid;

use crate::helpers;

type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Reads one membership role, keyed by `(entity, user)`.
fn membership_role(
    store: &SqliteFixtureStore,
    table: &str,
    entity_column: &str,
    entity_id: Uuid,
    user_id: Uuid,
) -> Result<String, Box<dyn std::error::Error>> {
    let sql = format!("SELECT role FROM {table} WHERE {entity_column} = ?1 AND user_id = ?2");
    Ok(store.with_connection(|conn| {
        conn.query_row(&sql, [entity_id.to_string(), user_id.to_string()], |row| row.get(0))
    })?)
}

/// Returns row counts for every fixture table touched by default seeding.
fn seeded_counts(store: &SqliteFixtureStore) -> Result<Vec<u64>, Box<dyn std::error::Error>> {
    let tables = ["users", "organizations", "projects", "project_memberships", "organization_memberships"];
    let mut counts = Vec::with_capacity(tables.len());
    for table in tables {
        counts.push(store.count_rows(table)?);
    }
    Ok(counts)
}

#[test]
fn seeding_twice_converges() -> TestResult {
    helpers::logging::init();
    let dir = tempdir()?;
    let store = SqliteFixtureStore::open(&dir.path().join("fixtures.sqlite"))?;
    let harness = ParityHarness::new(HarnessConfig::default(), store)?;

    let first = harness.seed_defaults()?;
    let store = harness.provisioner().store();
    let counts_after_first = seeded_counts(store)?;
    let second = harness.seed_defaults()?;
    let counts_after_second = seeded_counts(store)?;

    assert_eq!(first, second);
    assert_eq!(counts_after_first, vec![6, 1, 1, 1, 1]);
    assert_eq!(counts_after_second, counts_after_first);
    let project_role = membership_role(
        store,
        "project_memberships",
        "project_id",
        second.project_id,
        second.admin_user_id,
    )?;
    let org_role = membership_role(
        store,
        "organization_memberships",
        "organization_id",
        second.organization_id,
        second.admin_user_id,
    )?;
    assert_eq!(project_role, "owner");
    assert_eq!(org_role, "admin");
    Ok(())
}

#[test]
fn seeding_adopts_preexisting_admin_row() -> TestResult {
    helpers::logging::init();
    let harness = ParityHarness::in_memory(HarnessConfig::default())?;
    let admin = IDENTITY_CATALOG
        .iter()
        .find(|identity| identity.role == Role::Administrator)
        .ok_or("catalog has no administrator")?;
    let legacy_id = Uuid::from_u128(0x00ad_0000);
    let legacy = TestUser {
        id: legacy_id,
        ..admin.user()
    };
    harness.provisioner().provision_user(&legacy)?;

    let fixtures = harness.seed_defaults()?;

    assert_eq!(fixtures.admin_user_id, legacy_id);
    assert_ne!(legacy_id, admin.id);
    let store = harness.provisioner().store();
    let role = membership_role(
        store,
        "project_memberships",
        "project_id",
        fixtures.project_id,
        legacy_id,
    )?;
    assert_eq!(role, "owner");
    assert_eq!(store.count_rows("users")?, 6);
    Ok(())
}

#[test]
fn seeding_restores_a_downgraded_owner() -> TestResult {
    helpers::logging::init();
    let harness = ParityHarness::in_memory(HarnessConfig::default())?;
    let fixtures = harness.seed_defaults()?;
    harness.provisioner().grant_project_membership(
        fixtures.project_id,
        fixtures.admin_user_id,
        MembershipRole::Viewer,
    )?;

    harness.seed_defaults()?;

    let role = membership_role(
        harness.provisioner().store(),
        "project_memberships",
        "project_id",
        fixtures.project_id,
        fixtures.admin_user_id,
    )?;
    assert_eq!(role, "owner");
    Ok(())
}
