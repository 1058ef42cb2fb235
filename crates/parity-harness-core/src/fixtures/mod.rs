// crates/parity-harness-core/src/fixtures/mod.rs
// ============================================================================
// Module: Fixture Provisioning
// Description: Deterministic fixture rows and idempotent seeding.
// Purpose: Bring a backend store into a known state before a test runs.
// Dependencies: crate::fixtures::{model, policy, provisioner, store}
// ============================================================================

//! ## Overview
//! Fixtures are fixed-id rows (users, organizations, projects, documents,
//! chunks, memberships) that tests need before an endpoint can be exercised
//! meaningfully. Every write is an upsert governed by an [`UpsertPolicy`], so
//! applying the same fixture twice converges instead of duplicating.
//! Invariants:
//! - All statements are parameterized; values never appear in SQL text.
//! - The store is the source of truth for user ids once a natural-key
//!   collision occurs.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod model;
mod policy;
mod provisioner;
mod store;

// ============================================================================
// SECTION: Tests
// ============================================================================


// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use model::DEFAULT_ORG_ID;
pub use model::DEFAULT_PROJECT_ID;
pub use model::DefaultFixtures;
pub use model::MembershipRole;
pub use model::TestChunk;
pub use model::TestDocument;
pub use model::TestOrg;
pub use model::TestProject;
pub use model::TestUser;
pub use policy::CHUNKS;
pub use policy::DOCUMENTS;
pub use policy::ORG_MEMBERSHIPS;
pub use policy::ORGANIZATIONS;
pub use policy::ORGANIZATIONS_IF_ABSENT;
pub use policy::PROJECT_MEMBERSHIPS;
pub use policy::PROJECTS;
pub use policy::USERS;
pub use policy::UpsertPolicy;
pub use provisioner::FixtureProvisioner;
pub use provisioner::ProvisionError;
pub use store::FixtureStore;
pub use store::SqlValue;
pub use store::Statement;
pub use store::StoreError;
