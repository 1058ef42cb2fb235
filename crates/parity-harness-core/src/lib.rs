// crates/parity-harness-core/src/lib.rs
// ============================================================================
// Module: Parity Harness Core Library
// Description: Public API surface for the parity harness core.
// Purpose: Expose metrics, identity mapping, and fixture provisioning.
// Dependencies: crate::{backend, fixtures, identity, metrics}
// ============================================================================

//! ## Overview
//! Parity harness core holds the pieces of the differential test harness that
//! carry real invariants: the thread-safe [`MetricsAggregator`], the
//! backend-aware [`IdentityMapper`], and the idempotent
//! [`FixtureProvisioner`]. Transport and storage are reached through seams
//! ([`FixtureStore`]) so the same provisioning logic runs against any backend
//! store.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod backend;
pub mod fixtures;
pub mod identity;
pub mod metrics;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use backend::BackendKind;
pub use backend::BackendKindParseError;
pub use fixtures::DEFAULT_ORG_ID;
pub use fixtures::DEFAULT_PROJECT_ID;
pub use fixtures::DefaultFixtures;
pub use fixtures::FixtureProvisioner;
pub use fixtures::FixtureStore;
pub use fixtures::MembershipRole;
pub use fixtures::ProvisionError;
pub use fixtures::SqlValue;
pub use fixtures::Statement;
pub use fixtures::StoreError;
pub use fixtures::TestChunk;
pub use fixtures::TestDocument;
pub use fixtures::TestOrg;
pub use fixtures::TestProject;
pub use fixtures::TestUser;
pub use fixtures::UpsertPolicy;
pub use identity::DynamicSuffix;
pub use identity::IDENTITY_CATALOG;
pub use identity::IdentityError;
pub use identity::IdentityMapper;
pub use identity::Role;
pub use identity::SymbolicIdentity;
pub use identity::TestIdentity;
pub use identity::TokenResolution;
pub use metrics::MetricsAggregator;
pub use metrics::MetricsSummary;
pub use metrics::RequestMetric;
