// crates/parity-harness-store-postgres/src/lib.rs
// ============================================================================
// Module: Parity Harness Postgres Store
// Description: Pooled Postgres implementation of the fixture store seam.
// Purpose: Provision fixtures directly in a backend's relational store.
// Dependencies: parity-harness-core, postgres, r2d2, r2d2_postgres
// ============================================================================

//! ## Overview
//! [`PostgresFixtureStore`] runs provisioning statements over an `r2d2`
//! connection pool. The fixture schema is owned by the backend under test;
//! this crate only issues parameterized statements against it.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod postgres_store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use postgres_store::PostgresFixtureStore;
pub use postgres_store::PostgresStoreConfig;
pub use postgres_store::PostgresStoreError;
