// crates/parity-harness-store-sqlite/src/lib.rs
// ============================================================================
// Module: Parity Harness SQLite Store
// Description: Embedded SQLite implementation of the fixture store seam.
// Purpose: Run fixture provisioning without a live database server.
// Dependencies: parity-harness-core, rusqlite, thiserror, tracing, uuid
// ============================================================================

//! ## Overview
//! [`SqliteFixtureStore`] executes provisioning statements against an
//! embedded `SQLite` database carrying [`FIXTURE_SCHEMA`]. It is used for
//! local runs and for deterministic provisioning tests.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod schema;
mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use schema::FIXTURE_SCHEMA;
pub use schema::FIXTURE_TABLES;
pub use store::SqliteFixtureStore;
pub use store::SqliteStoreError;
