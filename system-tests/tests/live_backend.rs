// system-tests/tests/live_backend.rs
// ============================================================================
// Module: Live Backend Suite
// Description: Aggregates tests that need a running backend and store.
// Purpose: Exercise a real server configured through `PARITY_*` variables.
// Dependencies: suites/*, helpers
// ============================================================================

//! ## Overview
//! Aggregates live backend system tests into one binary. Requires the
//! `live-backend` feature, a reachable backend at `PARITY_BASE_URL`, and its
//! Postgres store at `PARITY_DB_*`.

mod helpers;

#[path = "suites/live_backend.rs"]
mod live_backend;
