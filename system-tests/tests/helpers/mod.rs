// system-tests/tests/helpers/mod.rs
// ============================================================================
// Module: System Test Helpers
// Description: Shared helpers for parity harness system-tests.
// Purpose: Provide mock backends, logging setup, and artifact roots.
// Dependencies: system-tests, tiny_http, tracing-subscriber
// ============================================================================

//! ## Overview
//! Shared helpers for parity harness system-tests.
//! Invariants:
//! - Mock backends bind ephemeral loopback ports only.
//! - Logging is installed at most once per test binary.

#![allow(dead_code, reason = "Shared helpers are reused across multiple test suites.")]

pub mod logging;
pub mod mock_backend;
