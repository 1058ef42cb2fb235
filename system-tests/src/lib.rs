// system-tests/src/lib.rs
// ============================================================================
// Module: Parity Harness System Tests Library
// Description: Harness facade shared by the system-test binaries.
// Purpose: Wire configuration, fixtures, identities and the client together.
// Dependencies: parity-harness-*
// ============================================================================

//! ## Overview
//! [`ParityHarness`] follows the harness control flow: load configuration,
//! provision fixtures through a store, resolve a token for the desired role,
//! then drive the instrumented client. One metrics aggregator spans the
//! whole run.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod artifacts;
pub mod harness;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use harness::HarnessError;
pub use harness::ParityHarness;
