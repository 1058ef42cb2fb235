// crates/parity-harness-config/src/lib.rs
// ============================================================================
// Module: Parity Harness Configuration
// Description: Typed harness settings loaded from environment variables.
// Purpose: Tell a test run which backend to hit and which store to seed.
// Dependencies: parity-harness-core, thiserror, url
// ============================================================================

//! ## Overview
//! [`HarnessConfig`] is read from `PARITY_*` environment variables, each
//! falling back to a local development default when unset. Values are
//! parsed with strict UTF-8 enforcement; invalid or empty values fail
//! closed rather than silently reverting to defaults.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod database;
mod env;

// ============================================================================
// SECTION: Tests
// ============================================================================


// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use database::DatabaseConfig;
pub use env::ConfigError;
pub use env::HarnessConfig;
pub use env::HarnessEnv;
pub use env::read_env_strict;
