// system-tests/tests/helpers/logging.rs
// ============================================================================
// Module: Test Logging
// Description: One-time tracing subscriber installation for test binaries.
// Purpose: Surface harness diagnostics through the test output capture.
// Dependencies: tracing-subscriber
// ============================================================================

use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Installs a test-writer subscriber honoring `RUST_LOG` (default `info`).
pub fn init() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().try_init();
    });
}
