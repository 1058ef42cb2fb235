// system-tests/src/artifacts.rs
// ============================================================================
// Module: Run Artifacts
// Description: JSON artifacts summarizing a harness run.
// Purpose: Persist latency statistics for comparison across backends.
// Dependencies: parity-harness-core, serde_json
// ============================================================================

//! ## Overview
//! Writes a [`MetricsSummary`] as pretty JSON so two runs, one per backend,
//! can be diffed or asserted against after the fact.

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use parity_harness_core::BackendKind;
use parity_harness_core::MetricsSummary;

/// Writes `<dir>/<name>.<backend>.metrics.json` and returns its path.
///
/// # Errors
///
/// Returns an I/O error when the directory or file cannot be written.
pub fn write_metrics_summary(
    dir: &Path,
    name: &str,
    backend: BackendKind,
    summary: &MetricsSummary,
) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{name}.{backend}.metrics.json"));
    let json = serde_json::to_vec_pretty(summary).map_err(io::Error::other)?;
    fs::write(&path, json)?;
    Ok(path)
}

/// Reads a summary written by [`write_metrics_summary`].
///
/// # Errors
///
/// Returns an I/O error when the file is missing or not a summary.
pub fn read_metrics_summary(path: &Path) -> io::Result<MetricsSummary> {
    let bytes = fs::read(path)?;
    serde_json::from_slice(&bytes).map_err(io::Error::other)
}
