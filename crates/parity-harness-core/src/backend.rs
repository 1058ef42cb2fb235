// crates/parity-harness-core/src/backend.rs
// ============================================================================
// Module: Backend Kind
// Description: Selector for the server implementation under test.
// Purpose: Parametrize identity mapping by backend without touching transport.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A [`BackendKind`] names which of the two server implementations a harness
//! instance targets. It only selects data (token tables); request mechanics
//! are identical for every backend.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Backend Kind
// ============================================================================

/// Server implementation under test.
///
/// # Invariants
/// - Variants are stable; their labels are the accepted configuration values.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// The established implementation whose behavior is the baseline.
    #[default]
    Reference,
    /// The new implementation being validated against the baseline.
    Candidate,
}

impl BackendKind {
    /// All backend kinds, in declaration order.
    pub const ALL: [Self; 2] = [Self::Reference, Self::Candidate];

    /// Returns the stable configuration label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reference => "reference",
            Self::Candidate => "candidate",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a backend label is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown backend kind: {0} (expected reference or candidate)")]
pub struct BackendKindParseError(pub String);

impl FromStr for BackendKind {
    type Err = BackendKindParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| BackendKindParseError(trimmed.to_string()))
    }
}
