// crates/parity-harness-client/src/lib.rs
// ============================================================================
// Module: Parity Harness Client
// Description: Instrumented HTTP client for differential backend testing.
// Purpose: Issue requests against a backend and record their latency.
// Dependencies: parity-harness-core, reqwest, serde, url
// ============================================================================

//! ## Overview
//! [`HarnessClient`] issues one blocking HTTP request per call, applies
//! composable [`RequestOption`]s, and records a
//! [`parity_harness_core::RequestMetric`] for every request that receives an
//! HTTP response. Responses are wrapped in [`HarnessResponse`], whose body is
//! read from the transport at most once.
//!
//! Non-2xx statuses are ordinary responses here; only transport and
//! encoding failures surface as [`ClientError`].

// ============================================================================
// SECTION: Modules
// ============================================================================

mod client;
mod error;
mod options;
mod response;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use client::DEFAULT_POOL_MAX_IDLE_PER_HOST;
pub use client::DEFAULT_TIMEOUT;
pub use client::HarnessClient;
pub use client::HarnessClientConfig;
pub use error::ClientError;
pub use options::ORG_ID_HEADER;
pub use options::PROJECT_ID_HEADER;
pub use options::RequestOption;
pub use response::HarnessResponse;
pub use reqwest::Method;
pub use reqwest::StatusCode;
pub use reqwest::header::HeaderMap;
