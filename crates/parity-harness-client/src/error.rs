// crates/parity-harness-client/src/error.rs
// ============================================================================
// Module: Client Errors
// Description: Failure classes surfaced by the instrumented client.
// Purpose: Separate transport and encoding failures from HTTP statuses.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! [`ClientError`] covers failures that prevent a request from producing an
//! HTTP response, or a response body from being used. HTTP error statuses
//! are never represented here.

use thiserror::Error;

/// Instrumented client errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Base URL or request path could not form a valid URL.
    #[error("invalid request url: {0}")]
    InvalidUrl(String),
    /// A header option carried an invalid name or value.
    #[error("invalid header {name}: {reason}")]
    InvalidHeader {
        /// Header name as supplied.
        name: String,
        /// Validation failure.
        reason: String,
    },
    /// Request body could not be encoded as JSON; no request was sent.
    #[error("request body serialization failed: {0}")]
    Serialize(String),
    /// No HTTP response was received (connect, DNS, or timeout failure).
    #[error("{method} {path} failed before a response: {reason}")]
    Transport {
        /// Request method.
        method: String,
        /// Request path relative to the base URL.
        path: String,
        /// Transport failure description.
        reason: String,
    },
    /// Response body stream failed while being read.
    #[error("response body read failed: {0}")]
    Body(String),
    /// Response body was not valid for the requested decoding.
    #[error("response body decode failed: {0}")]
    Decode(String),
    /// Underlying HTTP client could not be constructed.
    #[error("http client build failed: {0}")]
    Build(String),
}
