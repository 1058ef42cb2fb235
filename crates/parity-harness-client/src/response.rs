// crates/parity-harness-client/src/response.rs
// ============================================================================
// Module: Harness Response
// Description: Response wrapper with a lazy, read-once body.
// Purpose: Let callers inspect a body repeatedly without re-reading it.
// Dependencies: reqwest, serde, serde_json
// ============================================================================

//! ## Overview
//! [`HarnessResponse`] holds the status, headers and measured duration of a
//! completed request together with the unread body stream. The first body
//! accessor drains the stream and drops it; every accessor after that,
//! including one that races it from another thread, sees the cached result.
//! Invariants:
//! - The stream is read at most once.
//! - A read failure is cached like a successful read.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::io::Read;
use std::sync::Mutex;
use std::sync::OnceLock;
use std::sync::PoisonError;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;

use crate::error::ClientError;

// ============================================================================
// SECTION: Response
// ============================================================================

/// Unread body stream.
type BodyStream = Box<dyn Read + Send>;

/// Completed HTTP response with lazy body access.
pub struct HarnessResponse {
    /// Response status.
    status: StatusCode,
    /// Response headers.
    headers: HeaderMap,
    /// Time from just before send to just after the response arrived.
    duration: Duration,
    /// Materialized body, or the read failure.
    body: OnceLock<Result<Vec<u8>, String>>,
    /// Stream consumed by the first body access.
    stream: Mutex<Option<BodyStream>>,
}

impl HarnessResponse {
    /// Wraps a response whose body is still held by `reader`.
    pub fn from_reader<R>(status: StatusCode, headers: HeaderMap, duration: Duration, reader: R) -> Self
    where
        R: Read + Send + 'static,
    {
        Self {
            status,
            headers,
            duration,
            body: OnceLock::new(),
            stream: Mutex::new(Some(Box::new(reader))),
        }
    }

    /// Returns the response status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the response headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the measured request duration.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Returns true when the status is in `[200, 300)`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns the body bytes, reading the stream on first use.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Body`] when the stream failed to read.
    pub fn body(&self) -> Result<&[u8], ClientError> {
        self.body
            .get_or_init(|| self.materialize())
            .as_deref()
            .map_err(|reason| ClientError::Body(reason.clone()))
    }

    /// Returns the body as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the body cannot be read or is not UTF-8.
    pub fn body_string(&self) -> Result<String, ClientError> {
        let bytes = self.body()?;
        String::from_utf8(bytes.to_vec()).map_err(|err| ClientError::Decode(err.to_string()))
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the body cannot be read or decoded.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        let bytes = self.body()?;
        serde_json::from_slice(bytes).map_err(|err| ClientError::Decode(err.to_string()))
    }

    /// Drains and drops the stream.
    fn materialize(&self) -> Result<Vec<u8>, String> {
        let taken = self.stream.lock().unwrap_or_else(PoisonError::into_inner).take();
        let Some(mut stream) = taken else {
            return Err("response body stream already consumed".to_string());
        };
        let mut buf = Vec::new();
        let result = stream.read_to_end(&mut buf).map(|_| buf).map_err(|err| err.to_string());
        drop(stream);
        result
    }
}

impl fmt::Debug for HarnessResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HarnessResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("duration", &self.duration)
            .field("materialized", &self.body.get().is_some())
            .finish_non_exhaustive()
    }
}
