// crates/parity-harness-client/src/client.rs
// ============================================================================
// Module: Harness Client
// Description: Blocking HTTP client that records per-request metrics.
// Purpose: Exercise a backend under test and capture its latency envelope.
// Dependencies: parity-harness-core, reqwest, serde_json, time, tracing, url
// ============================================================================

//! ## Overview
//! Every verb funnels through one request path: default JSON content
//! negotiation headers, then caller options, then the optional JSON body.
//! The network call is timed from just before send to just after the
//! response arrives.
//! Invariants:
//! - Each request that yields an HTTP response records exactly one metric,
//!   whatever its status.
//! - Requests failing before a response record nothing.
//! - Body serialization failures return before any request is sent.
//! - No lock is held across network I/O.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use parity_harness_core::BackendKind;
use parity_harness_core::IdentityError;
use parity_harness_core::IdentityMapper;
use parity_harness_core::MetricsAggregator;
use parity_harness_core::RequestMetric;
use parity_harness_core::SymbolicIdentity;
use reqwest::Method;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use reqwest::header::CONTENT_TYPE;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::debug;
use tracing::warn;
use url::Url;

use crate::error::ClientError;
use crate::options::RequestOption;
use crate::options::ResolvedOptions;
use crate::response::HarnessResponse;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default idle connections kept per host.
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 32;

/// Media type used for content negotiation.
const JSON_MEDIA_TYPE: &str = "application/json";

/// Client construction settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessClientConfig {
    /// Base address every request path is appended to.
    pub base_url: String,
    /// Backend under test; selects the identity token table.
    pub backend: BackendKind,
    /// Per-request timeout; a stalled call fails as a transport error.
    pub timeout: Duration,
    /// Idle connections kept per host for reuse.
    pub pool_max_idle_per_host: usize,
}

impl HarnessClientConfig {
    /// Creates settings with the default timeout and pool size.
    #[must_use]
    pub fn new(base_url: impl Into<String>, backend: BackendKind) -> Self {
        Self {
            base_url: base_url.into(),
            backend,
            timeout: DEFAULT_TIMEOUT,
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
        }
    }

    /// Overrides the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the idle connections kept per host; zero disables reuse.
    #[must_use]
    pub const fn with_pool_max_idle_per_host(mut self, max_idle: usize) -> Self {
        self.pool_max_idle_per_host = max_idle;
        self
    }
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Instrumented HTTP client bound to one backend.
#[derive(Debug, Clone)]
pub struct HarnessClient {
    /// Pooled blocking transport.
    http: Client,
    /// Validated base address without a trailing slash.
    base_url: String,
    /// Token table for the configured backend.
    identities: IdentityMapper,
    /// Aggregator receiving one metric per completed request.
    metrics: Arc<MetricsAggregator>,
}

impl HarnessClient {
    /// Creates a client with default settings and a fresh aggregator.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the base URL is invalid or the transport
    /// cannot be built.
    pub fn new(base_url: &str, backend: BackendKind) -> Result<Self, ClientError> {
        Self::with_config(HarnessClientConfig::new(base_url, backend))
    }

    /// Creates a client from explicit settings and a fresh aggregator.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the base URL is invalid or the transport
    /// cannot be built.
    pub fn with_config(config: HarnessClientConfig) -> Result<Self, ClientError> {
        Self::with_metrics(config, Arc::new(MetricsAggregator::new()))
    }

    /// Creates a client reporting into an existing aggregator.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the base URL is invalid or the transport
    /// cannot be built.
    pub fn with_metrics(
        config: HarnessClientConfig,
        metrics: Arc<MetricsAggregator>,
    ) -> Result<Self, ClientError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|err| ClientError::InvalidUrl(format!("{base_url}: {err}")))?;
        let http = Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .build()
            .map_err(|err| ClientError::Build(err.to_string()))?;
        Ok(Self {
            http,
            base_url,
            identities: IdentityMapper::new(config.backend),
            metrics,
        })
    }

    /// Returns the backend this client targets.
    #[must_use]
    pub const fn backend(&self) -> BackendKind {
        self.identities.backend()
    }

    /// Returns the base address.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the shared aggregator.
    #[must_use]
    pub const fn metrics(&self) -> &Arc<MetricsAggregator> {
        &self.metrics
    }

    /// Resolves a symbolic identity to this backend's bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError`] when the identity has no token here.
    pub fn token_for(&self, identity: &SymbolicIdentity) -> Result<String, IdentityError> {
        self.identities.token(identity)
    }

    // ------------------------------------------------------------------------
    // Verbs
    // ------------------------------------------------------------------------

    /// Sends `GET path`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when no HTTP response is received.
    pub fn get(&self, path: &str, options: &[RequestOption]) -> Result<HarnessResponse, ClientError> {
        self.send(Method::GET, path, None, options)
    }

    /// Sends `POST path` with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the body cannot be encoded or no HTTP
    /// response is received.
    pub fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
        options: &[RequestOption],
    ) -> Result<HarnessResponse, ClientError> {
        self.request(Method::POST, path, Some(body), options)
    }

    /// Sends `PUT path` with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the body cannot be encoded or no HTTP
    /// response is received.
    pub fn put<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
        options: &[RequestOption],
    ) -> Result<HarnessResponse, ClientError> {
        self.request(Method::PUT, path, Some(body), options)
    }

    /// Sends `PATCH path` with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the body cannot be encoded or no HTTP
    /// response is received.
    pub fn patch<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
        options: &[RequestOption],
    ) -> Result<HarnessResponse, ClientError> {
        self.request(Method::PATCH, path, Some(body), options)
    }

    /// Sends `DELETE path`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when no HTTP response is received.
    pub fn delete(
        &self,
        path: &str,
        options: &[RequestOption],
    ) -> Result<HarnessResponse, ClientError> {
        self.send(Method::DELETE, path, None, options)
    }

    /// Sends `DELETE path` with a JSON body, as used by bulk deletes.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the body cannot be encoded or no HTTP
    /// response is received.
    pub fn delete_with_body<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
        options: &[RequestOption],
    ) -> Result<HarnessResponse, ClientError> {
        self.request(Method::DELETE, path, Some(body), options)
    }

    /// Sends an arbitrary method with an optional JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the body cannot be encoded or no HTTP
    /// response is received.
    pub fn request<T: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&T>,
        options: &[RequestOption],
    ) -> Result<HarnessResponse, ClientError> {
        let encoded = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|err| ClientError::Serialize(err.to_string()))?;
        self.send(method, path, encoded, options)
    }

    // ------------------------------------------------------------------------
    // Request path
    // ------------------------------------------------------------------------

    /// Builds, sends, times and records one request.
    fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
        options: &[RequestOption],
    ) -> Result<HarnessResponse, ClientError> {
        let resolved = ResolvedOptions::resolve(default_headers(), options)?;
        let url = self.url_for(path, &resolved.query)?;
        let mut request = self.http.request(method.clone(), url).headers(resolved.headers);
        if let Some(body) = body {
            request = request.body(body);
        }

        let started_at = OffsetDateTime::now_utc();
        let start = Instant::now();
        let outcome = request.send();
        let duration = start.elapsed();

        let response = outcome.map_err(|err| {
            warn!(%method, path, elapsed_ms = duration.as_millis(), error = %err, "request failed before a response");
            ClientError::Transport {
                method: method.to_string(),
                path: path.to_string(),
                reason: err.to_string(),
            }
        })?;
        let status = response.status();
        self.metrics.record(
            RequestMetric::new(method.as_str(), path, status.as_u16(), duration)
                .started_at(started_at),
        );
        debug!(%method, path, status = status.as_u16(), elapsed_ms = duration.as_millis(), "request completed");

        let headers = response.headers().clone();
        Ok(HarnessResponse::from_reader(status, headers, duration, response))
    }

    /// Appends `path` to the base address and adds query parameters.
    fn url_for(&self, path: &str, query: &BTreeMap<String, String>) -> Result<Url, ClientError> {
        let joined = if path.starts_with('/') || path.is_empty() {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        };
        let mut url =
            Url::parse(&joined).map_err(|err| ClientError::InvalidUrl(format!("{joined}: {err}")))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter());
        }
        Ok(url)
    }
}

/// Content negotiation headers applied before caller options.
fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_MEDIA_TYPE));
    headers.insert(ACCEPT, HeaderValue::from_static(JSON_MEDIA_TYPE));
    headers
}
