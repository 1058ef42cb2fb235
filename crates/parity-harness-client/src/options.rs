// crates/parity-harness-client/src/options.rs
// ============================================================================
// Module: Request Options
// Description: Composable per-request header and query parameter options.
// Purpose: Let callers shape a request without touching the transport.
// Dependencies: reqwest
// ============================================================================

//! ## Overview
//! A request takes any number of [`RequestOption`]s. Options are applied in
//! order; for a given header name or query key the last option wins.
//! Query parameters are emitted in sorted key order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt::Display;

use reqwest::header::AUTHORIZATION;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;

use crate::error::ClientError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Header selecting the active project.
pub const PROJECT_ID_HEADER: &str = "X-Project-ID";
/// Header selecting the active organization.
pub const ORG_ID_HEADER: &str = "X-Org-ID";

// ============================================================================
// SECTION: Options
// ============================================================================

/// One request customization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOption {
    /// Sets a single header.
    Header {
        /// Header name.
        name: String,
        /// Header value.
        value: String,
    },
    /// Sets several headers, applied in key order.
    Headers(BTreeMap<String, String>),
    /// Sets a single query parameter.
    Query {
        /// Parameter key.
        key: String,
        /// Parameter value.
        value: String,
    },
    /// Sets several query parameters.
    QueryParams(BTreeMap<String, String>),
}

impl RequestOption {
    /// Sets header `name` to `value`.
    #[must_use]
    pub fn header(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Header {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Sets query parameter `key` to `value`.
    #[must_use]
    pub fn query(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Query {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Sets `Authorization: Bearer <token>`.
    #[must_use]
    pub fn bearer(token: &str) -> Self {
        Self::header(AUTHORIZATION.as_str(), format!("Bearer {token}"))
    }

    /// Scopes the request to a project.
    #[must_use]
    pub fn project_id(id: impl Display) -> Self {
        Self::header(PROJECT_ID_HEADER, id.to_string())
    }

    /// Scopes the request to an organization.
    #[must_use]
    pub fn org_id(id: impl Display) -> Self {
        Self::header(ORG_ID_HEADER, id.to_string())
    }
}

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Headers and query parameters after every option has been applied.
#[derive(Debug, Default)]
pub(crate) struct ResolvedOptions {
    /// Final header set.
    pub(crate) headers: HeaderMap,
    /// Final query parameters in key order.
    pub(crate) query: BTreeMap<String, String>,
}

impl ResolvedOptions {
    /// Applies `options` in order on top of `headers`.
    pub(crate) fn resolve(
        headers: HeaderMap,
        options: &[RequestOption],
    ) -> Result<Self, ClientError> {
        let mut resolved = Self {
            headers,
            query: BTreeMap::new(),
        };
        for option in options {
            match option {
                RequestOption::Header {
                    name,
                    value,
                } => resolved.set_header(name, value)?,
                RequestOption::Headers(map) => {
                    for (name, value) in map {
                        resolved.set_header(name, value)?;
                    }
                }
                RequestOption::Query {
                    key,
                    value,
                } => {
                    resolved.query.insert(key.clone(), value.clone());
                }
                RequestOption::QueryParams(map) => {
                    resolved.query.extend(map.iter().map(|(k, v)| (k.clone(), v.clone())));
                }
            }
        }
        Ok(resolved)
    }

    /// Replaces any existing value for `name`.
    fn set_header(&mut self, name: &str, value: &str) -> Result<(), ClientError> {
        let invalid = |reason: String| ClientError::InvalidHeader {
            name: name.to_string(),
            reason,
        };
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|err| invalid(err.to_string()))?;
        let header_value = HeaderValue::from_str(value).map_err(|err| invalid(err.to_string()))?;
        self.headers.insert(header_name, header_value);
        Ok(())
    }
}
