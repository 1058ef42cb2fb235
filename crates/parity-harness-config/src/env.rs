// crates/parity-harness-config/src/env.rs
// ============================================================================
// Module: Harness Environment
// Description: Environment-backed configuration for harness runs.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: parity-harness-core, thiserror
// ============================================================================

//! ## Overview
//! Each [`HarnessEnv`] key has a documented default. A set value must be
//! valid UTF-8, non-empty, and parse for its type; otherwise loading fails.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::ffi::OsString;
use std::str::FromStr;
use std::time::Duration;

use parity_harness_core::BackendKind;
use thiserror::Error;

use crate::database::DatabaseConfig;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment keys for harness configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessEnv {
    /// Base URL of the backend under test.
    BaseUrl,
    /// Backend kind (`reference` or `candidate`).
    Backend,
    /// Per-request timeout in seconds (positive integer).
    TimeoutSeconds,
    /// Store host.
    DbHost,
    /// Store port.
    DbPort,
    /// Store user.
    DbUser,
    /// Store password.
    DbPassword,
    /// Store database name.
    DbName,
}

impl HarnessEnv {
    /// Every key, in load order.
    pub const ALL: [Self; 8] = [
        Self::BaseUrl,
        Self::Backend,
        Self::TimeoutSeconds,
        Self::DbHost,
        Self::DbPort,
        Self::DbUser,
        Self::DbPassword,
        Self::DbName,
    ];

    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BaseUrl => "PARITY_BASE_URL",
            Self::Backend => "PARITY_BACKEND",
            Self::TimeoutSeconds => "PARITY_TIMEOUT_SEC",
            Self::DbHost => "PARITY_DB_HOST",
            Self::DbPort => "PARITY_DB_PORT",
            Self::DbUser => "PARITY_DB_USER",
            Self::DbPassword => "PARITY_DB_PASSWORD",
            Self::DbName => "PARITY_DB_NAME",
        }
    }

    /// Returns the value used when the variable is unset.
    #[must_use]
    pub const fn default_value(self) -> &'static str {
        match self {
            Self::BaseUrl => "http://localhost:3002",
            Self::Backend => "reference",
            Self::TimeoutSeconds => "30",
            Self::DbHost => "localhost",
            Self::DbPort => "5432",
            Self::DbUser | Self::DbPassword => "postgres",
            Self::DbName => "parity_test",
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Variable is set but not valid UTF-8.
    #[error("{0} must be valid UTF-8")]
    InvalidUtf8(String),
    /// Variable is set but empty or whitespace.
    #[error("{0} must not be empty")]
    Empty(String),
    /// Variable failed type-specific validation.
    #[error("{name} is invalid: {reason}")]
    Invalid {
        /// Variable name.
        name: String,
        /// Validation failure.
        reason: String,
    },
}

impl ConfigError {
    /// Builds an [`ConfigError::Invalid`] for `key`.
    pub(crate) fn invalid(key: HarnessEnv, reason: impl Into<String>) -> Self {
        Self::Invalid {
            name: key.as_str().to_string(),
            reason: reason.into(),
        }
    }
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Typed harness configuration derived from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Base URL of the backend under test.
    pub base_url: String,
    /// Backend under test.
    pub backend: BackendKind,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Fixture store location.
    pub database: DatabaseConfig,
}

impl HarnessConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a set value is not valid UTF-8, is empty,
    /// or fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(process_env)
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a set value is not valid UTF-8, is empty,
    /// or fails validation.
    pub fn load_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let read = |key: HarnessEnv| -> Result<String, ConfigError> {
            Ok(read_nonempty(key.as_str(), lookup(key.as_str()))?
                .unwrap_or_else(|| key.default_value().to_string()))
        };

        let base_url = read(HarnessEnv::BaseUrl)?;
        url::Url::parse(&base_url)
            .map_err(|err| ConfigError::invalid(HarnessEnv::BaseUrl, err.to_string()))?;
        let backend = BackendKind::from_str(&read(HarnessEnv::Backend)?)
            .map_err(|err| ConfigError::invalid(HarnessEnv::Backend, err.to_string()))?;
        let timeout = parse_timeout_seconds(&read(HarnessEnv::TimeoutSeconds)?)?;
        let port = parse_port(&read(HarnessEnv::DbPort)?)?;
        let database = DatabaseConfig {
            host: read(HarnessEnv::DbHost)?.trim().to_string(),
            port,
            user: read(HarnessEnv::DbUser)?,
            password: read(HarnessEnv::DbPassword)?,
            database: read(HarnessEnv::DbName)?.trim().to_string(),
        };
        database.connection_string()?;

        Ok(Self {
            base_url,
            backend,
            timeout,
            database,
        })
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: HarnessEnv::BaseUrl.default_value().to_string(),
            backend: BackendKind::default(),
            timeout: Duration::from_secs(30),
            database: DatabaseConfig::default(),
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns an error when the environment variable contains invalid UTF-8.
pub fn read_env_strict(name: &str) -> Result<Option<String>, ConfigError> {
    decode(name, process_env(name))
}

/// Looks up a variable in the process environment.
fn process_env(name: &str) -> Option<OsString> {
    std::env::var_os(name)
}

/// Decodes a raw value as UTF-8.
fn decode(name: &str, raw: Option<OsString>) -> Result<Option<String>, ConfigError> {
    raw.map_or(Ok(None), |raw| {
        raw.into_string().map(Some).map_err(|_| ConfigError::InvalidUtf8(name.to_string()))
    })
}

/// Decodes a raw value and rejects empty values.
fn read_nonempty(name: &str, raw: Option<OsString>) -> Result<Option<String>, ConfigError> {
    match decode(name, raw)? {
        Some(value) if value.trim().is_empty() => Err(ConfigError::Empty(name.to_string())),
        Some(value) => Ok(Some(value)),
        None => Ok(None),
    }
}

/// Parses a positive timeout in whole seconds.
fn parse_timeout_seconds(raw: &str) -> Result<Duration, ConfigError> {
    let key = HarnessEnv::TimeoutSeconds;
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::invalid(key, "must be a positive integer number of seconds"))?;
    if secs == 0 {
        return Err(ConfigError::invalid(key, "must be greater than zero"));
    }
    Ok(Duration::from_secs(secs))
}

/// Parses a non-zero TCP port.
fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    let key = HarnessEnv::DbPort;
    match raw.trim().parse::<u16>() {
        Ok(0) => Err(ConfigError::invalid(key, "must be greater than zero")),
        Ok(port) => Ok(port),
        Err(_) => Err(ConfigError::invalid(key, "must be a port number")),
    }
}
