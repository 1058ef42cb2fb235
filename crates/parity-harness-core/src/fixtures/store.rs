// crates/parity-harness-core/src/fixtures/store.rs
// ============================================================================
// Module: Fixture Store Interface
// Description: Minimal "run SQL statement" capability required from a store.
// Purpose: Decouple provisioning logic from any particular database driver.
// Dependencies: thiserror, uuid
// ============================================================================

//! ## Overview
//! [`FixtureStore`] is the only capability provisioning needs from its
//! environment: execute a parameterized [`Statement`], or execute one and read
//! back a single UUID. Placeholders are written `$1`, `$2`, ... and first
//! appear in ascending order so both Postgres and `SQLite` bind them
//! positionally.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// SECTION: Statements
// ============================================================================

/// Bound statement parameter.
///
/// Drivers map each variant onto their native type; UUIDs stay typed so
/// stores with a native UUID column never see text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    /// UUID value.
    Uuid(Uuid),
    /// Text value.
    Text(String),
    /// 32-bit integer value.
    Int(i32),
}

impl From<Uuid> for SqlValue {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

/// Parameterized SQL statement.
///
/// # Invariants
/// - `params.len()` equals the number of distinct placeholders in `sql`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// SQL text with `$n` placeholders.
    pub sql: String,
    /// Positional parameters.
    pub params: Vec<SqlValue>,
}

impl Statement {
    /// Creates a statement.
    #[must_use]
    pub fn new(sql: impl Into<String>, params: Vec<SqlValue>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

// ============================================================================
// SECTION: Store Interface
// ============================================================================

/// Fixture store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Connection could not be established or checked out.
    #[error("fixture store connection error: {0}")]
    Connection(String),
    /// Statement failed to execute.
    #[error("fixture store statement error: {0}")]
    Statement(String),
    /// Store returned data the harness cannot interpret.
    #[error("fixture store invalid data: {0}")]
    Invalid(String),
}

/// Statement execution capability backing fixture provisioning.
///
/// Each call is expected to be atomic at the statement level; callers do not
/// rely on multi-statement transactions.
pub trait FixtureStore: Send + Sync {
    /// Executes a statement and returns the number of affected rows.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the statement cannot be executed.
    fn execute(&self, statement: &Statement) -> Result<u64, StoreError>;

    /// Executes a statement and returns the UUID in the first column of the
    /// first row, if any row was produced.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the statement fails or the column is not a
    /// UUID.
    fn query_uuid(&self, statement: &Statement) -> Result<Option<Uuid>, StoreError>;
}

impl<S: FixtureStore + ?Sized> FixtureStore for &S {
    fn execute(&self, statement: &Statement) -> Result<u64, StoreError> {
        (**self).execute(statement)
    }

    fn query_uuid(&self, statement: &Statement) -> Result<Option<Uuid>, StoreError> {
        (**self).query_uuid(statement)
    }
}

impl<S: FixtureStore + ?Sized> FixtureStore for std::sync::Arc<S> {
    fn execute(&self, statement: &Statement) -> Result<u64, StoreError> {
        (**self).execute(statement)
    }

    fn query_uuid(&self, statement: &Statement) -> Result<Option<Uuid>, StoreError> {
        (**self).query_uuid(statement)
    }
}
