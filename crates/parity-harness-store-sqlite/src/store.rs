// crates/parity-harness-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Fixture Store
// Description: FixtureStore backed by a single SQLite connection.
// Purpose: Execute provisioning statements against an embedded database.
// Dependencies: parity-harness-core, rusqlite, thiserror, tracing, uuid
// ============================================================================

//! ## Overview
//! Statements arrive with `$n` placeholders; they are rewritten to `SQLite`'s
//! explicit `?n` form and bound positionally. UUIDs are stored as lowercase
//! hyphenated text.
//! Invariants:
//! - Foreign keys are enforced on every connection.
//! - One statement executes at a time; each is atomic on its own.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::sync::Mutex;

use parity_harness_core::FixtureStore;
use parity_harness_core::SqlValue;
use parity_harness_core::Statement;
use parity_harness_core::StoreError;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::params_from_iter;
use rusqlite::types::Value;
use thiserror::Error;
use tracing::trace;
use uuid::Uuid;

use crate::schema::FIXTURE_SCHEMA;
use crate::schema::FIXTURE_TABLES;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while opening the store.
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Database could not be opened or configured.
    #[error("sqlite store error: {0}")]
    Db(String),
}

impl From<SqliteStoreError> for StoreError {
    fn from(err: SqliteStoreError) -> Self {
        match err {
            SqliteStoreError::Db(message) => Self::Connection(message),
        }
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// Embedded fixture store.
#[derive(Debug)]
pub struct SqliteFixtureStore {
    /// Serialized connection.
    connection: Mutex<Connection>,
}

impl SqliteFixtureStore {
    /// Opens (creating if needed) a file-backed store and applies the schema.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized.
    pub fn open(path: &Path) -> Result<Self, SqliteStoreError> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
        let connection = Connection::open_with_flags(path, flags)
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        Self::initialize(connection)
    }

    /// Opens a private in-memory store and applies the schema.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be initialized.
    pub fn open_in_memory() -> Result<Self, SqliteStoreError> {
        let connection =
            Connection::open_in_memory().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        Self::initialize(connection)
    }

    /// Runs `f` with the underlying connection, for inspection queries.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the connection is unavailable or `f` fails.
    pub fn with_connection<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T>,
    {
        let guard = self.lock()?;
        f(&guard).map_err(|err| StoreError::Statement(err.to_string()))
    }

    /// Returns the number of rows in one of [`FIXTURE_TABLES`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Invalid`] for an unknown table, or
    /// [`StoreError`] when the count fails.
    pub fn count_rows(&self, table: &str) -> Result<u64, StoreError> {
        if !FIXTURE_TABLES.contains(&table) {
            return Err(StoreError::Invalid(format!("unknown fixture table: {table}")));
        }
        let count: i64 = self.with_connection(|conn| {
            conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
        })?;
        u64::try_from(count).map_err(|err| StoreError::Invalid(err.to_string()))
    }

    /// Enables foreign keys and creates the fixture tables.
    fn initialize(connection: Connection) -> Result<Self, SqliteStoreError> {
        connection
            .execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        connection
            .execute_batch(FIXTURE_SCHEMA)
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    /// Locks the connection.
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.connection
            .lock()
            .map_err(|_| StoreError::Connection("sqlite connection mutex poisoned".to_string()))
    }
}

impl FixtureStore for SqliteFixtureStore {
    fn execute(&self, statement: &Statement) -> Result<u64, StoreError> {
        let sql = sqlite_placeholders(&statement.sql);
        trace!(%sql, params = statement.params.len(), "sqlite execute");
        let changed = self.with_connection(|conn| {
            conn.execute(&sql, params_from_iter(statement.params.iter().map(bind_value)))
        })?;
        u64::try_from(changed).map_err(|err| StoreError::Invalid(err.to_string()))
    }

    fn query_uuid(&self, statement: &Statement) -> Result<Option<Uuid>, StoreError> {
        let sql = sqlite_placeholders(&statement.sql);
        trace!(%sql, params = statement.params.len(), "sqlite query");
        let raw: Option<String> = self.with_connection(|conn| {
            conn.prepare(&sql)?
                .query_row(params_from_iter(statement.params.iter().map(bind_value)), |row| {
                    row.get(0)
                })
                .optional()
        })?;
        raw.map(|text| {
            Uuid::parse_str(&text)
                .map_err(|err| StoreError::Invalid(format!("stored id {text} is not a uuid: {err}")))
        })
        .transpose()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Maps a statement parameter onto its `SQLite` storage value.
fn bind_value(value: &SqlValue) -> Value {
    match value {
        SqlValue::Uuid(id) => Value::Text(id.to_string()),
        SqlValue::Text(text) => Value::Text(text.clone()),
        SqlValue::Int(number) => Value::Integer(i64::from(*number)),
    }
}

/// Rewrites `$n` placeholders to `?n`.
fn sqlite_placeholders(sql: &str) -> String {
    let mut rewritten = String::with_capacity(sql.len());
    let mut chars = sql.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek().is_some_and(char::is_ascii_digit) {
            rewritten.push('?');
        } else {
            rewritten.push(ch);
        }
    }
    rewritten
}
