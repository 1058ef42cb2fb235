// crates/parity-harness-core/src/fixtures/policy.rs
// ============================================================================
// Module: Upsert Conflict Policies
// Description: Per-entity conflict-resolution rules for fixture writes.
// Purpose: Generate every provisioning upsert from one declarative table.
// Dependencies: crate::fixtures::store
// ============================================================================

//! ## Overview
//! Each fixture entity declares one [`UpsertPolicy`]: the columns it writes,
//! the conflict key, and which columns a conflicting write refreshes. Columns
//! absent from `update` are preserved, which is how relationships (project →
//! organization, chunk → document) stay immutable once set.
//!
//! | entity | conflict key | refreshed | preserved |
//! |---|---|---|---|
//! | users | `subject_id` | email, names | id |
//! | organizations | `id` | name | none |
//! | organizations (if absent) | `id` | none | everything |
//! | projects | `id` | name | `organization_id` |
//! | documents | `id` | filename, content | `project_id` |
//! | chunks | `id` | index, text | `document_id` |
//! | project memberships | `(project_id, user_id)` | role | none |
//! | organization memberships | `(organization_id, user_id)` | role | none |

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write as _;

use super::store::SqlValue;
use super::store::Statement;

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Conflict-resolution policy for one fixture entity.
///
/// # Invariants
/// - `conflict` and `update` are subsets of `columns`.
/// - Parameters bind to `columns` in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpsertPolicy {
    /// Target table.
    pub table: &'static str,
    /// Inserted columns, in parameter order.
    pub columns: &'static [&'static str],
    /// Conflict target columns.
    pub conflict: &'static [&'static str],
    /// Columns refreshed from the incoming row on conflict.
    pub update: &'static [&'static str],
    /// Column returned after the write, if any.
    pub returning: Option<&'static str>,
}

impl UpsertPolicy {
    /// Renders the upsert SQL for this policy.
    ///
    /// An empty `update` set renders `DO NOTHING`.
    #[must_use]
    pub fn sql(&self) -> String {
        let placeholders: Vec<String> =
            (1..=self.columns.len()).map(|index| format!("${index}")).collect();
        let mut sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT ({}) ",
            self.table,
            self.columns.join(", "),
            placeholders.join(", "),
            self.conflict.join(", "),
        );
        if self.update.is_empty() {
            sql.push_str("DO NOTHING");
        } else {
            let assignments: Vec<String> =
                self.update.iter().map(|column| format!("{column} = EXCLUDED.{column}")).collect();
            let _ = write!(sql, "DO UPDATE SET {}", assignments.join(", "));
        }
        if let Some(column) = self.returning {
            let _ = write!(sql, " RETURNING {column}");
        }
        sql
    }

    /// Binds values to this policy's columns.
    #[must_use]
    pub fn statement(&self, params: Vec<SqlValue>) -> Statement {
        debug_assert_eq!(params.len(), self.columns.len(), "{} parameter count", self.table);
        Statement::new(self.sql(), params)
    }
}

// ============================================================================
// SECTION: Entity Policies
// ============================================================================

/// Users: natural key wins over the requested surrogate id.
pub const USERS: UpsertPolicy = UpsertPolicy {
    table: "users",
    columns: &["id", "subject_id", "email", "first_name", "last_name"],
    conflict: &["subject_id"],
    update: &["email", "first_name", "last_name"],
    returning: Some("id"),
};

/// Organizations: refresh the name.
pub const ORGANIZATIONS: UpsertPolicy = UpsertPolicy {
    table: "organizations",
    columns: &["id", "name"],
    conflict: &["id"],
    update: &["name"],
    returning: None,
};

/// Organizations seeded only when missing (used for a project's parent).
pub const ORGANIZATIONS_IF_ABSENT: UpsertPolicy = UpsertPolicy {
    table: "organizations",
    columns: &["id", "name"],
    conflict: &["id"],
    update: &[],
    returning: None,
};

/// Projects: refresh the name; the owning organization never moves.
pub const PROJECTS: UpsertPolicy = UpsertPolicy {
    table: "projects",
    columns: &["id", "organization_id", "name"],
    conflict: &["id"],
    update: &["name"],
    returning: None,
};

/// Documents: refresh file name and content; the project never moves.
pub const DOCUMENTS: UpsertPolicy = UpsertPolicy {
    table: "documents",
    columns: &["id", "project_id", "filename", "content"],
    conflict: &["id"],
    update: &["filename", "content"],
    returning: None,
};

/// Chunks: refresh index and text; the document never moves.
pub const CHUNKS: UpsertPolicy = UpsertPolicy {
    table: "chunks",
    columns: &["id", "document_id", "chunk_index", "text"],
    conflict: &["id"],
    update: &["chunk_index", "text"],
    returning: None,
};

/// Project memberships: role is replaced, never merged.
pub const PROJECT_MEMBERSHIPS: UpsertPolicy = UpsertPolicy {
    table: "project_memberships",
    columns: &["project_id", "user_id", "role"],
    conflict: &["project_id", "user_id"],
    update: &["role"],
    returning: None,
};

/// Organization memberships: role is replaced, never merged.
pub const ORG_MEMBERSHIPS: UpsertPolicy = UpsertPolicy {
    table: "organization_memberships",
    columns: &["organization_id", "user_id", "role"],
    conflict: &["organization_id", "user_id"],
    update: &["role"],
    returning: None,
};
