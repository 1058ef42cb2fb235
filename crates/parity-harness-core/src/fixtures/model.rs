// crates/parity-harness-core/src/fixtures/model.rs
// ============================================================================
// Module: Fixture Model
// Description: Row shapes and fixed default instances for test fixtures.
// Purpose: Give every fixture a stable id so repeated runs converge.
// Dependencies: serde, uuid
// ============================================================================

//! ## Overview
//! Plain row types seeded by the [`super::FixtureProvisioner`]. Default
//! instances use fixed UUIDs so every run targets the same rows.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::identity::Role;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Id of the default organization.
pub const DEFAULT_ORG_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_4000_8000_0000_0000_0101);
/// Id of the default project.
pub const DEFAULT_PROJECT_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_4000_8000_0000_0000_0201);

// ============================================================================
// SECTION: Rows
// ============================================================================

/// User row keyed naturally by its backend-native subject id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestUser {
    /// Requested surrogate key (the store may keep a different one).
    pub id: Uuid,
    /// Backend-native subject identifier.
    pub subject_id: String,
    /// Contact email.
    pub email: String,
    /// Display first name.
    pub first_name: String,
    /// Display last name.
    pub last_name: String,
}

/// Organization row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestOrg {
    /// Primary key.
    pub id: Uuid,
    /// Display name (refreshed on conflict).
    pub name: String,
}

impl TestOrg {
    /// Returns the default organization.
    #[must_use]
    pub fn default_org() -> Self {
        Self {
            id: DEFAULT_ORG_ID,
            name: "Parity Test Org".to_string(),
        }
    }
}

/// Project row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestProject {
    /// Primary key.
    pub id: Uuid,
    /// Display name (refreshed on conflict).
    pub name: String,
    /// Owning organization; the default organization when absent.
    pub organization: Option<TestOrg>,
}

impl TestProject {
    /// Returns the default project under the default organization.
    #[must_use]
    pub fn default_project() -> Self {
        Self {
            id: DEFAULT_PROJECT_ID,
            name: "Parity Test Project".to_string(),
            organization: Some(TestOrg::default_org()),
        }
    }

    /// Returns the organization this project belongs to.
    #[must_use]
    pub fn resolved_organization(&self) -> TestOrg {
        self.organization.clone().unwrap_or_else(TestOrg::default_org)
    }
}

/// Document row, the owner of chunks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestDocument {
    /// Primary key.
    pub id: Uuid,
    /// Owning project (immutable once set).
    pub project_id: Uuid,
    /// File name (refreshed on conflict).
    pub filename: String,
    /// Raw content (refreshed on conflict).
    pub content: String,
}

/// Chunk row belonging to a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestChunk {
    /// Primary key.
    pub id: Uuid,
    /// Owning document (immutable once set).
    pub document_id: Uuid,
    /// Position within the document (refreshed on conflict).
    pub chunk_index: i32,
    /// Chunk text (refreshed on conflict).
    pub text: String,
}

// ============================================================================
// SECTION: Memberships
// ============================================================================

/// Role held by a user inside a project or organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipRole {
    /// Project owner.
    Owner,
    /// Administrator.
    Admin,
    /// Regular member.
    Member,
    /// Read-only viewer.
    Viewer,
}

impl MembershipRole {
    /// Returns the stored role label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Member => "member",
            Self::Viewer => "viewer",
        }
    }
}

impl fmt::Display for MembershipRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Default Fixture Result
// ============================================================================

/// Ids produced by seeding the default fixture set.
///
/// # Invariants
/// - `users` holds the store-resolved id per role, not the requested one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultFixtures {
    /// Store-resolved user id per catalog role.
    pub users: BTreeMap<Role, Uuid>,
    /// Default organization id.
    pub organization_id: Uuid,
    /// Default project id.
    pub project_id: Uuid,
    /// Store-resolved administrator id holding owner/admin memberships.
    pub admin_user_id: Uuid,
}
