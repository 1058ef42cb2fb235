// crates/parity-harness-core/src/identity.rs
// ============================================================================
// Module: Identity Mapper
// Description: Symbolic test identities and backend-specific bearer tokens.
// Purpose: Map stable role names onto the token literals each backend accepts.
// Dependencies: serde, thiserror, uuid
// ============================================================================

//! ## Overview
//! Test authors name identities symbolically ([`SymbolicIdentity`]); the
//! [`IdentityMapper`] turns a name into the bearer-token literal the selected
//! [`BackendKind`] recognizes. Each backend owns one static [`TokenTable`], so
//! adding a backend is a data addition.
//!
//! ## Per-role rules
//! | role | reference | candidate |
//! |---|---|---|
//! | `administrator` | `e2e-test-user` | `e2e-test-user` (aligned) |
//! | `no-scope` | `no-scope` | `no-scope` |
//! | `all-scopes` | `e2e-all-scopes` | `all-scopes` |
//! | `limited-scope` | `with-scope` | `limited-scope` |
//! | `graph-read-only` | `graph-read` | `graph-read-only` |
//! | `read-only` | `read-only` | falls back to `limited-scope` |
//! | `parity` | `e2e-parity` | `e2e-parity` (aligned) |
//! | `dynamic:<suffix>` | `e2e-dyn-<suffix>` | `dyn-<suffix>` |
//!
//! The candidate backend has no dedicated read-only scope set; the closest
//! equivalent it offers is the limited-scope token. The fallback is reported
//! through [`TokenResolution::fallback_from`].
//!
//! Dynamic identities carry no catalog row. Both backends provision the user
//! on first sight of the token, using [`dynamic_subject_id`] as its subject.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::backend::BackendKind;
use crate::fixtures::TestUser;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Prefix that marks a dynamic symbolic identity (`dynamic:<suffix>`).
pub const DYNAMIC_PREFIX: &str = "dynamic:";
/// Maximum accepted dynamic suffix length.
const MAX_DYNAMIC_SUFFIX_LEN: usize = 64;

// ============================================================================
// SECTION: Roles
// ============================================================================

/// Fixed symbolic roles in the identity catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Full administrator; owner of the default project.
    Administrator,
    /// Authenticated user holding no scopes.
    NoScope,
    /// User holding every scope.
    AllScopes,
    /// User holding the general limited scope set.
    LimitedScope,
    /// User holding only graph read access.
    GraphReadOnly,
    /// User holding read-only access (backend-conditional).
    ReadOnly,
    /// Identity used to compare both backends with one subject.
    Parity,
}

impl Role {
    /// All fixed roles, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Administrator,
        Self::NoScope,
        Self::AllScopes,
        Self::LimitedScope,
        Self::GraphReadOnly,
        Self::ReadOnly,
        Self::Parity,
    ];

    /// Returns the stable symbolic name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Administrator => "administrator",
            Self::NoScope => "no-scope",
            Self::AllScopes => "all-scopes",
            Self::LimitedScope => "limited-scope",
            Self::GraphReadOnly => "graph-read-only",
            Self::ReadOnly => "read-only",
            Self::Parity => "parity",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Symbolic Identity
// ============================================================================

/// Validated suffix of a dynamic identity.
///
/// Only [`DynamicSuffix::new`] constructs one, so every suffix that reaches a
/// token or subject id has passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DynamicSuffix(String);

impl DynamicSuffix {
    /// Validates `suffix`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidDynamicSuffix`] when the suffix is
    /// empty, too long, or contains characters other than ASCII
    /// alphanumerics, `-`, or `_`.
    pub fn new(suffix: impl Into<String>) -> Result<Self, IdentityError> {
        let suffix = suffix.into();
        validate_suffix(&suffix)?;
        Ok(Self(suffix))
    }

    /// Returns the suffix text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DynamicSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity requested by a test, independent of backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SymbolicIdentity {
    /// One of the fixed catalog roles.
    Fixed(Role),
    /// Freshly minted identity derived from a validated suffix.
    Dynamic(DynamicSuffix),
}

impl SymbolicIdentity {
    /// Builds a dynamic identity after validating the suffix.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidDynamicSuffix`] when the suffix is
    /// empty, too long, or contains characters other than ASCII
    /// alphanumerics, `-`, or `_`.
    pub fn dynamic(suffix: impl Into<String>) -> Result<Self, IdentityError> {
        DynamicSuffix::new(suffix).map(Self::Dynamic)
    }
}

impl From<Role> for SymbolicIdentity {
    fn from(role: Role) -> Self {
        Self::Fixed(role)
    }
}

impl fmt::Display for SymbolicIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(role) => f.write_str(role.as_str()),
            Self::Dynamic(suffix) => write!(f, "{DYNAMIC_PREFIX}{suffix}"),
        }
    }
}

impl FromStr for SymbolicIdentity {
    type Err = IdentityError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if let Some(suffix) = trimmed.strip_prefix(DYNAMIC_PREFIX) {
            return Self::dynamic(suffix);
        }
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == trimmed)
            .map(Self::Fixed)
            .ok_or_else(|| IdentityError::UnknownIdentity(trimmed.to_string()))
    }
}

/// Validates a dynamic identity suffix.
fn validate_suffix(suffix: &str) -> Result<(), IdentityError> {
    let valid = !suffix.is_empty()
        && suffix.len() <= MAX_DYNAMIC_SUFFIX_LEN
        && suffix.bytes().all(|byte| byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_');
    if valid { Ok(()) } else { Err(IdentityError::InvalidDynamicSuffix(suffix.to_string())) }
}

/// Returns the subject identifier a backend assigns to a dynamic identity.
#[must_use]
pub fn dynamic_subject_id(suffix: &str) -> String {
    format!("e2e-dynamic-{suffix}")
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Identity mapping errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// Dynamic suffix failed validation.
    #[error("invalid dynamic identity suffix: {0:?}")]
    InvalidDynamicSuffix(String),
    /// Symbolic name is not in the catalog.
    #[error("unknown symbolic identity: {0}")]
    UnknownIdentity(String),
    /// Token table has no terminal literal for the role.
    #[error("no token for {role} on {backend} backend")]
    Unresolved {
        /// Backend whose table was consulted.
        backend: BackendKind,
        /// Role that could not be resolved.
        role: Role,
    },
}

// ============================================================================
// SECTION: Token Tables
// ============================================================================

/// How a backend realizes one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenRule {
    /// The backend accepts this literal for the role.
    Literal(&'static str),
    /// The backend lacks the role; use the named role's token instead.
    FallbackTo(Role),
}

/// Static per-backend token table.
#[derive(Debug)]
struct TokenTable {
    /// Role rules; every [`Role`] appears exactly once.
    rules: &'static [(Role, TokenRule)],
    /// Prefix prepended to dynamic suffixes.
    dynamic_prefix: &'static str,
}

impl TokenTable {
    /// Returns the rule for a role.
    fn rule(&self, role: Role) -> Option<TokenRule> {
        self.rules.iter().find(|(candidate, _)| *candidate == role).map(|(_, rule)| *rule)
    }
}

/// Tokens recognized by the reference backend.
static REFERENCE_TOKENS: TokenTable = TokenTable {
    rules: &[
        (Role::Administrator, TokenRule::Literal("e2e-test-user")),
        (Role::NoScope, TokenRule::Literal("no-scope")),
        (Role::AllScopes, TokenRule::Literal("e2e-all-scopes")),
        (Role::LimitedScope, TokenRule::Literal("with-scope")),
        (Role::GraphReadOnly, TokenRule::Literal("graph-read")),
        (Role::ReadOnly, TokenRule::Literal("read-only")),
        (Role::Parity, TokenRule::Literal("e2e-parity")),
    ],
    dynamic_prefix: "e2e-dyn-",
};

/// Tokens recognized by the candidate backend.
static CANDIDATE_TOKENS: TokenTable = TokenTable {
    rules: &[
        (Role::Administrator, TokenRule::Literal("e2e-test-user")),
        (Role::NoScope, TokenRule::Literal("no-scope")),
        (Role::AllScopes, TokenRule::Literal("all-scopes")),
        (Role::LimitedScope, TokenRule::Literal("limited-scope")),
        (Role::GraphReadOnly, TokenRule::Literal("graph-read-only")),
        (Role::ReadOnly, TokenRule::FallbackTo(Role::LimitedScope)),
        (Role::Parity, TokenRule::Literal("e2e-parity")),
    ],
    dynamic_prefix: "dyn-",
};

/// Returns the token table for a backend.
const fn table_for(backend: BackendKind) -> &'static TokenTable {
    match backend {
        BackendKind::Reference => &REFERENCE_TOKENS,
        BackendKind::Candidate => &CANDIDATE_TOKENS,
    }
}

// ============================================================================
// SECTION: Identity Mapper
// ============================================================================

/// Result of resolving a symbolic identity on one backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenResolution {
    /// Bearer token literal.
    pub token: String,
    /// Role originally requested when a fallback was taken.
    pub fallback_from: Option<Role>,
}

/// Pure mapping from symbolic identities to backend token literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityMapper {
    /// Backend whose table is consulted.
    backend: BackendKind,
}

impl IdentityMapper {
    /// Creates a mapper for one backend.
    #[must_use]
    pub const fn new(backend: BackendKind) -> Self {
        Self {
            backend,
        }
    }

    /// Returns the backend this mapper targets.
    #[must_use]
    pub const fn backend(self) -> BackendKind {
        self.backend
    }

    /// Returns the bearer token for an identity.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Unresolved`] when the backend table cannot
    /// realize the role.
    pub fn token(self, identity: &SymbolicIdentity) -> Result<String, IdentityError> {
        self.resolve(identity).map(|resolution| resolution.token)
    }

    /// Resolves an identity, reporting any fallback taken.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Unresolved`] when the backend table cannot
    /// realize the role.
    pub fn resolve(self, identity: &SymbolicIdentity) -> Result<TokenResolution, IdentityError> {
        let table = table_for(self.backend);
        match identity {
            SymbolicIdentity::Dynamic(suffix) => Ok(TokenResolution {
                token: format!("{}{suffix}", table.dynamic_prefix),
                fallback_from: None,
            }),
            SymbolicIdentity::Fixed(role) => self.resolve_role(table, *role),
        }
    }

    /// Follows fallback rules until a literal is reached.
    fn resolve_role(
        self,
        table: &TokenTable,
        requested: Role,
    ) -> Result<TokenResolution, IdentityError> {
        let mut current = requested;
        // Each hop visits a distinct role, so the table length bounds the walk.
        for _ in 0..Role::ALL.len() {
            match table.rule(current) {
                Some(TokenRule::Literal(token)) => {
                    return Ok(TokenResolution {
                        token: token.to_string(),
                        fallback_from: (current != requested).then_some(requested),
                    });
                }
                Some(TokenRule::FallbackTo(next)) => current = next,
                None => break,
            }
        }
        Err(IdentityError::Unresolved {
            backend: self.backend,
            role: requested,
        })
    }
}

// ============================================================================
// SECTION: Identity Catalog
// ============================================================================

/// Fixed catalog entry for a canonical test identity.
///
/// # Invariants
/// - `id` is a requested primary key; the store may already hold a different
///   id for the same `subject_id`, and the store's id wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestIdentity {
    /// Role this identity realizes.
    pub role: Role,
    /// Requested surrogate key.
    pub id: Uuid,
    /// Backend-native subject identifier (natural key).
    pub subject_id: &'static str,
    /// Contact email.
    pub email: &'static str,
    /// Display first name.
    pub first_name: &'static str,
    /// Display last name.
    pub last_name: &'static str,
}

impl TestIdentity {
    /// Returns the owned row used for provisioning.
    #[must_use]
    pub fn user(&self) -> TestUser {
        TestUser {
            id: self.id,
            subject_id: self.subject_id.to_string(),
            email: self.email.to_string(),
            first_name: self.first_name.to_string(),
            last_name: self.last_name.to_string(),
        }
    }

    /// Looks up the catalog entry for a role.
    ///
    /// `read-only` has no dedicated catalog row.
    #[must_use]
    pub fn for_role(role: Role) -> Option<&'static Self> {
        IDENTITY_CATALOG.iter().find(|identity| identity.role == role)
    }
}

/// Canonical test identities seeded by the default fixture set.
pub static IDENTITY_CATALOG: [TestIdentity; 6] = [
    TestIdentity {
        role: Role::Administrator,
        id: Uuid::from_u128(0x0000_0000_0000_4000_8000_0000_0000_0001),
        subject_id: "test-user-admin",
        email: "admin@parity.test",
        first_name: "Admin",
        last_name: "User",
    },
    TestIdentity {
        role: Role::NoScope,
        id: Uuid::from_u128(0x0000_0000_0000_4000_8000_0000_0000_0002),
        subject_id: "test-user-no-scope",
        email: "no-scope@parity.test",
        first_name: "NoScope",
        last_name: "User",
    },
    TestIdentity {
        role: Role::LimitedScope,
        id: Uuid::from_u128(0x0000_0000_0000_4000_8000_0000_0000_0003),
        subject_id: "test-user-limited-scope",
        email: "limited@parity.test",
        first_name: "Limited",
        last_name: "User",
    },
    TestIdentity {
        role: Role::AllScopes,
        id: Uuid::from_u128(0x0000_0000_0000_4000_8000_0000_0000_0004),
        subject_id: "test-user-all-scopes",
        email: "all-scopes@parity.test",
        first_name: "AllScopes",
        last_name: "User",
    },
    TestIdentity {
        role: Role::GraphReadOnly,
        id: Uuid::from_u128(0x0000_0000_0000_4000_8000_0000_0000_0005),
        subject_id: "test-user-graph-read",
        email: "graph-read@parity.test",
        first_name: "GraphRead",
        last_name: "User",
    },
    TestIdentity {
        role: Role::Parity,
        id: Uuid::from_u128(0x0000_0000_0000_4000_8000_0000_0000_0006),
        subject_id: "test-user-parity",
        email: "parity@parity.test",
        first_name: "Parity",
        last_name: "User",
    },
];

// ============================================================================
// SECTION: Tests
// ============================================================================
