// crates/parity-harness-core/src/fixtures/provisioner.rs
// ============================================================================
// Module: Fixture Provisioner
// Description: Idempotent seeding and cleanup of fixture rows.
// Purpose: Converge a backend store onto the known fixture state.
// Dependencies: thiserror, tracing, uuid
// ============================================================================

//! ## Overview
//! [`FixtureProvisioner`] writes fixtures through a [`FixtureStore`] using the
//! entity policies in [`super::policy`]. Every operation is convergent, so a
//! failed step can simply be retried and partial progress never needs to be
//! rolled back.
//! Invariants:
//! - User ids returned by the store replace the requested ids for every later
//!   foreign-key reference.
//! - Cleanup deletes chunks before their documents.
//! - Empty id sets issue no statements.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::debug;
use tracing::info;
use uuid::Uuid;

use super::model::DefaultFixtures;
use super::model::MembershipRole;
use super::model::TestChunk;
use super::model::TestDocument;
use super::model::TestOrg;
use super::model::TestProject;
use super::model::TestUser;
use super::policy;
use super::policy::UpsertPolicy;
use super::store::FixtureStore;
use super::store::SqlValue;
use super::store::Statement;
use super::store::StoreError;
use crate::identity::IDENTITY_CATALOG;
use crate::identity::Role;
use crate::identity::TestIdentity;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Provisioning errors.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// A store statement failed during the named step.
    #[error("fixture step {step} failed: {source}")]
    Store {
        /// Provisioning step that failed.
        step: &'static str,
        /// Underlying store error.
        #[source]
        source: StoreError,
    },
    /// A user row expected to exist could not be found.
    #[error("fixture user not found for subject {0}")]
    MissingUser(String),
    /// The identity catalog has no entry for a role the fixtures require.
    #[error("identity catalog has no entry for role {0}")]
    MissingCatalogRole(Role),
}

/// Attaches a step label to store results.
trait StepContext<T> {
    /// Wraps the error with the failing step.
    fn step(self, step: &'static str) -> Result<T, ProvisionError>;
}

impl<T> StepContext<T> for Result<T, StoreError> {
    fn step(self, step: &'static str) -> Result<T, ProvisionError> {
        self.map_err(|source| ProvisionError::Store {
            step,
            source,
        })
    }
}

// ============================================================================
// SECTION: Provisioner
// ============================================================================

/// Idempotent fixture writer over a [`FixtureStore`].
#[derive(Debug, Clone, Copy)]
pub struct FixtureProvisioner<S> {
    /// Statement execution capability.
    store: S,
}

impl<S: FixtureStore> FixtureProvisioner<S> {
    /// Creates a provisioner over a store.
    pub const fn new(store: S) -> Self {
        Self {
            store,
        }
    }

    /// Returns the underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    // ------------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------------

    /// Upserts a user keyed by subject id and returns the store's row id.
    ///
    /// On a subject-id collision the display fields are refreshed and the
    /// existing id is returned, which may differ from `user.id`.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError`] when the upsert fails or yields no id.
    pub fn provision_user(&self, user: &TestUser) -> Result<Uuid, ProvisionError> {
        let statement = policy::USERS.statement(vec![
            user.id.into(),
            user.subject_id.as_str().into(),
            user.email.as_str().into(),
            user.first_name.as_str().into(),
            user.last_name.as_str().into(),
        ]);
        let id = self
            .store
            .query_uuid(&statement)
            .step("upsert user")?
            .ok_or_else(|| ProvisionError::MissingUser(user.subject_id.clone()))?;
        if id != user.id {
            debug!(subject_id = %user.subject_id, requested = %user.id, resolved = %id, "user id resolved from store");
        }
        Ok(id)
    }

    /// Seeds every catalog identity and returns the resolved id per role.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError`] on the first failing upsert.
    pub fn provision_identities(&self) -> Result<BTreeMap<Role, Uuid>, ProvisionError> {
        let mut users = BTreeMap::new();
        for identity in &IDENTITY_CATALOG {
            let id = self.provision_user(&identity.user())?;
            users.insert(identity.role, id);
        }
        debug!(count = users.len(), "catalog identities provisioned");
        Ok(users)
    }

    /// Looks up a user's row id by subject id.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError`] when the lookup fails.
    pub fn resolve_user_id(&self, subject_id: &str) -> Result<Option<Uuid>, ProvisionError> {
        let statement =
            Statement::new("SELECT id FROM users WHERE subject_id = $1", vec![subject_id.into()]);
        self.store.query_uuid(&statement).step("resolve user")
    }

    // ------------------------------------------------------------------------
    // Organizations and projects
    // ------------------------------------------------------------------------

    /// Upserts an organization, refreshing its name.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError`] when the upsert fails.
    pub fn provision_org(&self, org: &TestOrg) -> Result<Uuid, ProvisionError> {
        self.upsert(&policy::ORGANIZATIONS, "upsert organization", vec![
            org.id.into(),
            org.name.as_str().into(),
        ])?;
        Ok(org.id)
    }

    /// Upserts a project, seeding its organization first if absent.
    ///
    /// An existing organization is left untouched; an existing project keeps
    /// its organization and only has its name refreshed.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError`] when either write fails.
    pub fn provision_project(&self, project: &TestProject) -> Result<Uuid, ProvisionError> {
        let org = project.resolved_organization();
        self.upsert(&policy::ORGANIZATIONS_IF_ABSENT, "ensure project organization", vec![
            org.id.into(),
            org.name.as_str().into(),
        ])?;
        self.upsert(&policy::PROJECTS, "upsert project", vec![
            project.id.into(),
            org.id.into(),
            project.name.as_str().into(),
        ])?;
        Ok(project.id)
    }

    // ------------------------------------------------------------------------
    // Memberships
    // ------------------------------------------------------------------------

    /// Grants a project role, replacing any prior role for the pair.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError`] when the upsert fails.
    pub fn grant_project_membership(
        &self,
        project_id: Uuid,
        user_id: Uuid,
        role: MembershipRole,
    ) -> Result<(), ProvisionError> {
        self.upsert(&policy::PROJECT_MEMBERSHIPS, "upsert project membership", vec![
            project_id.into(),
            user_id.into(),
            role.as_str().into(),
        ])
    }

    /// Grants an organization role, replacing any prior role for the pair.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError`] when the upsert fails.
    pub fn grant_org_membership(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
        role: MembershipRole,
    ) -> Result<(), ProvisionError> {
        self.upsert(&policy::ORG_MEMBERSHIPS, "upsert organization membership", vec![
            organization_id.into(),
            user_id.into(),
            role.as_str().into(),
        ])
    }

    // ------------------------------------------------------------------------
    // Documents and chunks
    // ------------------------------------------------------------------------

    /// Upserts a document.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError`] when the upsert fails.
    pub fn provision_document(&self, document: &TestDocument) -> Result<Uuid, ProvisionError> {
        self.upsert(&policy::DOCUMENTS, "upsert document", vec![
            document.id.into(),
            document.project_id.into(),
            document.filename.as_str().into(),
            document.content.as_str().into(),
        ])?;
        Ok(document.id)
    }

    /// Upserts a chunk.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError`] when the upsert fails.
    pub fn provision_chunk(&self, chunk: &TestChunk) -> Result<Uuid, ProvisionError> {
        self.upsert(&policy::CHUNKS, "upsert chunk", vec![
            chunk.id.into(),
            chunk.document_id.into(),
            chunk.chunk_index.into(),
            chunk.text.as_str().into(),
        ])?;
        Ok(chunk.id)
    }

    /// Deletes documents and, first, every chunk that references them.
    ///
    /// Returns the number of documents removed. An empty id set issues no
    /// statements.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError`] when either delete fails.
    pub fn delete_test_documents(&self, document_ids: &[Uuid]) -> Result<u64, ProvisionError> {
        if document_ids.is_empty() {
            return Ok(0);
        }
        self.store
            .execute(&delete_where_in("chunks", "document_id", document_ids))
            .step("delete document chunks")?;
        let removed = self
            .store
            .execute(&delete_where_in("documents", "id", document_ids))
            .step("delete documents")?;
        debug!(requested = document_ids.len(), removed, "test documents deleted");
        Ok(removed)
    }

    /// Deletes chunks by id. An empty id set issues no statements.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError`] when the delete fails.
    pub fn delete_test_chunks(&self, chunk_ids: &[Uuid]) -> Result<u64, ProvisionError> {
        if chunk_ids.is_empty() {
            return Ok(0);
        }
        self.store.execute(&delete_where_in("chunks", "id", chunk_ids)).step("delete chunks")
    }

    // ------------------------------------------------------------------------
    // Default fixture set
    // ------------------------------------------------------------------------

    /// Seeds the default fixture set.
    ///
    /// Order: catalog identities, default organization, default project,
    /// administrator id resolution, then project-owner and org-admin grants
    /// for that id. Each step converges on its own, so rerunning after a
    /// partial failure is safe.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError`] on the first failing step.
    pub fn provision_defaults(&self) -> Result<DefaultFixtures, ProvisionError> {
        let users = self.provision_identities()?;
        let organization_id = self.provision_org(&TestOrg::default_org())?;
        let project_id = self.provision_project(&TestProject::default_project())?;

        let admin = TestIdentity::for_role(Role::Administrator)
            .ok_or(ProvisionError::MissingCatalogRole(Role::Administrator))?;
        let admin_user_id = self
            .resolve_user_id(admin.subject_id)?
            .ok_or_else(|| ProvisionError::MissingUser(admin.subject_id.to_string()))?;

        self.grant_project_membership(project_id, admin_user_id, MembershipRole::Owner)?;
        self.grant_org_membership(organization_id, admin_user_id, MembershipRole::Admin)?;
        info!(%organization_id, %project_id, %admin_user_id, "default fixtures provisioned");

        Ok(DefaultFixtures {
            users,
            organization_id,
            project_id,
            admin_user_id,
        })
    }

    /// Executes one policy upsert.
    fn upsert(
        &self,
        policy: &UpsertPolicy,
        step: &'static str,
        params: Vec<SqlValue>,
    ) -> Result<(), ProvisionError> {
        let affected = self.store.execute(&policy.statement(params)).step(step)?;
        debug!(table = policy.table, affected, "{step}");
        Ok(())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds `DELETE FROM table WHERE column IN ($1, ..., $n)`.
fn delete_where_in(table: &str, column: &str, ids: &[Uuid]) -> Statement {
    let placeholders: Vec<String> = (1..=ids.len()).map(|index| format!("${index}")).collect();
    Statement::new(
        format!("DELETE FROM {table} WHERE {column} IN ({})", placeholders.join(", ")),
        ids.iter().copied().map(SqlValue::from).collect(),
    )
}
