// system-tests/src/harness.rs
// ============================================================================
// Module: Parity Harness
// Description: Facade over config, fixture store, identities and client.
// Purpose: Give each system test one object to set up and drive a backend.
// Dependencies: parity-harness-*, thiserror, tracing, uuid
// ============================================================================

//! ## Overview
//! A [`ParityHarness`] owns a [`HarnessClient`] for the configured backend and
//! a [`FixtureProvisioner`] over some [`FixtureStore`]. Constructors exist for
//! the live Postgres store and for an embedded `SQLite` store.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use parity_harness_client::ClientError;
use parity_harness_client::HarnessClient;
use parity_harness_client::HarnessClientConfig;
use parity_harness_client::RequestOption;
use parity_harness_config::ConfigError;
use parity_harness_config::HarnessConfig;
use parity_harness_core::DefaultFixtures;
use parity_harness_core::FixtureProvisioner;
use parity_harness_core::FixtureStore;
use parity_harness_core::IdentityError;
use parity_harness_core::MetricsAggregator;
use parity_harness_core::ProvisionError;
use parity_harness_core::StoreError;
use parity_harness_core::SymbolicIdentity;
use parity_harness_core::TestUser;
use parity_harness_core::identity::dynamic_subject_id;
use parity_harness_store_postgres::PostgresFixtureStore;
use parity_harness_store_postgres::PostgresStoreConfig;
use parity_harness_store_sqlite::SqliteFixtureStore;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Harness setup and execution errors.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Client construction or request failed.
    #[error(transparent)]
    Client(#[from] ClientError),
    /// Fixture store could not be opened.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Fixture provisioning failed.
    #[error(transparent)]
    Provision(#[from] ProvisionError),
    /// Identity could not be mapped to a token.
    #[error(transparent)]
    Identity(#[from] IdentityError),
}

// ============================================================================
// SECTION: Harness
// ============================================================================

/// One backend under test plus the store its fixtures live in.
#[derive(Debug)]
pub struct ParityHarness<S> {
    /// Loaded configuration.
    config: HarnessConfig,
    /// Instrumented client for the configured backend.
    client: HarnessClient,
    /// Fixture writer over the backend store.
    provisioner: FixtureProvisioner<S>,
}

impl ParityHarness<PostgresFixtureStore> {
    /// Loads configuration from the environment and connects to its store.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError`] when configuration, store or client setup
    /// fails.
    pub fn from_env() -> Result<Self, HarnessError> {
        Self::connect(HarnessConfig::load()?)
    }

    /// Connects to the Postgres store named by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError`] when the store or client cannot be set up.
    pub fn connect(config: HarnessConfig) -> Result<Self, HarnessError> {
        let store_config =
            PostgresStoreConfig::from_connection(config.database.connection_string()?);
        let store = PostgresFixtureStore::connect(&store_config).map_err(StoreError::from)?;
        Self::new(config, store)
    }
}

impl ParityHarness<SqliteFixtureStore> {
    /// Uses a private in-memory `SQLite` store.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError`] when the store or client cannot be set up.
    pub fn in_memory(config: HarnessConfig) -> Result<Self, HarnessError> {
        let store = SqliteFixtureStore::open_in_memory().map_err(StoreError::from)?;
        Self::new(config, store)
    }
}

impl<S: FixtureStore> ParityHarness<S> {
    /// Builds a harness with a fresh aggregator.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError`] when the client cannot be built.
    pub fn new(config: HarnessConfig, store: S) -> Result<Self, HarnessError> {
        Self::with_metrics(config, store, Arc::new(MetricsAggregator::new()))
    }

    /// Builds a harness reporting into an existing aggregator.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError`] when the client cannot be built.
    pub fn with_metrics(
        config: HarnessConfig,
        store: S,
        metrics: Arc<MetricsAggregator>,
    ) -> Result<Self, HarnessError> {
        let client_config = HarnessClientConfig::new(config.base_url.clone(), config.backend)
            .with_timeout(config.timeout);
        let client = HarnessClient::with_metrics(client_config, metrics)?;
        info!(backend = %config.backend, base_url = %config.base_url, "parity harness ready");
        Ok(Self {
            config,
            client,
            provisioner: FixtureProvisioner::new(store),
        })
    }

    /// Returns the loaded configuration.
    #[must_use]
    pub const fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Returns the instrumented client.
    #[must_use]
    pub const fn client(&self) -> &HarnessClient {
        &self.client
    }

    /// Returns the fixture provisioner.
    #[must_use]
    pub const fn provisioner(&self) -> &FixtureProvisioner<S> {
        &self.provisioner
    }

    /// Returns the run-wide aggregator.
    #[must_use]
    pub fn metrics(&self) -> &MetricsAggregator {
        self.client.metrics()
    }

    /// Seeds the default fixture set.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError`] on the first failing provisioning step.
    pub fn seed_defaults(&self) -> Result<DefaultFixtures, HarnessError> {
        Ok(self.provisioner.provision_defaults()?)
    }

    /// Returns the bearer option for `identity` on this backend.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError`] when the identity has no token here.
    pub fn auth(&self, identity: &SymbolicIdentity) -> Result<RequestOption, HarnessError> {
        Ok(RequestOption::bearer(&self.client.token_for(identity)?))
    }

    /// Mints a dynamic identity and provisions its backing user row.
    ///
    /// Returns the identity and the user id the store holds for it.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError`] when the suffix is invalid or provisioning
    /// fails.
    pub fn provision_dynamic(
        &self,
        suffix: &str,
    ) -> Result<(SymbolicIdentity, Uuid), HarnessError> {
        let identity = SymbolicIdentity::dynamic(suffix)?;
        let subject_id = dynamic_subject_id(suffix);
        let user = TestUser {
            id: Uuid::new_v4(),
            email: format!("{subject_id}@parity.test"),
            subject_id,
            first_name: "Dynamic".to_string(),
            last_name: suffix.to_string(),
        };
        let id = self.provisioner.provision_user(&user)?;
        Ok((identity, id))
    }
}
