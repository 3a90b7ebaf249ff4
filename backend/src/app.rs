//! Composition root.
//!
//! [`AppRepository`] wires a [`MetaStore`] and an [`ExecutionContext`] into a
//! [`MetaRepository`] and hands back an owned instance. There is no global
//! state: whoever calls [`AppRepository::initialize`] owns the result and ends
//! its lifecycle with [`AppRepository::shutdown`].

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::db::{MetaStore, MetaStoreFactory, RepositoryConfig};
use crate::models::Meta;
use crate::network::NetworkMeta;
use crate::services::{DatabaseRuntime, ExecutionContext, MetaRepository, MetaSubscription};

/// Name of the thread running database work for [`AppRepository::from_config`].
pub const DATABASE_THREAD_NAME: &str = "fahrplan-db";

/// Application-level repository facade.
pub struct AppRepository {
    meta: MetaRepository,
    database_runtime: Option<DatabaseRuntime>,
}

impl AppRepository {
    /// Build a repository around an existing store and execution context.
    pub fn initialize(execution_context: ExecutionContext, meta_store: Arc<dyn MetaStore>) -> Self {
        log::info!("Initializing app repository");
        Self {
            meta: MetaRepository::new(meta_store, execution_context),
            database_runtime: None,
        }
    }

    /// Build the store described by `config` and run its work on a dedicated
    /// database runtime owned by the returned repository.
    pub fn from_config(config: &RepositoryConfig) -> Result<Self> {
        let store = MetaStoreFactory::from_repository_config(config)
            .context("Failed to create meta store")?;
        let runtime = DatabaseRuntime::start(DATABASE_THREAD_NAME)
            .context("Failed to start database runtime")?;

        let mut app = Self::initialize(runtime.execution_context(), store);
        app.database_runtime = Some(runtime);
        Ok(app)
    }

    /// Like [`AppRepository::from_config`], reading the store type from the environment.
    pub fn from_env() -> Result<Self> {
        let store = MetaStoreFactory::from_env()
            .context("Failed to create meta store from environment")?;
        let runtime = DatabaseRuntime::start(DATABASE_THREAD_NAME)
            .context("Failed to start database runtime")?;

        let mut app = Self::initialize(runtime.execution_context(), store);
        app.database_runtime = Some(runtime);
        Ok(app)
    }

    /// Replay-latest meta subscription.
    pub fn meta(&self) -> MetaSubscription {
        self.meta.meta()
    }

    /// Persist and publish meta received from the schedule fetcher.
    pub async fn update_meta(&self, meta: NetworkMeta) -> Result<()> {
        self.meta
            .update_meta(meta)
            .await
            .context("Failed to update meta")
    }

    /// Publish the meta persisted by a previous run, if any.
    pub async fn load_persisted_meta(&self) -> Result<Meta> {
        self.meta
            .refresh_meta()
            .await
            .context("Failed to load persisted meta")
    }

    /// The underlying meta repository.
    pub fn meta_repository(&self) -> &MetaRepository {
        &self.meta
    }

    /// Stop the owned database runtime, if any.
    ///
    /// Must not be called from within an async task running on that runtime.
    pub fn shutdown(mut self) {
        if let Some(runtime) = self.database_runtime.take() {
            runtime.shutdown();
        }
        log::info!("App repository shut down");
    }
}
