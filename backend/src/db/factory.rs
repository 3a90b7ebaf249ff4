//! Store factory for dependency injection.
//!
//! This module creates [`MetaStore`] instances based on runtime configuration
//! (explicit type, environment variables or a `repository.toml` file).

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use super::repo_config::{RepositoryConfig, SqliteSettings, DB_PATH_ENV};
use super::repositories::LocalMetaStore;
#[cfg(feature = "sqlite-repo")]
use super::repositories::SqliteMetaStore;
use super::repository::{MetaStore, RepositoryError, RepositoryResult};

/// Environment variable selecting the store type.
pub const STORE_TYPE_ENV: &str = "META_STORE_TYPE";

/// Store type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreType {
    /// In-memory local store
    Local,
    /// SQLite database file
    Sqlite,
}

impl FromStr for StoreType {
    type Err = String;

    /// Parse store type from string ("local", "memory", "sqlite", "db").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" | "memory" => Ok(Self::Local),
            "sqlite" | "db" => Ok(Self::Sqlite),
            _ => Err(format!("Unknown store type: {}", s)),
        }
    }
}

impl StoreType {
    /// Get store type from environment variables.
    ///
    /// Reads `META_STORE_TYPE`. Without it, defaults to SQLite when
    /// `META_DB_PATH` is set, otherwise Local.
    pub fn from_env() -> Self {
        if let Ok(val) = std::env::var(STORE_TYPE_ENV) {
            return val.parse().unwrap_or(Self::Local);
        }

        if std::env::var(DB_PATH_ENV).is_ok() {
            Self::Sqlite
        } else {
            Self::Local
        }
    }
}

/// Factory for creating meta store instances.
///
/// # Example
/// ```
/// use fahrplan_meta::db::{MetaStoreFactory, StoreType};
///
/// let store = MetaStoreFactory::create(StoreType::Local, None).unwrap();
/// ```
pub struct MetaStoreFactory;

impl MetaStoreFactory {
    /// Create a store instance based on type.
    ///
    /// # Arguments
    /// * `store_type` - Type of store to create
    /// * `sqlite` - SQLite settings; the default path is used when absent
    ///
    /// # Returns
    /// * `Ok(Arc<dyn MetaStore>)` - Store instance
    /// * `Err(RepositoryError)` - If creation fails
    pub fn create(
        store_type: StoreType,
        sqlite: Option<&SqliteSettings>,
    ) -> RepositoryResult<Arc<dyn MetaStore>> {
        match store_type {
            StoreType::Local => Ok(Self::create_local()),
            StoreType::Sqlite => {
                #[cfg(feature = "sqlite-repo")]
                {
                    let settings = sqlite.cloned().unwrap_or_default();
                    let store = Self::create_sqlite(&settings)?;
                    Ok(store as Arc<dyn MetaStore>)
                }
                #[cfg(not(feature = "sqlite-repo"))]
                {
                    let _ = sqlite;
                    Err(RepositoryError::configuration(
                        "SQLite store feature not enabled",
                    ))
                }
            }
        }
    }

    /// Create an in-memory local store seeded with the cold-start snapshot.
    pub fn create_local() -> Arc<dyn MetaStore> {
        log::info!("Creating in-memory meta store");
        Arc::new(LocalMetaStore::new())
    }

    /// Create a SQLite store.
    #[cfg(feature = "sqlite-repo")]
    pub fn create_sqlite(settings: &SqliteSettings) -> RepositoryResult<Arc<SqliteMetaStore>> {
        let store = SqliteMetaStore::open(&settings.path)?;
        Ok(Arc::new(store))
    }

    /// Create a store from environment configuration.
    pub fn from_env() -> RepositoryResult<Arc<dyn MetaStore>> {
        let store_type = StoreType::from_env();
        let settings = SqliteSettings::from_env();
        Self::create(store_type, Some(&settings))
    }

    /// Create a store from a TOML configuration file.
    pub fn from_config_file<P: AsRef<Path>>(
        config_path: P,
    ) -> RepositoryResult<Arc<dyn MetaStore>> {
        let config = RepositoryConfig::from_file(config_path)?;
        Self::from_repository_config(&config)
    }

    /// Create a store from the default configuration file location.
    pub fn from_default_config() -> RepositoryResult<Arc<dyn MetaStore>> {
        let config = RepositoryConfig::from_default_location()?;
        Self::from_repository_config(&config)
    }

    /// Create a store from a [`RepositoryConfig`] instance.
    pub fn from_repository_config(
        config: &RepositoryConfig,
    ) -> RepositoryResult<Arc<dyn MetaStore>> {
        let store_type = config.store_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid store type: {}", e))
        })?;
        Self::create(store_type, Some(&config.sqlite))
    }
}
