//! Repository configuration file support.
//!
//! This module provides utilities for reading store configuration from
//! TOML configuration files.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::factory::StoreType;
use super::repository::RepositoryError;

/// Environment variable naming the SQLite database file.
pub const DB_PATH_ENV: &str = "META_DB_PATH";

/// Repository configuration from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub repository: RepositorySettings,
    #[serde(default)]
    pub sqlite: SqliteSettings,
}

/// Store type settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type")]
    pub store_type: String,
}

/// SQLite store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqliteSettings {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("fahrplan.db")
}

impl Default for SqliteSettings {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl SqliteSettings {
    /// Read settings from `META_DB_PATH`, falling back to the default path.
    pub fn from_env() -> Self {
        std::env::var(DB_PATH_ENV)
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(|path| Self {
                path: PathBuf::from(path),
            })
            .unwrap_or_default()
    }
}

impl RepositoryConfig {
    /// Configuration for the in-memory store.
    pub fn local() -> Self {
        Self {
            repository: RepositorySettings {
                store_type: "local".to_string(),
            },
            sqlite: SqliteSettings::default(),
        }
    }

    /// Load repository configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(RepositoryConfig)` if successful
    /// * `Err(RepositoryError)` if file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!("Failed to read config file: {}", e))
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse repository configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, RepositoryError> {
        toml::from_str(content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })
    }

    /// Load repository configuration from the default location.
    ///
    /// Searches for `repository.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    ///
    /// # Returns
    /// * `Ok(RepositoryConfig)` if found and parsed successfully
    /// * `Err(RepositoryError)` if no config file found or parse error
    pub fn from_default_location() -> Result<Self, RepositoryError> {
        let search_paths = [
            PathBuf::from("repository.toml"),
            PathBuf::from("backend/repository.toml"),
            PathBuf::from("../repository.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(RepositoryError::configuration(
            "No repository.toml found in standard locations",
        ))
    }

    /// Get the store type from configuration.
    pub fn store_type(&self) -> Result<StoreType, String> {
        StoreType::from_str(&self.repository.store_type)
    }
}
