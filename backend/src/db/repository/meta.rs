//! Storage contract for the meta snapshot.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::db::models::StoredMeta;
use crate::models::RowId;

/// Single-slot persistence of the current [`StoredMeta`].
///
/// There are no partial updates and no query filters: a write replaces the
/// whole snapshot and a read returns the whole snapshot.
///
/// # Thread Safety
/// Implementations must be `Send + Sync`; the repository calls them from a
/// dedicated database execution context.
#[async_trait]
pub trait MetaStore: Send + Sync {
    /// Check if the store is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if the store is healthy
    /// - `Ok(false)` if it is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if the check itself failed
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Persist `meta`, replacing any previously stored snapshot.
    ///
    /// # Returns
    /// * `Ok(RowId)` - Identifier of the written row
    /// * `Err(RepositoryError::StorageError)` - If the write fails
    async fn insert(&self, meta: &StoredMeta) -> RepositoryResult<RowId>;

    /// Read the last written snapshot.
    ///
    /// # Returns
    /// * `Ok(StoredMeta)` - The current snapshot
    /// * `Err(RepositoryError::NotFound)` - If nothing was ever written
    /// * `Err(RepositoryError)` - If the read fails
    async fn query(&self) -> RepositoryResult<StoredMeta>;
}
