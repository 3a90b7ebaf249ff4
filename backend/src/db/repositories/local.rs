//! In-memory local meta store.
//!
//! Suitable for unit testing and local development. The snapshot lives in
//! memory behind a lock, giving fast, deterministic and isolated execution.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::db::models::StoredMeta;
use crate::db::repository::{ErrorContext, MetaStore, RepositoryError, RepositoryResult};
use crate::models::RowId;

/// In-memory local meta store.
///
/// A new store is seeded with [`StoredMeta::seed`] so reads never fail with
/// `NotFound`. Use [`LocalMetaStore::empty`] for a store without a snapshot.
///
/// # Example
/// ```
/// use fahrplan_meta::db::repositories::LocalMetaStore;
/// use fahrplan_meta::db::repository::MetaStore;
///
/// # tokio_test_block_on(async {
/// let store = LocalMetaStore::new();
/// let stored = store.query().await.unwrap();
/// assert_eq!(stored.version, "0.0.0");
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Clone)]
pub struct LocalMetaStore {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    meta: Option<StoredMeta>,

    // Row id handed out by the last insert
    last_row_id: i64,
    insert_count: usize,

    // Connection health
    is_healthy: bool,
}

impl LocalMetaStore {
    /// Create a store seeded with the cold-start snapshot.
    pub fn new() -> Self {
        Self::with_meta(StoredMeta::seed())
    }

    /// Create a store seeded with `meta`.
    pub fn with_meta(meta: StoredMeta) -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData {
                meta: Some(meta),
                last_row_id: 0,
                insert_count: 0,
                is_healthy: true,
            })),
        }
    }

    /// Create a store that holds no snapshot; `query` fails until the first insert.
    pub fn empty() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData {
                meta: None,
                last_row_id: 0,
                insert_count: 0,
                is_healthy: true,
            })),
        }
    }

    /// Set the health status for testing storage failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Number of successful inserts since creation.
    pub fn insert_count(&self) -> usize {
        self.data.read().insert_count
    }

    /// Current snapshot without going through the async contract.
    pub fn snapshot(&self) -> Option<StoredMeta> {
        self.data.read().meta.clone()
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self, operation: &str) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::storage_with_context(
                "Store is not healthy",
                ErrorContext::new(operation).with_entity("meta").retryable(),
            ));
        }
        Ok(())
    }
}

impl Default for LocalMetaStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetaStore for LocalMetaStore {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn insert(&self, meta: &StoredMeta) -> RepositoryResult<RowId> {
        self.check_health("insert_meta")?;

        let mut data = self.data.write();
        data.last_row_id += 1;
        data.insert_count += 1;
        data.meta = Some(meta.clone());
        Ok(RowId::new(data.last_row_id))
    }

    async fn query(&self) -> RepositoryResult<StoredMeta> {
        self.check_health("query_meta")?;

        self.data.read().meta.clone().ok_or_else(|| {
            RepositoryError::not_found_with_context(
                "No meta snapshot stored",
                ErrorContext::new("query_meta").with_entity("meta"),
            )
        })
    }
}
