//! Meta repository: write-through persistence plus a replay-latest stream.
//!
//! [`MetaRepository`] owns the only shared mutable state of the component, a
//! single current-value cell. Updates are translated, written to the
//! [`MetaStore`] on the database execution context and only then published,
//! so every value a subscriber observes is already durable.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::Stream;
use parking_lot::RwLock;
use tokio::sync::{watch, Mutex};

use super::execution::ExecutionContext;
use super::meta_translator::{network_to_stored, stored_to_domain};
use crate::db::models::StoredMeta;
use crate::db::repository::{MetaStore, RepositoryResult};
use crate::models::Meta;
use crate::network::NetworkMeta;

/// Whether the published meta is backed by the store yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Only the in-memory cold-start value has been published.
    Uninitialized,
    /// The published value equals the last snapshot written to or read from the store.
    Synced { at: DateTime<Utc> },
}

impl SyncState {
    pub fn is_synced(&self) -> bool {
        matches!(self, SyncState::Synced { .. })
    }
}

/// Orchestrates translation, persistence and publication of schedule meta.
///
/// Cloning is cheap; clones share the store, the write lock and the
/// current-value cell.
#[derive(Clone)]
pub struct MetaRepository {
    inner: Arc<Inner>,
    context: ExecutionContext,
}

struct Inner {
    store: Arc<dyn MetaStore>,
    sender: watch::Sender<Meta>,
    // Held across write and publish so the cell always matches the last completed write
    write_lock: Mutex<()>,
    state: RwLock<SyncState>,
}

impl MetaRepository {
    /// Create a repository publishing [`Meta::cold_start`] until the first update.
    pub fn new(store: Arc<dyn MetaStore>, context: ExecutionContext) -> Self {
        let (sender, _) = watch::channel(Meta::cold_start());
        Self {
            inner: Arc::new(Inner {
                store,
                sender,
                write_lock: Mutex::new(()),
                state: RwLock::new(SyncState::Uninitialized),
            }),
            context,
        }
    }

    /// Subscribe to meta changes.
    ///
    /// The first item of the subscription is the current value, delivered
    /// without waiting for an update.
    pub fn meta(&self) -> MetaSubscription {
        MetaSubscription {
            receiver: self.inner.sender.subscribe(),
            primed: false,
        }
    }

    /// Current value of the cell.
    pub fn current_meta(&self) -> Meta {
        self.inner.sender.borrow().clone()
    }

    pub fn sync_state(&self) -> SyncState {
        *self.inner.state.read()
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.sender.receiver_count()
    }

    /// Persist `meta` and publish its application form.
    ///
    /// The write runs as a task on the database context: dropping the returned
    /// future does not abort it, and other subscribers still see the result.
    ///
    /// # Errors
    /// Returns the store's error when the write fails; nothing is published then.
    pub async fn update_meta(&self, meta: NetworkMeta) -> RepositoryResult<()> {
        let inner = Arc::clone(&self.inner);
        let task = self
            .context
            .database()
            .spawn(async move { inner.write_and_publish(meta).await });
        task.await?
    }

    /// Re-read the stored snapshot and publish it.
    ///
    /// Used at start-up to pick up meta persisted by a previous run.
    pub async fn refresh_meta(&self) -> RepositoryResult<Meta> {
        let inner = Arc::clone(&self.inner);
        let task = self
            .context
            .database()
            .spawn(async move { inner.read_and_publish().await });
        task.await?
    }

    /// Check the health of the underlying store.
    pub async fn health_check(&self) -> RepositoryResult<bool> {
        let inner = Arc::clone(&self.inner);
        let task = self
            .context
            .database()
            .spawn(async move { inner.store.health_check().await });
        task.await?
    }
}

impl Inner {
    async fn write_and_publish(&self, network: NetworkMeta) -> RepositoryResult<()> {
        let _guard = self.write_lock.lock().await;

        let stored = network_to_stored(&network);
        let row_id = self.store.insert(&stored).await.map_err(|e| {
            log::warn!("Failed to store meta (version={:?}): {}", stored.version, e);
            e
        })?;
        log::debug!("Stored meta as row {}", row_id);

        self.publish(&stored);
        Ok(())
    }

    async fn read_and_publish(&self) -> RepositoryResult<Meta> {
        let _guard = self.write_lock.lock().await;

        let stored = self.store.query().await.map_err(|e| {
            log::warn!("Failed to read stored meta: {}", e);
            e
        })?;
        Ok(self.publish(&stored))
    }

    fn publish(&self, stored: &StoredMeta) -> Meta {
        let meta = stored_to_domain(stored);
        *self.state.write() = SyncState::Synced { at: Utc::now() };
        log::debug!(
            "Publishing meta version={:?} to {} subscriber(s)",
            meta.version,
            self.sender.receiver_count()
        );
        self.sender.send_replace(meta.clone());
        meta
    }
}

/// Replay-latest subscription to [`MetaRepository::meta`].
///
/// Dropping the subscription stops delivery to it and nothing else.
pub struct MetaSubscription {
    receiver: watch::Receiver<Meta>,
    primed: bool,
}

impl MetaSubscription {
    /// Wait for the next value.
    ///
    /// Returns the current value immediately on the first call. Later calls
    /// wait for the next publication. Values published while the subscriber
    /// was not waiting are conflated into the latest one. Returns `None` once
    /// the repository is gone.
    pub async fn next(&mut self) -> Option<Meta> {
        if !self.primed {
            self.primed = true;
            return Some(self.receiver.borrow_and_update().clone());
        }

        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    /// Value currently held by the cell, without marking it as seen.
    pub fn current(&self) -> Meta {
        self.receiver.borrow().clone()
    }

    /// Turn the subscription into a [`Stream`].
    pub fn into_stream(self) -> impl Stream<Item = Meta> + Send + 'static {
        let mut subscription = self;
        async_stream::stream! {
            while let Some(meta) = subscription.next().await {
                yield meta;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalMetaStore;

    fn repository(store: &LocalMetaStore) -> MetaRepository {
        MetaRepository::new(Arc::new(store.clone()), ExecutionContext::current())
    }

    #[tokio::test]
    async fn test_starts_uninitialized() {
        let store = LocalMetaStore::new();
        let repo = repository(&store);
        assert_eq!(repo.sync_state(), SyncState::Uninitialized);
        assert_eq!(repo.current_meta(), Meta::cold_start());
    }

    #[tokio::test]
    async fn test_update_marks_synced() {
        let store = LocalMetaStore::new();
        let repo = repository(&store);
        repo.update_meta(NetworkMeta::default()).await.unwrap();
        assert!(repo.sync_state().is_synced());
        assert_eq!(store.insert_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_update_stays_uninitialized() {
        let store = LocalMetaStore::new();
        store.set_healthy(false);
        let repo = repository(&store);

        assert!(repo.update_meta(NetworkMeta::default()).await.is_err());
        assert_eq!(repo.sync_state(), SyncState::Uninitialized);
        assert!(!repo.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_refresh_publishes_stored_snapshot() {
        let stored = StoredMeta {
            num_days: 2,
            version: "v7".to_string(),
            ..Default::default()
        };
        let store = LocalMetaStore::with_meta(stored);
        let repo = repository(&store);

        let meta = repo.refresh_meta().await.unwrap();
        assert_eq!(meta.version, "v7");
        assert_eq!(repo.current_meta(), meta);
        assert!(repo.sync_state().is_synced());
    }

    #[tokio::test]
    async fn test_refresh_empty_store_keeps_cold_start() {
        let store = LocalMetaStore::empty();
        let repo = repository(&store);

        assert!(repo.refresh_meta().await.is_err());
        assert_eq!(repo.current_meta(), Meta::cold_start());
    }

    #[tokio::test]
    async fn test_subscription_ends_when_repository_dropped() {
        let store = LocalMetaStore::new();
        let repo = repository(&store);
        let mut subscription = repo.meta();

        assert_eq!(subscription.next().await, Some(Meta::cold_start()));
        drop(repo);
        assert_eq!(subscription.next().await, None);
    }
}
