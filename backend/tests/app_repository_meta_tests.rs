//! Covers `AppRepository::meta` and `AppRepository::update_meta`.

mod support;

use std::time::Duration;

use fahrplan_meta::db::{LocalMetaStore, MetaStore, RepositoryError, StoredMeta};
use fahrplan_meta::models::{HttpHeader, Meta};
use fahrplan_meta::network::NetworkMeta;
use support::{custom_network_meta, testable_app_repository};

fn custom_meta() -> Meta {
    Meta {
        num_days: 4,
        version: "1.2.3".to_string(),
        time_zone_id: Some(chrono_tz::Europe::Berlin),
        title: "37C3".to_string(),
        subtitle: "Unlocked".to_string(),
        http_header: HttpHeader::new("abc", "9000"),
    }
}

#[tokio::test]
async fn test_meta_emits_default_meta() {
    let store = LocalMetaStore::new();
    let app = testable_app_repository(&store);

    let expected = Meta {
        version: "0.0.0".to_string(),
        ..Default::default()
    };
    let actual = app.meta().next().await.unwrap();
    assert_eq!(actual, expected);
}

#[tokio::test]
async fn test_meta_emits_empty_meta() {
    let store = LocalMetaStore::new();
    let app = testable_app_repository(&store);

    app.update_meta(NetworkMeta::default()).await.unwrap();

    let actual = app.meta().next().await.unwrap();
    assert_eq!(actual, Meta::default());
    assert_eq!(actual.version, "");
}

#[tokio::test]
async fn test_meta_emits_custom_meta() {
    let store = LocalMetaStore::new();
    let app = testable_app_repository(&store);

    app.update_meta(custom_network_meta()).await.unwrap();

    let actual = app.meta().next().await.unwrap();
    assert_eq!(actual, custom_meta());
}

#[tokio::test]
async fn test_update_meta_is_written_to_store() {
    let store = LocalMetaStore::new();
    let app = testable_app_repository(&store);

    app.update_meta(custom_network_meta()).await.unwrap();

    let stored = store.query().await.unwrap();
    assert_eq!(stored.version, "1.2.3");
    assert_eq!(stored.time_zone_name.as_deref(), Some("Europe/Berlin"));
    assert_eq!(stored.http_header.e_tag, "abc");
}

#[tokio::test]
async fn test_first_item_is_delivered_without_update() {
    let store = LocalMetaStore::new();
    let app = testable_app_repository(&store);
    let mut subscription = app.meta();

    let first = tokio::time::timeout(Duration::from_secs(1), subscription.next())
        .await
        .expect("current value must be replayed immediately");
    assert_eq!(first, Some(Meta::cold_start()));
}

#[tokio::test]
async fn test_subscriber_receives_subsequent_update() {
    let store = LocalMetaStore::new();
    let app = testable_app_repository(&store);
    let mut subscription = app.meta();

    assert_eq!(subscription.next().await, Some(Meta::cold_start()));

    app.update_meta(custom_network_meta()).await.unwrap();
    assert_eq!(subscription.next().await, Some(custom_meta()));
}

#[tokio::test]
async fn test_identical_updates_emit_twice() {
    let store = LocalMetaStore::new();
    let app = testable_app_repository(&store);
    let mut subscription = app.meta();
    subscription.next().await.unwrap();

    app.update_meta(custom_network_meta()).await.unwrap();
    let first = subscription.next().await.unwrap();

    app.update_meta(custom_network_meta()).await.unwrap();
    let second = tokio::time::timeout(Duration::from_secs(1), subscription.next())
        .await
        .expect("identical update must still be delivered")
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(store.insert_count(), 2);
}

#[tokio::test]
async fn test_unparsable_time_zone_is_absent() {
    let store = LocalMetaStore::new();
    let app = testable_app_repository(&store);

    let network = NetworkMeta {
        time_zone_name: Some("Europe/Atlantis".to_string()),
        ..custom_network_meta()
    };
    app.update_meta(network).await.unwrap();

    let actual = app.meta().next().await.unwrap();
    assert!(actual.time_zone_id.is_none());
    assert_eq!(actual.title, "37C3");

    // The raw name is still persisted
    let stored = store.query().await.unwrap();
    assert_eq!(stored.time_zone_name.as_deref(), Some("Europe/Atlantis"));
}

#[tokio::test]
async fn test_storage_failure_is_surfaced_and_not_published() {
    let store = LocalMetaStore::new();
    let app = testable_app_repository(&store);
    let mut subscription = app.meta();
    assert_eq!(subscription.next().await, Some(Meta::cold_start()));

    store.set_healthy(false);
    let err = app
        .meta_repository()
        .update_meta(custom_network_meta())
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::StorageError { .. }));
    assert!(err.is_retryable());

    // No new emission
    let next = tokio::time::timeout(Duration::from_millis(100), subscription.next()).await;
    assert!(next.is_err());
    assert_eq!(app.meta_repository().current_meta(), Meta::cold_start());

    // Last known good value is kept after a later failure too
    store.set_healthy(true);
    app.update_meta(custom_network_meta()).await.unwrap();
    store.set_healthy(false);
    assert!(app.update_meta(NetworkMeta::default()).await.is_err());
    assert_eq!(app.meta().next().await, Some(custom_meta()));
}

#[tokio::test]
async fn test_app_error_keeps_repository_error_as_source() {
    let store = LocalMetaStore::new();
    store.set_healthy(false);
    let app = testable_app_repository(&store);

    let err = app.update_meta(NetworkMeta::default()).await.unwrap_err();
    assert!(err.to_string().contains("Failed to update meta"));
    assert!(err.downcast_ref::<RepositoryError>().is_some());
}

#[tokio::test]
async fn test_load_persisted_meta() {
    let store = LocalMetaStore::with_meta(StoredMeta {
        num_days: 5,
        version: "2024-05-30".to_string(),
        time_zone_name: Some("Europe/London".to_string()),
        title: "EMF Camp".to_string(),
        subtitle: String::new(),
        ..Default::default()
    });
    let app = testable_app_repository(&store);

    let loaded = app.load_persisted_meta().await.unwrap();
    assert_eq!(loaded.time_zone_id, Some(chrono_tz::Europe::London));
    assert_eq!(app.meta().next().await, Some(loaded));
}
