#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use fahrplan_meta::app::AppRepository;
use fahrplan_meta::db::LocalMetaStore;
use fahrplan_meta::network::{NetworkHttpHeader, NetworkMeta};
use fahrplan_meta::services::ExecutionContext;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// App repository on the test runtime, backed by `store`.
///
/// Must be called from within a tokio runtime.
pub fn testable_app_repository(store: &LocalMetaStore) -> AppRepository {
    AppRepository::initialize(ExecutionContext::current(), Arc::new(store.clone()))
}

/// Network meta carrying every field.
pub fn custom_network_meta() -> NetworkMeta {
    NetworkMeta {
        num_days: Some(4),
        version: Some("1.2.3".to_string()),
        time_zone_name: Some("Europe/Berlin".to_string()),
        title: Some("37C3".to_string()),
        subtitle: Some("Unlocked".to_string()),
        http_header: NetworkHttpHeader {
            e_tag: Some("abc".to_string()),
            last_modified: Some("9000".to_string()),
        },
    }
}

/// Network meta that differs from others only by its version.
pub fn versioned_network_meta(version: impl Into<String>) -> NetworkMeta {
    NetworkMeta {
        version: Some(version.into()),
        ..custom_network_meta()
    }
}

/// Runs `f` with environment variables temporarily modified.
///
/// Restores the variables on unwind and serializes access to the process
/// environment across tests running in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}
