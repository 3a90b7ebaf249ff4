//! # Fahrplan meta
//!
//! Keeps the meta information of an event schedule (version, number of days,
//! time zone, title, subtitle and HTTP caching headers) in sync between the
//! schedule fetcher, a local store and in-process observers.
//!
//! ## Architecture
//!
//! - [`network`]: Wire shape produced by the schedule fetcher
//! - [`db`]: Persisted shape, the [`db::MetaStore`] trait and its backends
//! - [`models`]: Application shape handed to consumers
//! - [`services`]: Translation, execution contexts and the replay-latest [`services::MetaRepository`]
//! - [`app`]: Composition root
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use fahrplan_meta::app::AppRepository;
//! use fahrplan_meta::db::LocalMetaStore;
//! use fahrplan_meta::network::NetworkMeta;
//! use fahrplan_meta::services::ExecutionContext;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let app = AppRepository::initialize(ExecutionContext::current(), Arc::new(LocalMetaStore::new()));
//! let mut meta = app.meta();
//! assert_eq!(meta.next().await.unwrap().version, "0.0.0");
//!
//! app.update_meta(NetworkMeta { version: Some("1.0".into()), ..Default::default() }).await.unwrap();
//! assert_eq!(meta.next().await.unwrap().version, "1.0");
//! # });
//! ```

pub mod app;
pub mod db;
pub mod models;
pub mod network;
pub mod services;
