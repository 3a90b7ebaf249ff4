//! Execution contexts for database-bound work.
//!
//! Store calls run on the `database` handle of an [`ExecutionContext`]. In
//! production that handle belongs to a [`DatabaseRuntime`]: a single-threaded
//! tokio runtime driven by its own OS thread, so database work never competes
//! with the network runtime or with the threads consumers observe meta from.

use std::thread::JoinHandle;

use tokio::runtime::{Builder, Handle};
use tokio::sync::oneshot;

/// Handles the repository schedules its work on.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    database: Handle,
}

impl ExecutionContext {
    /// Use `database` for all store calls.
    pub fn new(database: Handle) -> Self {
        Self { database }
    }

    /// Run database work on the runtime of the caller.
    ///
    /// # Panics
    /// Panics when called outside of a tokio runtime.
    pub fn current() -> Self {
        Self::new(Handle::current())
    }

    /// Handle used for store calls.
    pub fn database(&self) -> &Handle {
        &self.database
    }
}

/// A dedicated single-threaded runtime for store calls.
///
/// The runtime keeps running until [`DatabaseRuntime::shutdown`] is called or
/// the value is dropped.
#[derive(Debug)]
pub struct DatabaseRuntime {
    handle: Handle,
    shutdown: Option<oneshot::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl DatabaseRuntime {
    /// Start the runtime on a new thread called `name`.
    pub fn start(name: &str) -> std::io::Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .thread_name(name)
            .build()?;
        let handle = runtime.handle().clone();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let thread = std::thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                runtime.block_on(async {
                    let _ = shutdown_rx.await;
                });
            })?;

        log::info!("Database runtime {:?} started", name);
        Ok(Self {
            handle,
            shutdown: Some(shutdown_tx),
            thread: Some(thread),
        })
    }

    /// Handle for spawning onto this runtime.
    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Execution context whose database work runs on this runtime.
    pub fn execution_context(&self) -> ExecutionContext {
        ExecutionContext::new(self.handle.clone())
    }

    /// Stop the runtime and wait for its thread to exit.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::warn!("Database runtime thread panicked during shutdown");
            }
        }
    }
}

impl Drop for DatabaseRuntime {
    fn drop(&mut self) {
        self.stop();
    }
}
