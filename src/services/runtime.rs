//! Tokio Runtime Bridge
//!
//! Resource loads and scheduled reloads may be started from synchronous
//! view code that has no runtime of its own. Work is spawned onto the
//! ambient tokio runtime when one is running, otherwise onto a shared
//! background runtime created on first use.
//!
//! ```text
//! view code (sync)
//!       │
//!       ▼
//! spawn_in_tokio(async { ... })
//!       │
//!       ▼
//! Handle::try_current() ──or── shared Runtime
//! ```

use std::future::Future;
use std::sync::OnceLock;
use std::time::Duration;
use tokio::runtime::{Handle, Runtime};

/// Shared background runtime
static TOKIO_RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Get or initialize the shared runtime
fn get_runtime() -> &'static Runtime {
    TOKIO_RUNTIME.get_or_init(|| {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("i18n-sync")
            .enable_all()
            .build()
            .expect("Failed to create tokio runtime")
    })
}

/// Handle of the ambient runtime, or of the shared one
pub fn runtime_handle() -> Handle {
    Handle::try_current().unwrap_or_else(|_| get_runtime().handle().clone())
}

/// Spawn a detached task
pub fn spawn_in_tokio<F>(future: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    runtime_handle().spawn(future);
}

/// Spawn a detached task that starts after `delay`.
///
/// There is no way to cancel it once scheduled.
pub fn spawn_delayed<F>(name: &'static str, delay: Duration, future: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    tracing::debug!(task = name, delay_ms = delay.as_millis() as u64, "Scheduling task");
    spawn_in_tokio(async move {
        tokio::time::sleep(delay).await;
        future.await;
        tracing::debug!(task = name, "Scheduled task completed");
    });
}

/// Block on a future on the shared runtime.
///
/// Must not be called from inside a runtime; meant for the demo binary and
/// other synchronous entry points.
pub fn block_on<F, T>(future: F) -> T
where
    F: Future<Output = T>,
{
    get_runtime().block_on(future)
}
