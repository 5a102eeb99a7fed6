//! Bounded worker pool shared by the fetch, extraction and scoring stages.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::{timeout_at, Instant};
use tracing::error;

use crate::errors::CapabilityError;

/// Runs `worker` over every item with at most `limit` in flight, then waits for all of them.
///
/// Results come back in completion order. A worker that panics is logged and
/// contributes no result. Dropping the returned future aborts outstanding workers.
pub async fn run_bounded<T, R, F, Fut>(items: Vec<T>, limit: usize, worker: F) -> Vec<R>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> Fut,
    Fut: Future<Output = R> + Send + 'static,
{
    let semaphore = Arc::new(Semaphore::new(limit.max(1)));
    let mut tasks = JoinSet::new();

    for item in items {
        let semaphore = Arc::clone(&semaphore);
        let work = worker(item);
        tasks.spawn(async move {
            // Held until the worker finishes. The semaphore is never closed.
            let _permit = semaphore.acquire_owned().await;
            work.await
        });
    }

    let mut results = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(result) => results.push(result),
            Err(e) => error!("Pipeline worker failed: {e}"),
        }
    }
    results
}

/// Bounds a capability call by the run deadline, if there is one.
pub async fn with_deadline<T, F>(deadline: Option<Instant>, call: F) -> Result<T, CapabilityError>
where
    F: Future<Output = Result<T, CapabilityError>>,
{
    match deadline {
        Some(deadline) => timeout_at(deadline, call)
            .await
            .map_err(|_| CapabilityError::DeadlineExceeded)?,
        None => call.await,
    }
}
