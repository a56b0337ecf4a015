//! Bounded fan-out for per-item enrichment
//!
//! Every item gets its own task; at most `limit` of them run at once. Outputs
//! come back in the position of their input regardless of completion order.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Runs `task` over every item with at most `limit` tasks in flight
///
/// A task that panics leaves `None` in its slot; the caller decides the
/// default for that position.
///
/// # Examples
///
/// ```
/// use anime_harvest::crawler::run_bounded;
///
/// # #[tokio::main]
/// # async fn main() {
/// let doubled = run_bounded(vec![1, 2, 3], 2, |n| async move { n * 2 }).await;
/// assert_eq!(doubled, vec![Some(2), Some(4), Some(6)]);
/// # }
/// ```
pub async fn run_bounded<I, O, F, Fut>(items: Vec<I>, limit: usize, task: F) -> Vec<Option<O>>
where
    F: Fn(I) -> Fut,
    Fut: Future<Output = O> + Send + 'static,
    O: Send + 'static,
{
    let semaphore = Arc::new(Semaphore::new(limit.max(1)));
    let mut results: Vec<Option<O>> = Vec::with_capacity(items.len());
    let mut set = JoinSet::new();

    for (index, item) in items.into_iter().enumerate() {
        results.push(None);
        let future = task(item);
        let semaphore = Arc::clone(&semaphore);

        set.spawn(async move {
            let _permit = semaphore.acquire_owned().await.ok();
            (index, future.await)
        });
    }

    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((index, output)) => results[index] = Some(output),
            Err(e) => tracing::warn!("Enrichment task failed: {}", e),
        }
    }

    results
}
