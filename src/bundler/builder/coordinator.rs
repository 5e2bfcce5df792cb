//! Bounded concurrent task runner.
//!
//! Every task is spawned on a [`JoinSet`] up front and waits for a
//! [`Semaphore`] permit before doing any work, so at most `parallelism` tasks
//! run at once. All tasks are drained even after a failure; there is no
//! mid-flight cancellation.

use crate::bundler::error::{Error, Result};
use std::{future::Future, sync::Arc};
use tokio::{sync::Semaphore, task::JoinSet};

/// Runs `tasks` with at most `parallelism` in flight (minimum 1).
///
/// Returns the task outputs in submission order, or the first error observed
/// in completion order once every task has finished. A panicking task is
/// reported as [`Error::Join`].
pub async fn run_bounded<T, F>(parallelism: usize, tasks: Vec<F>) -> Result<Vec<T>>
where
    T: Send + 'static,
    F: Future<Output = Result<T>> + Send + 'static,
{
    let semaphore = Arc::new(Semaphore::new(parallelism.max(1)));
    let mut join_set = JoinSet::new();
    let total = tasks.len();

    for (index, task) in tasks.into_iter().enumerate() {
        let semaphore = semaphore.clone();
        join_set.spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .map_err(|e| Error::GenericError(format!("task scheduler closed: {e}")))?;
            task.await.map(|output| (index, output))
        });
    }

    let mut first_error = None;
    let mut outputs = Vec::with_capacity(total);

    while let Some(joined) = join_set.join_next().await {
        let result = match joined {
            Ok(result) => result,
            Err(e) => {
                log::error!("packaging task panicked: {e}");
                Err(Error::from(e))
            }
        };
        match result {
            Ok(output) => outputs.push(output),
            Err(e) if first_error.is_none() => first_error = Some(e),
            Err(e) => log::debug!("additional task failure: {e}"),
        }
    }

    if let Some(e) = first_error {
        return Err(e);
    }

    outputs.sort_by_key(|(index, _)| *index);
    Ok(outputs.into_iter().map(|(_, output)| output).collect())
}
