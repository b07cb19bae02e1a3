//! Bounded parallel executor for collection work items.
//!
//! Every work item gets its own tokio task up front; a counting semaphore
//! bounds how many of them are inside a collector call at any instant. Tasks
//! report back over a single channel whose receiver is owned by
//! [`BoundedExecutor::run`], so the outcome buffer has exactly one writer.
//!
//! Under fail-fast a failing task cancels the run before it releases its
//! permit, so no waiting task is admitted after the first failure.
//!
//! Cancellation (run timeout or fail-fast) stops admissions: a task still
//! waiting for a permit gives up and reports itself as skipped. Tasks already
//! inside a collector call are never aborted; they see the cancelled token and
//! may return early, and whatever they return is recorded.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use awsinv_core::{CollectError, CollectionOutcome, Collector, WorkItem};

use crate::registry::CollectorRegistry;

/// Executor policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Maximum collector calls in flight. Zero is clamped to one.
    pub concurrency_limit: usize,
    /// Cancel the run on the first failed outcome.
    pub fail_fast: bool,
    /// Deadline for a single collector call.
    pub task_timeout: Option<Duration>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            concurrency_limit: crate::config::DEFAULT_PARALLELISM,
            fail_fast: false,
            task_timeout: None,
        }
    }
}

impl ExecutorConfig {
    pub fn with_concurrency_limit(mut self, limit: usize) -> Self {
        self.concurrency_limit = limit;
        self
    }

    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    pub fn with_task_timeout(mut self, timeout: Duration) -> Self {
        self.task_timeout = Some(timeout);
        self
    }
}

/// Everything one executor run produced.
///
/// `outcomes.len() + skipped.len()` always equals the number of items given
/// to [`BoundedExecutor::run`]. Outcome order is completion order.
#[derive(Debug, Default)]
pub struct Execution {
    pub outcomes: Vec<CollectionOutcome>,
    pub skipped: Vec<WorkItem>,
}

enum TaskReport {
    Finished(CollectionOutcome),
    Skipped(WorkItem),
}

#[derive(Debug, Clone)]
pub struct BoundedExecutor {
    config: ExecutorConfig,
}

impl BoundedExecutor {
    pub fn new(config: ExecutorConfig) -> Self {
        let mut config = config;
        if config.concurrency_limit == 0 {
            warn!("concurrency limit of 0 requested; clamping to 1");
            config.concurrency_limit = 1;
        }
        Self { config }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Run every item and wait for all of them to finish or be skipped.
    ///
    /// Never fails: collector errors, timeouts and panics become failed
    /// outcomes. Must be called from within a tokio runtime.
    pub async fn run(
        &self,
        items: Vec<WorkItem>,
        registry: &CollectorRegistry,
        cancel: CancellationToken,
    ) -> Execution {
        let total = items.len();
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency_limit));
        let (tx, mut rx) = mpsc::unbounded_channel::<TaskReport>();
        let mut tasks = JoinSet::new();

        debug!(
            items = total,
            limit = self.config.concurrency_limit,
            fail_fast = self.config.fail_fast,
            "scheduling collection tasks"
        );

        for item in items {
            let collector = registry.get(&item.service).cloned();
            let semaphore = Arc::clone(&semaphore);
            let cancel = cancel.clone();
            let tx = tx.clone();
            let task_timeout = self.config.task_timeout;
            let fail_fast = self.config.fail_fast;

            tasks.spawn(async move {
                let report = run_item(item, collector, semaphore, cancel, task_timeout, fail_fast).await;
                // The receiver outlives every task; a send error cannot happen.
                let _ = tx.send(report);
            });
        }
        drop(tx);

        let mut execution = Execution {
            outcomes: Vec::with_capacity(total),
            skipped: Vec::new(),
        };

        // Closes once every task has dropped its sender, i.e. finished.
        while let Some(report) = rx.recv().await {
            match report {
                TaskReport::Finished(outcome) => {
                    if let Some(err) = outcome.error() {
                        warn!(
                            service = %outcome.service,
                            region = %outcome.region,
                            error = %err,
                            "collection failed"
                        );
                    }
                    execution.outcomes.push(outcome);
                }
                TaskReport::Skipped(item) => {
                    debug!(service = %item.service, region = %item.region, "skipped after cancellation");
                    execution.skipped.push(item);
                }
            }
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "collection task did not complete");
            }
        }

        execution
    }
}

async fn run_item(
    item: WorkItem,
    collector: Option<Arc<dyn Collector>>,
    semaphore: Arc<Semaphore>,
    cancel: CancellationToken,
    task_timeout: Option<Duration>,
    fail_fast: bool,
) -> TaskReport {
    let Some(collector) = collector else {
        let err = CollectError::transport(format!("no collector registered for '{}'", item.service));
        if fail_fast {
            cancel.cancel();
        }
        return TaskReport::Finished(CollectionOutcome::failed(item, err));
    };

    let permit = tokio::select! {
        biased;
        _ = cancel.cancelled() => return TaskReport::Skipped(item),
        acquired = semaphore.acquire_owned() => match acquired {
            Ok(permit) => permit,
            Err(_) => return TaskReport::Skipped(item),
        },
    };

    debug!(service = %item.service, region = %item.region, "collecting");

    let call = AssertUnwindSafe(collector.collect(&item.region, cancel.clone())).catch_unwind();
    let result = match task_timeout {
        Some(limit) => match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => Ok(Err(CollectError::Timeout(limit))),
        },
        None => call.await,
    };
    let result = result.unwrap_or_else(|panic| Err(CollectError::Panicked(panic_message(&*panic))));

    // Cancel while still holding the permit, so no waiter can be admitted
    // between this failure and the cancellation.
    if fail_fast && result.is_err() && !cancel.is_cancelled() {
        warn!(service = %item.service, region = %item.region, "fail-fast: cancelling remaining work");
        cancel.cancel();
    }
    drop(permit);

    match result {
        Ok(resources) => {
            debug!(
                service = %item.service,
                region = %item.region,
                resources = resources.len(),
                "collected"
            );
            TaskReport::Finished(CollectionOutcome::succeeded(item, resources))
        }
        Err(err) => TaskReport::Finished(CollectionOutcome::failed(item, err)),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
