//! Collection run options.

use std::time::Duration;

use awsinv_core::{InventoryError, InventoryResult};

use crate::executor::ExecutorConfig;

/// Default number of collector calls allowed in flight at once.
pub const DEFAULT_PARALLELISM: usize = 12;

/// Default wall-clock budget for a whole run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Options for one collection run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectOptions {
    /// Services to collect; empty means every registered service.
    pub services: Vec<String>,
    /// Regions to collect; empty means every discovered region.
    pub regions: Vec<String>,
    /// Concurrency limit for collector calls (must be >= 1).
    pub parallel: usize,
    /// Overall run timeout. On expiry no new work is admitted.
    pub timeout: Duration,
    /// Optional per-call deadline for a single collector invocation.
    pub task_timeout: Option<Duration>,
    /// Stop admitting new work after the first failed outcome.
    pub fail_fast: bool,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            services: Vec::new(),
            regions: Vec::new(),
            parallel: DEFAULT_PARALLELISM,
            timeout: DEFAULT_TIMEOUT,
            task_timeout: None,
            fail_fast: false,
        }
    }
}

impl CollectOptions {
    pub fn with_services<I, S>(mut self, services: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.services = services.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_regions<I, S>(mut self, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regions = regions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_parallel(mut self, parallel: usize) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_task_timeout(mut self, timeout: Duration) -> Self {
        self.task_timeout = Some(timeout);
        self
    }

    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Reject out-of-range values before any work starts.
    pub fn validate(&self) -> InventoryResult<()> {
        if self.parallel == 0 {
            return Err(InventoryError::invalid_config("parallel must be at least 1"));
        }
        if self.timeout.is_zero() {
            return Err(InventoryError::invalid_config("timeout must be greater than zero"));
        }
        if self.task_timeout.is_some_and(|t| t.is_zero()) {
            return Err(InventoryError::invalid_config(
                "task timeout must be greater than zero",
            ));
        }
        Ok(())
    }

    pub fn executor_config(&self) -> ExecutorConfig {
        ExecutorConfig {
            concurrency_limit: self.parallel,
            fail_fast: self.fail_fast,
            task_timeout: self.task_timeout,
        }
    }
}
