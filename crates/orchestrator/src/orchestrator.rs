//! Top-level collection entry point.

use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use awsinv_core::{InventoryReport, InventoryResult, RegionCatalog, ServiceName};

use crate::aggregate::aggregate;
use crate::config::CollectOptions;
use crate::executor::BoundedExecutor;
use crate::matrix::build_work_items;
use crate::registry::CollectorRegistry;

/// Runs inventory collections over a fixed collector registry.
///
/// Stateless across runs; the registry and catalog are shared read-only.
#[derive(Clone)]
pub struct Orchestrator {
    registry: Arc<CollectorRegistry>,
    catalog: Arc<dyn RegionCatalog>,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    pub fn new(registry: CollectorRegistry, catalog: Arc<dyn RegionCatalog>) -> Self {
        Self {
            registry: Arc::new(registry),
            catalog,
        }
    }

    /// Registered services, sorted.
    pub fn available_services(&self) -> Vec<ServiceName> {
        self.registry.services()
    }

    /// Collect across the selected services and regions.
    ///
    /// Returns `Err` only for configuration problems detected before any work
    /// starts (unknown service, unknown region, bad option values, region
    /// discovery failure). Per-item failures land in the report.
    pub async fn collect(&self, options: &CollectOptions) -> InventoryResult<InventoryReport> {
        self.collect_with_cancel(options, CancellationToken::new()).await
    }

    /// Like [`collect`](Self::collect), but also stops admitting work when
    /// `cancel` fires. Fail-fast and timeout cancel a child of `cancel`, never
    /// `cancel` itself.
    pub async fn collect_with_cancel(
        &self,
        options: &CollectOptions,
        cancel: CancellationToken,
    ) -> InventoryResult<InventoryReport> {
        let started_at = Instant::now();

        options.validate()?;
        let services = self.registry.resolve(&options.services)?;
        let regions = self.prepare_regions(&options.regions).await?;
        let items = build_work_items(&services, &regions, &self.registry.region_hints())?;

        info!(
            services = services.len(),
            regions = regions.len(),
            items = items.len(),
            limit = options.parallel,
            fail_fast = options.fail_fast,
            "starting collection"
        );

        let run_cancel = cancel.child_token();
        let watchdog = {
            let run_cancel = run_cancel.clone();
            let timeout = options.timeout;
            tokio::spawn(async move {
                tokio::select! {
                    _ = run_cancel.cancelled() => {}
                    _ = tokio::time::sleep(timeout) => {
                        warn!(timeout_ms = timeout.as_millis() as u64, "collection timed out; cancelling remaining work");
                        run_cancel.cancel();
                    }
                }
            })
        };

        let executor = BoundedExecutor::new(options.executor_config());
        let execution = executor.run(items, &self.registry, run_cancel).await;
        watchdog.abort();

        let report = aggregate(&execution.outcomes, &execution.skipped, started_at);

        info!(
            resources = report.summary.total_resources,
            errors = report.summary.error_count,
            skipped = report.summary.skipped_count,
            duration_ms = report.summary.duration.as_millis() as u64,
            "collection complete"
        );

        Ok(report)
    }

    async fn prepare_regions(&self, requested: &[String]) -> InventoryResult<Vec<String>> {
        if requested.is_empty() {
            self.catalog.discover_regions().await
        } else {
            self.catalog.validate_regions(requested).await
        }
    }
}
