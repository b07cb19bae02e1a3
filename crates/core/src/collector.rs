//! Capabilities the orchestrator consumes: collectors and the region catalog.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::{CollectError, InventoryError};
use crate::resource::ResourceRecord;
use crate::service::ServiceName;

/// Retrieves and normalizes the resources of one service in one region.
///
/// One instance per service is registered at startup and shared (read-only)
/// across all concurrent calls, hence `Send + Sync`.
#[async_trait]
pub trait Collector: Send + Sync {
    /// Service this collector answers for.
    fn name(&self) -> ServiceName;

    /// Fixed regions for globally-scoped services.
    ///
    /// `None` means "use whatever regions the caller selected".
    fn regions(&self) -> Option<Vec<String>> {
        None
    }

    /// Collect every resource of this service in `region`.
    ///
    /// `cancel` fires when the run is cancelled (timeout or fail-fast).
    /// Implementations should stop at the next convenient point and return
    /// [`CollectError::Cancelled`]; ignoring it is tolerated.
    async fn collect(
        &self,
        region: &str,
        cancel: CancellationToken,
    ) -> Result<Vec<ResourceRecord>, CollectError>;
}

/// Provider's view of which regions exist.
#[async_trait]
pub trait RegionCatalog: Send + Sync {
    /// Regions enabled for the current account.
    async fn discover_regions(&self) -> Result<Vec<String>, InventoryError>;

    /// Check `requested` against the discovered set.
    ///
    /// Returns the requested regions (in request order, de-duplicated) or
    /// [`InventoryError::InvalidRegion`] naming every unknown one.
    async fn validate_regions(&self, requested: &[String]) -> Result<Vec<String>, InventoryError> {
        let known = self.discover_regions().await?;

        let mut valid: Vec<String> = Vec::with_capacity(requested.len());
        let mut invalid = Vec::new();
        for region in requested {
            let region = region.trim();
            if !known.iter().any(|k| k == region) {
                invalid.push(region.to_string());
            } else if !valid.iter().any(|v| v == region) {
                valid.push(region.to_string());
            }
        }

        if invalid.is_empty() {
            Ok(valid)
        } else {
            Err(InventoryError::InvalidRegion(invalid))
        }
    }
}

/// Fixed region list, for tests and offline runs.
#[derive(Debug, Clone, Default)]
pub struct StaticRegionCatalog {
    regions: Vec<String>,
}

impl StaticRegionCatalog {
    pub fn new<I, S>(regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            regions: regions.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl RegionCatalog for StaticRegionCatalog {
    async fn discover_regions(&self) -> Result<Vec<String>, InventoryError> {
        Ok(self.regions.clone())
    }
}
