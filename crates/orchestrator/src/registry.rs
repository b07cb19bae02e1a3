//! Collector registry.
//!
//! Built once at startup and read-only afterwards. Registration is where
//! service names are checked (no duplicates, no empty fixed-region lists), so
//! a later lookup miss can only come from user input, which
//! [`CollectorRegistry::resolve`] turns into [`InventoryError::InvalidService`].

use std::collections::BTreeMap;
use std::sync::Arc;

use awsinv_core::{Collector, InventoryError, InventoryResult, ServiceName};

/// Per-service region constraint: `Some(regions)` pins a service to a fixed
/// set, `None` follows the caller's selection.
pub type RegionHints = BTreeMap<ServiceName, Option<Vec<String>>>;

#[derive(Clone, Default)]
pub struct CollectorRegistry {
    collectors: BTreeMap<ServiceName, Arc<dyn Collector>>,
}

impl std::fmt::Debug for CollectorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectorRegistry")
            .field("services", &self.collectors.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl CollectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collector under the name it reports.
    pub fn register(&mut self, collector: Arc<dyn Collector>) -> InventoryResult<()> {
        let name = collector.name();

        if self.collectors.contains_key(&name) {
            return Err(InventoryError::registration(format!(
                "duplicate collector for service '{name}'"
            )));
        }
        if collector.regions().is_some_and(|r| r.is_empty()) {
            return Err(InventoryError::registration(format!(
                "collector '{name}' declares an empty fixed region list"
            )));
        }

        self.collectors.insert(name, collector);
        Ok(())
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, collector: Arc<dyn Collector>) -> InventoryResult<Self> {
        self.register(collector)?;
        Ok(self)
    }

    pub fn get(&self, service: &ServiceName) -> Option<&Arc<dyn Collector>> {
        self.collectors.get(service)
    }

    /// Registered services, sorted.
    pub fn services(&self) -> Vec<ServiceName> {
        self.collectors.keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.collectors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.collectors.len()
    }

    /// Turn user-supplied service names into registered ones.
    ///
    /// Empty input selects every registered service. Every unknown (or
    /// malformed) name is reported in one error. Duplicates are dropped,
    /// keeping first-seen order.
    pub fn resolve(&self, requested: &[String]) -> InventoryResult<Vec<ServiceName>> {
        if requested.is_empty() {
            return Ok(self.services());
        }

        let mut valid: Vec<ServiceName> = Vec::with_capacity(requested.len());
        let mut invalid = Vec::new();

        for raw in requested {
            match raw.parse::<ServiceName>() {
                Ok(name) if self.collectors.contains_key(&name) => {
                    if !valid.contains(&name) {
                        valid.push(name);
                    }
                }
                _ => invalid.push(raw.trim().to_string()),
            }
        }

        if invalid.is_empty() {
            Ok(valid)
        } else {
            Err(InventoryError::InvalidService(invalid))
        }
    }

    /// Region constraint declared by each registered collector.
    pub fn region_hints(&self) -> RegionHints {
        self.collectors
            .iter()
            .map(|(name, collector)| (name.clone(), collector.regions()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use awsinv_core::{CancellationToken, CollectError, ResourceRecord};

    struct Named {
        name: &'static str,
        regions: Option<Vec<String>>,
    }

    #[async_trait]
    impl Collector for Named {
        fn name(&self) -> ServiceName {
            ServiceName::new(self.name).unwrap()
        }

        fn regions(&self) -> Option<Vec<String>> {
            self.regions.clone()
        }

        async fn collect(
            &self,
            _region: &str,
            _cancel: CancellationToken,
        ) -> Result<Vec<ResourceRecord>, CollectError> {
            Ok(Vec::new())
        }
    }

    fn named(name: &'static str) -> Arc<dyn Collector> {
        Arc::new(Named { name, regions: None })
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = CollectorRegistry::new();
        registry.register(named("ec2")).unwrap();
        let err = registry.register(named("ec2")).unwrap_err();
        assert!(matches!(err, InventoryError::Registration(_)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn empty_fixed_region_list_is_rejected() {
        let err = CollectorRegistry::new()
            .with(Arc::new(Named {
                name: "s3",
                regions: Some(Vec::new()),
            }))
            .unwrap_err();
        assert!(matches!(err, InventoryError::Registration(_)));
    }

    #[test]
    fn resolve_defaults_to_all_services_sorted() {
        let registry = CollectorRegistry::new()
            .with(named("rds"))
            .and_then(|r| r.with(named("ec2")))
            .unwrap();
        let all = registry.resolve(&[]).unwrap();
        let names: Vec<&str> = all.iter().map(ServiceName::as_str).collect();
        assert_eq!(names, vec!["ec2", "rds"]);
    }

    #[test]
    fn resolve_reports_every_unknown_service() {
        let registry = CollectorRegistry::new().with(named("ec2")).unwrap();
        let err = registry
            .resolve(&["ec2".into(), "nope".into(), "Bad Name".into()])
            .unwrap_err();
        assert_eq!(
            err,
            InventoryError::InvalidService(vec!["nope".into(), "Bad Name".into()])
        );
    }

    #[test]
    fn resolve_drops_duplicates() {
        let registry = CollectorRegistry::new().with(named("ec2")).unwrap();
        let resolved = registry.resolve(&["ec2".into(), " ec2".into()]).unwrap();
        assert_eq!(resolved.len(), 1);
    }
}
