//! Work items, per-item outcomes and the aggregated inventory report.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CollectError;
use crate::resource::ResourceRecord;
use crate::service::ServiceName;

/// A single (service, region) unit of collection work.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WorkItem {
    pub service: ServiceName,
    pub region: String,
}

impl WorkItem {
    pub fn new(service: ServiceName, region: impl Into<String>) -> Self {
        Self {
            service,
            region: region.into(),
        }
    }
}

impl core::fmt::Display for WorkItem {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.service, self.region)
    }
}

/// Result of executing one [`WorkItem`].
///
/// Either the records the collector returned (possibly none) or the error
/// that ended the call; never both.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionOutcome {
    pub service: ServiceName,
    pub region: String,
    pub result: Result<Vec<ResourceRecord>, CollectError>,
}

impl CollectionOutcome {
    pub fn succeeded(item: WorkItem, resources: Vec<ResourceRecord>) -> Self {
        Self {
            service: item.service,
            region: item.region,
            result: Ok(resources),
        }
    }

    pub fn failed(item: WorkItem, error: CollectError) -> Self {
        Self {
            service: item.service,
            region: item.region,
            result: Err(error),
        }
    }

    pub fn is_error(&self) -> bool {
        self.result.is_err()
    }

    pub fn error(&self) -> Option<&CollectError> {
        self.result.as_ref().err()
    }

    /// Records for a successful outcome; empty for a failed one.
    pub fn resources(&self) -> &[ResourceRecord] {
        match &self.result {
            Ok(resources) => resources,
            Err(_) => &[],
        }
    }
}

/// Summary statistics over the merged resources.
///
/// `total_resources` equals the number of merged records and each count map
/// sums to it (`by_state` only counts records with a non-empty state).
/// Failed outcomes contribute only to `error_count`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_resources: usize,
    pub by_service: BTreeMap<String, usize>,
    pub by_region: BTreeMap<String, usize>,
    pub by_state: BTreeMap<String, usize>,
    pub error_count: usize,
    pub skipped_count: usize,
    #[serde(rename = "durationMs", with = "duration_ms")]
    pub duration: Duration,
    pub regions: BTreeSet<String>,
    pub services: BTreeSet<String>,
}

/// Final, caller-visible artifact of one collection run.
///
/// Built once by the aggregator; consumers (renderers, filters) treat it as
/// read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryReport {
    pub resources: Vec<ResourceRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    /// `service/region` pairs that never ran because the run was cancelled.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
    pub summary: Summary,
}

impl InventoryReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
