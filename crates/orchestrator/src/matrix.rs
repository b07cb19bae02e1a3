//! Work matrix: expands selected services × selected regions into work items.

use std::collections::HashSet;

use awsinv_core::{InventoryError, InventoryResult, ServiceName, WorkItem};

use crate::registry::RegionHints;

/// Expand `services` × `regions` into concrete work items.
///
/// A service whose collector pins a fixed region list gets one item per
/// pinned region and ignores `regions`; every other service gets one item per
/// selected region. Output order follows `services`, then regions. No
/// `(service, region)` pair appears twice.
///
/// `regions` is expected to be validated against the provider already; this
/// only rejects blank or whitespace-carrying names. Pure: no I/O.
pub fn build_work_items(
    services: &[ServiceName],
    regions: &[String],
    hints: &RegionHints,
) -> InventoryResult<Vec<WorkItem>> {
    let unknown: Vec<String> = services
        .iter()
        .filter(|s| !hints.contains_key(*s))
        .map(ToString::to_string)
        .collect();
    if !unknown.is_empty() {
        return Err(InventoryError::InvalidService(unknown));
    }

    let malformed: Vec<String> = regions
        .iter()
        .filter(|r| r.is_empty() || r.chars().any(char::is_whitespace))
        .cloned()
        .collect();
    if !malformed.is_empty() {
        return Err(InventoryError::InvalidRegion(malformed));
    }

    let mut seen: HashSet<(&ServiceName, &str)> = HashSet::new();
    let mut items = Vec::new();

    for service in services {
        let targets: &[String] = match hints.get(service) {
            Some(Some(pinned)) => pinned.as_slice(),
            _ => regions,
        };

        for region in targets {
            if seen.insert((service, region.as_str())) {
                items.push(WorkItem::new(service.clone(), region.clone()));
            }
        }
    }

    Ok(items)
}
