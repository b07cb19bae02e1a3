use std::io::Write;

use serde::Serialize;

use awsinv_core::{InventoryReport, ResourceRecord, Summary};

use crate::cost::{self, CostEstimate};
use crate::error::OutputResult;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CostedResource<'a> {
    #[serde(flatten)]
    resource: &'a ResourceRecord,
    cost_estimate: CostEstimate,
}

/// The report as serialized, plus per-resource estimates and their total.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CostedReport<'a> {
    resources: Vec<CostedResource<'a>>,
    #[serde(skip_serializing_if = "none")]
    errors: &'a [String],
    #[serde(skip_serializing_if = "none")]
    skipped: &'a [String],
    summary: &'a Summary,
    total_monthly_cost: f64,
}

fn none(items: &&[String]) -> bool {
    items.is_empty()
}

pub(super) fn write<W: Write>(report: &InventoryReport, with_cost: bool, out: &mut W) -> OutputResult<()> {
    if with_cost {
        let resources: Vec<_> = report
            .resources
            .iter()
            .map(|resource| CostedResource {
                resource,
                cost_estimate: cost::estimate(resource),
            })
            .collect();
        let total_monthly_cost = resources.iter().map(|r| r.cost_estimate.monthly_usd).sum();
        let costed = CostedReport {
            resources,
            errors: &report.errors,
            skipped: &report.skipped,
            summary: &report.summary,
            total_monthly_cost,
        };
        serde_json::to_writer_pretty(&mut *out, &costed)?;
    } else {
        serde_json::to_writer_pretty(&mut *out, report)?;
    }
    writeln!(out)?;
    Ok(())
}
