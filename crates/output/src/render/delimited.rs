use std::io::Write;

use chrono::SecondsFormat;

use awsinv_core::{InventoryReport, ResourceRecord};

use crate::cost::{self, format_usd};
use crate::error::OutputResult;

const HEADER: [&str; 9] = [
    "Service", "Region", "ID", "Name", "Type", "State", "Class", "CreatedAt", "Tags",
];

/// One row per resource; tags are joined as `k=v,k=v`.
///
/// With `with_cost` a trailing `MonthlyCost` column is added.
pub(super) fn write<W: Write>(report: &InventoryReport, with_cost: bool, out: &mut W) -> OutputResult<()> {
    let mut writer = csv::Writer::from_writer(&mut *out);
    if with_cost {
        writer.write_record(HEADER.iter().copied().chain(["MonthlyCost"]))?;
    } else {
        writer.write_record(HEADER)?;
    }
    for record in &report.resources {
        let mut fields = row(record).to_vec();
        if with_cost {
            fields.push(format_usd(cost::estimate(record).monthly_usd));
        }
        writer.write_record(&fields)?;
    }
    writer.flush()?;
    Ok(())
}

fn row(record: &ResourceRecord) -> [String; 9] {
    let tags = record
        .tags
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(",");

    [
        record.service.clone(),
        record.region.clone(),
        record.id.clone(),
        record.name.clone().unwrap_or_default(),
        record.kind.clone().unwrap_or_default(),
        record.state.clone().unwrap_or_default(),
        record.class.clone().unwrap_or_default(),
        record
            .created_at
            .map(|at| at.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_default(),
        tags,
    ]
}
