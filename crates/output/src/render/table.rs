use std::collections::BTreeMap;
use std::io::Write;

use tabled::Tabled;
use tabled::settings::{Padding, Style};

use awsinv_core::{InventoryReport, ResourceRecord};

use crate::cost::{self, CostSummary, format_usd};
use crate::error::OutputResult;

#[derive(Tabled)]
#[tabled(rename_all = "SCREAMING_SNAKE_CASE")]
struct ResourceRow<'a> {
    service: &'a str,
    region: &'a str,
    id: &'a str,
    name: &'a str,
    #[tabled(rename = "TYPE")]
    kind: &'a str,
    state: &'a str,
    class: &'a str,
}

impl<'a> From<&'a ResourceRecord> for ResourceRow<'a> {
    fn from(r: &'a ResourceRecord) -> Self {
        Self {
            service: &r.service,
            region: &r.region,
            id: &r.id,
            name: dash(r.name.as_deref()),
            kind: dash(r.kind.as_deref()),
            state: dash(r.state.as_deref()),
            class: dash(r.class.as_deref()),
        }
    }
}

#[derive(Tabled)]
#[tabled(rename_all = "SCREAMING_SNAKE_CASE")]
struct CostedRow<'a> {
    #[tabled(inline)]
    resource: ResourceRow<'a>,
    monthly_cost: String,
}

impl<'a> From<&'a ResourceRecord> for CostedRow<'a> {
    fn from(r: &'a ResourceRecord) -> Self {
        Self {
            resource: ResourceRow::from(r),
            monthly_cost: format_usd(cost::estimate(r).monthly_usd),
        }
    }
}

#[derive(Tabled)]
#[tabled(rename_all = "SCREAMING_SNAKE_CASE")]
struct CountRow<'a> {
    key: &'a str,
    count: usize,
}

#[derive(Tabled)]
#[tabled(rename_all = "SCREAMING_SNAKE_CASE")]
struct CountCostRow<'a> {
    key: &'a str,
    count: usize,
    monthly_cost: String,
}

fn dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

fn table<T: Tabled>(rows: impl IntoIterator<Item = T>) -> String {
    tabled::Table::new(rows)
        .with(Style::empty())
        .with(Padding::new(0, 1, 0, 0))
        .to_string()
}

fn counts<W: Write>(
    out: &mut W,
    title: &str,
    counts: &BTreeMap<String, usize>,
    costs: Option<&BTreeMap<String, f64>>,
) -> OutputResult<()> {
    if counts.is_empty() {
        return Ok(());
    }
    writeln!(out, "\n{title}:")?;
    let rendered = match costs {
        Some(costs) => table(counts.iter().map(|(key, count)| CountCostRow {
            key,
            count: *count,
            monthly_cost: format_usd(costs.get(key).copied().unwrap_or_default()),
        })),
        None => table(counts.iter().map(|(key, count)| CountRow { key, count: *count })),
    };
    writeln!(out, "{rendered}")?;
    Ok(())
}

/// Summary block, breakdowns, errors, then one row per resource.
///
/// With `with_cost`, estimates cover the shown resources only.
pub(super) fn write<W: Write>(report: &InventoryReport, with_cost: bool, out: &mut W) -> OutputResult<()> {
    let summary = &report.summary;
    let costs: Option<CostSummary> = with_cost.then(|| cost::summarize(&report.resources));

    writeln!(out, "AWS Resource Inventory Summary")?;
    writeln!(out, "==============================")?;
    writeln!(
        out,
        "Resources: {} shown, {} collected",
        report.resources.len(),
        summary.total_resources
    )?;
    writeln!(out, "Duration:  {:.3}s", summary.duration.as_secs_f64())?;
    writeln!(out, "Errors:    {}", summary.error_count)?;
    if summary.skipped_count > 0 {
        writeln!(out, "Skipped:   {}", summary.skipped_count)?;
    }
    if let Some(costs) = &costs {
        writeln!(out, "Estimated Monthly Cost: {}", format_usd(costs.total))?;
    }

    counts(out, "By Service", &summary.by_service, costs.as_ref().map(|c| &c.by_service))?;
    counts(out, "By Region", &summary.by_region, costs.as_ref().map(|c| &c.by_region))?;
    counts(out, "By State", &summary.by_state, None)?;

    if report.has_errors() {
        writeln!(out, "\nErrors:")?;
        for err in &report.errors {
            writeln!(out, "  {err}")?;
        }
    }
    if !report.skipped.is_empty() {
        writeln!(out, "\nSkipped:")?;
        for item in &report.skipped {
            writeln!(out, "  {item}")?;
        }
    }

    writeln!(out)?;
    if report.resources.is_empty() {
        writeln!(out, "No resources found.")?;
    } else if with_cost {
        writeln!(out, "{}", table(report.resources.iter().map(CostedRow::from)))?;
    } else {
        writeln!(out, "{}", table(report.resources.iter().map(ResourceRow::from)))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::fixtures;

    fn render_with(report: &InventoryReport, with_cost: bool) -> String {
        let mut buf = Vec::new();
        write(report, with_cost, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn render(report: &InventoryReport) -> String {
        render_with(report, false)
    }

    #[test]
    fn table_lists_summary_errors_and_rows() {
        let text = render(&fixtures::report());

        assert!(text.contains("Resources: 3 shown, 3 collected"));
        assert!(text.contains("Duration:  1.500s"));
        assert!(text.contains("By Service:"));
        assert!(text.contains("lambda/ap-south-1: access denied"));
        assert!(text.contains("SERVICE"));
        assert!(text.contains("orders-db"));
        assert!(text.contains("db.t3.medium"));
    }

    #[test]
    fn cost_adds_total_breakdowns_and_column() {
        let text = render_with(&fixtures::report(), true);

        // db.t3.medium 60.00 + running t3.micro 8.47; the stopped t3.large is free.
        assert!(text.contains("Estimated Monthly Cost: $68.47"));
        assert!(text.contains("MONTHLY_COST"));
        let web = text.lines().find(|l| l.contains("i-1")).unwrap();
        assert!(web.contains("$8.47"));
        let stopped = text.lines().find(|l| l.contains("i-2")).unwrap();
        assert!(stopped.contains("$0.00"));
        let eu = text.lines().find(|l| l.starts_with("eu-west-1")).unwrap();
        assert!(eu.contains("$60.00"));
    }

    #[test]
    fn plain_table_has_no_cost() {
        let text = render(&fixtures::report());
        assert!(!text.contains("Estimated Monthly Cost"));
        assert!(!text.contains("MONTHLY_COST"));
    }

    #[test]
    fn missing_fields_render_as_dash() {
        let mut report = fixtures::report();
        report.resources = vec![ResourceRecord::new("s3", "global", "logs")];
        let text = render(&report);
        let row = text.lines().find(|l| l.starts_with("s3")).unwrap();
        assert!(row.contains('-'));
    }

    #[test]
    fn empty_report_says_so() {
        let text = render(&InventoryReport::default());
        assert!(text.contains("No resources found."));
        assert!(!text.contains("By Service:"));
    }
}
