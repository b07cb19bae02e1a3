//! Report renderers.

mod delimited;
mod json;
mod table;

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use awsinv_core::InventoryReport;

use crate::error::{OutputError, OutputResult};
use crate::filter::{Filter, apply_filters};
use crate::sort::{SortKey, sort_resources};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = OutputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(OutputError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub format: OutputFormat,
    pub filters: Vec<Filter>,
    pub sort: SortKey,
    /// Add rough monthly cost estimates to the output.
    pub cost: bool,
}

impl RenderOptions {
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_filters(mut self, filters: Vec<Filter>) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_cost(mut self, cost: bool) -> Self {
        self.cost = cost;
        self
    }
}

/// A copy of `report` holding only the filtered resources, sorted.
///
/// Summary, errors and skipped items describe the whole collection and are
/// carried over unchanged.
pub fn select(report: &InventoryReport, options: &RenderOptions) -> InventoryReport {
    let mut kept = apply_filters(&report.resources, &options.filters);
    sort_resources(&mut kept, options.sort);

    InventoryReport {
        resources: kept.into_iter().cloned().collect(),
        errors: report.errors.clone(),
        skipped: report.skipped.clone(),
        summary: report.summary.clone(),
    }
}

/// Write `report` to `out` in the format named by `options`.
pub fn render<W: Write>(report: &InventoryReport, options: &RenderOptions, out: &mut W) -> OutputResult<()> {
    let view = select(report, options);
    match options.format {
        OutputFormat::Table => table::write(&view, options.cost, out),
        OutputFormat::Json => json::write(&view, options.cost, out),
        OutputFormat::Csv => delimited::write(&view, options.cost, out),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::parse_filters;

    #[test]
    fn select_filters_then_sorts() {
        let options = RenderOptions::default().with_filters(parse_filters(&["service=ec2"]).unwrap());
        let view = select(&fixtures::report(), &options);
        let ids: Vec<_> = view.resources.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["i-1", "i-2"]);
        assert_eq!(view.summary.total_resources, 3);
        assert_eq!(view.errors.len(), 1);
    }

    #[test]
    fn select_leaves_report_untouched() {
        let report = fixtures::report();
        let before = report.clone();
        let _ = select(&report, &RenderOptions::default().with_sort(SortKey::Name));
        assert_eq!(report, before);
    }

    #[test]
    fn cost_is_opt_in() {
        let report = fixtures::report();
        let mut plain = Vec::new();
        render(&report, &RenderOptions::default(), &mut plain).unwrap();
        assert!(!String::from_utf8(plain).unwrap().contains("MONTHLY_COST"));

        let mut costed = Vec::new();
        render(&report, &RenderOptions::default().with_cost(true), &mut costed).unwrap();
        assert!(String::from_utf8(costed).unwrap().contains("MONTHLY_COST"));
    }

    #[test]
    fn formats_parse() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("html".parse::<OutputFormat>().is_err());
    }
}
