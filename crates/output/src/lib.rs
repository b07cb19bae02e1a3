//! `awsinv-output` — read-only views over an
//! [`InventoryReport`](awsinv_core::InventoryReport).
//!
//! Filters and a sort key select and order the resources; a renderer writes
//! the result as a table, JSON or CSV, optionally with rough monthly cost
//! estimates. Nothing here mutates the report.

pub mod cost;
pub mod error;
pub mod filter;
pub mod render;
pub mod sort;

pub use cost::{CostEstimate, CostSummary, estimate, summarize};
pub use error::{OutputError, OutputResult};
pub use filter::{Filter, apply_filters, parse_filters};
pub use render::{OutputFormat, RenderOptions, render, select};
pub use sort::{SortKey, sort_resources};
