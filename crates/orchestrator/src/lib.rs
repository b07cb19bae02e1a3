//! `awsinv-orchestrator` — fans collection out over the (service × region)
//! matrix and folds the results into one report.
//!
//! ## Pipeline
//!
//! 1. [`CollectorRegistry::resolve`] checks the requested services.
//! 2. The [`RegionCatalog`](awsinv_core::RegionCatalog) discovers or validates regions.
//! 3. [`build_work_items`] expands services × regions, honouring collectors
//!    pinned to fixed regions.
//! 4. [`BoundedExecutor`] runs one task per item under a concurrency cap,
//!    isolating failures per item.
//! 5. [`aggregate`] folds the outcomes into an
//!    [`InventoryReport`](awsinv_core::InventoryReport).
//!
//! Only failures in steps 1–3 are returned as `Err`; everything after that ends
//! up inside the report.

pub mod aggregate;
pub mod config;
pub mod executor;
pub mod matrix;
pub mod orchestrator;
pub mod registry;

pub use aggregate::{aggregate, fold_outcomes};
pub use config::{CollectOptions, DEFAULT_PARALLELISM, DEFAULT_TIMEOUT};
pub use executor::{BoundedExecutor, Execution, ExecutorConfig};
pub use matrix::build_work_items;
pub use orchestrator::Orchestrator;
pub use registry::{CollectorRegistry, RegionHints};
