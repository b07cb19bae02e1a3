//! `awsinv-core` — inventory data model and collaborator contracts.
//!
//! This crate is **pure model**: records, outcomes, the report shape, the
//! error taxonomy, and the traits the orchestrator consumes. No provider SDKs
//! and no scheduling live here.

pub mod collector;
pub mod error;
pub mod report;
pub mod resource;
pub mod service;

pub use collector::{Collector, RegionCatalog, StaticRegionCatalog};
pub use error::{CollectError, InventoryError, InventoryResult};
pub use report::{CollectionOutcome, InventoryReport, Summary, WorkItem};
pub use resource::{ExtraValue, GLOBAL_REGION, ResourceRecord};
pub use service::ServiceName;

pub use tokio_util::sync::CancellationToken;
