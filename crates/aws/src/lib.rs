//! `awsinv-aws` — AWS-backed collectors and region discovery.
//!
//! [`ClientManager`] owns the shared SDK configuration and hands out
//! per-region copies. It doubles as the [`RegionCatalog`](awsinv_core::RegionCatalog)
//! used by the orchestrator. Each collector in [`collectors`] lists one
//! resource type for one region.

pub mod client;
pub mod collectors;
pub mod error;
pub mod service;

mod convert;

pub use client::{AwsSettings, ClientManager, DISCOVERY_REGION};
pub use service::{ServiceKind, build_collectors};
