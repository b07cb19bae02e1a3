//! Error model.
//!
//! Two layers, kept deliberately apart:
//!
//! - [`InventoryError`]: configuration / setup failures that abort a run before
//!   any collection work starts. These are the only errors a caller of the
//!   orchestrator ever sees as `Err`.
//! - [`CollectError`]: a failure of one collector call for one (service, region)
//!   pair. These are recorded into the report and never abort sibling work.

use std::time::Duration;

use thiserror::Error;

/// Result type for run-level (hard) failures.
pub type InventoryResult<T> = Result<T, InventoryError>;

/// Run-level error. Non-retryable; surfaced before any work is scheduled.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InventoryError {
    /// One or more requested services have no registered collector.
    #[error("invalid services: {}", .0.join(", "))]
    InvalidService(Vec<String>),

    /// One or more requested regions are unknown to the provider.
    #[error("invalid regions: {}", .0.join(", "))]
    InvalidRegion(Vec<String>),

    /// An option value is out of range (e.g. zero parallelism).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Region discovery against the provider failed.
    #[error("failed to discover regions: {0}")]
    RegionDiscovery(String),

    /// Collector registration was rejected (duplicate or malformed name).
    #[error("collector registration failed: {0}")]
    Registration(String),
}

impl InventoryError {
    pub fn invalid_service(name: impl Into<String>) -> Self {
        Self::InvalidService(vec![name.into()])
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn region_discovery(msg: impl Into<String>) -> Self {
        Self::RegionDiscovery(msg.into())
    }

    pub fn registration(msg: impl Into<String>) -> Self {
        Self::Registration(msg.into())
    }
}

/// Failure of a single collector call.
///
/// Terminal for its work item: the executor performs no retries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CollectError {
    /// Network / provider failure that doesn't fit a narrower bucket.
    #[error("{0}")]
    Transport(String),

    /// Provider rate limiting.
    #[error("throttled: {0}")]
    Throttled(String),

    /// Credentials lack permission for the call.
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// A follow-up page request failed mid-listing.
    #[error("pagination failed: {0}")]
    Pagination(String),

    /// The call exceeded its per-call deadline.
    #[error("timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The run was cancelled while the call was in flight.
    #[error("cancelled")]
    Cancelled,

    /// The collector panicked; caught at the task boundary.
    #[error("collector panicked: {0}")]
    Panicked(String),
}

impl CollectError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn throttled(msg: impl Into<String>) -> Self {
        Self::Throttled(msg.into())
    }

    pub fn access_denied(msg: impl Into<String>) -> Self {
        Self::AccessDenied(msg.into())
    }

    pub fn pagination(msg: impl Into<String>) -> Self {
        Self::Pagination(msg.into())
    }
}
