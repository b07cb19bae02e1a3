//! S3 bucket collector.

use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_s3::types::Bucket;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use awsinv_core::{CollectError, Collector, GLOBAL_REGION, ResourceRecord, ServiceName};

use crate::client::{ClientManager, DISCOVERY_REGION};
use crate::convert::{cancellable, to_utc};
use crate::error::classify;
use crate::service::ServiceKind;

/// S3 buckets.
///
/// Bucket listing is account-wide, so this collector runs once, pinned to
/// [`DISCOVERY_REGION`], and reports every bucket under [`GLOBAL_REGION`].
pub struct S3Collector {
    clients: Arc<ClientManager>,
}

impl S3Collector {
    pub fn new(clients: Arc<ClientManager>) -> Self {
        Self { clients }
    }
}

#[async_trait]
impl Collector for S3Collector {
    fn name(&self) -> ServiceName {
        ServiceKind::S3.service_name()
    }

    fn regions(&self) -> Option<Vec<String>> {
        Some(vec![DISCOVERY_REGION.to_string()])
    }

    async fn collect(
        &self,
        region: &str,
        cancel: CancellationToken,
    ) -> Result<Vec<ResourceRecord>, CollectError> {
        let client = self.clients.s3(region);
        let resp = cancellable(&cancel, client.list_buckets().send())
            .await?
            .map_err(|e| classify("ListBuckets", 0, e))?;

        let out: Vec<ResourceRecord> = resp.buckets().iter().filter_map(convert_bucket).collect();
        debug!(buckets = out.len(), "s3 listing complete");
        Ok(out)
    }
}

fn convert_bucket(bucket: &Bucket) -> Option<ResourceRecord> {
    let name = bucket.name()?;
    let mut record = ResourceRecord::new(ServiceKind::S3.as_str(), GLOBAL_REGION, name)
        .with_name(name)
        .with_kind("bucket")
        .with_state("active")
        .with_extra("bucketName", name);
    record.created_at = bucket.creation_date().and_then(to_utc);
    Some(record)
}
