//! RDS DB instance collector.

use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_rds::types::DbInstance;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use awsinv_core::{CollectError, Collector, ResourceRecord, ServiceName};

use crate::client::ClientManager;
use crate::convert::{cancellable, tags, to_utc};
use crate::error::classify;
use crate::service::ServiceKind;

/// RDS DB instances. Aurora clusters appear through their member instances.
pub struct RdsCollector {
    clients: Arc<ClientManager>,
}

impl RdsCollector {
    pub fn new(clients: Arc<ClientManager>) -> Self {
        Self { clients }
    }
}

#[async_trait]
impl Collector for RdsCollector {
    fn name(&self) -> ServiceName {
        ServiceKind::Rds.service_name()
    }

    async fn collect(
        &self,
        region: &str,
        cancel: CancellationToken,
    ) -> Result<Vec<ResourceRecord>, CollectError> {
        let client = self.clients.rds(region);
        let mut out = Vec::new();
        let mut marker: Option<String> = None;
        let mut page = 0;

        loop {
            let request = client.describe_db_instances().set_marker(marker.take());
            let resp = cancellable(&cancel, request.send())
                .await?
                .map_err(|e| classify("DescribeDBInstances", page, e))?;

            out.extend(resp.db_instances().iter().filter_map(|i| convert_db_instance(i, region)));

            marker = resp.marker().map(str::to_string);
            page += 1;
            if marker.is_none() {
                break;
            }
        }

        debug!(region, pages = page, instances = out.len(), "rds listing complete");
        Ok(out)
    }
}

fn convert_db_instance(instance: &DbInstance, region: &str) -> Option<ResourceRecord> {
    let id = instance.db_instance_identifier()?;
    let mut record = ResourceRecord::new(ServiceKind::Rds.as_str(), region, id).with_name(id);

    record.kind = instance.engine().map(str::to_string);
    record.state = instance.db_instance_status().map(str::to_string);
    record.class = instance.db_instance_class().map(str::to_string);
    record.created_at = instance.instance_create_time().and_then(to_utc);
    record.tags = tags(instance.tag_list().iter().map(|t| (t.key(), t.value())));

    if let Some(version) = instance.engine_version() {
        record = record.with_extra("engineVersion", version);
    }
    if let Some(endpoint) = instance.endpoint() {
        if let Some(address) = endpoint.address() {
            record = record.with_extra("endpoint", address);
        }
        if let Some(port) = endpoint.port() {
            record = record.with_extra("port", port);
        }
    }
    if let Some(az) = instance.availability_zone() {
        record = record.with_extra("availabilityZone", az);
    }
    if let Some(multi_az) = instance.multi_az() {
        record = record.with_extra("multiAZ", multi_az);
    }
    if let Some(encrypted) = instance.storage_encrypted() {
        record = record.with_extra("storageEncrypted", encrypted);
    }
    if let Some(storage) = instance.allocated_storage() {
        record = record.with_extra("allocatedStorage", storage);
    }
    if let Some(storage_type) = instance.storage_type() {
        record = record.with_extra("storageType", storage_type);
    }
    if let Some(protected) = instance.deletion_protection() {
        record = record.with_extra("deletionProtection", protected);
    }
    if let Some(retention) = instance.backup_retention_period() {
        record = record.with_extra("backupRetentionPeriod", retention);
    }

    Some(record)
}
