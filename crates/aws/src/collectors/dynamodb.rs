//! DynamoDB table collector.

use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::TableDescription;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use awsinv_core::{CollectError, Collector, ResourceRecord, ServiceName};

use crate::client::ClientManager;
use crate::convert::{cancellable, to_utc};
use crate::error::classify;
use crate::service::ServiceKind;

/// DynamoDB tables.
///
/// `ListTables` only returns names, so each table is described individually.
/// A table whose description fails is logged and left out; the listing itself
/// failing fails the whole call.
pub struct DynamoDbCollector {
    clients: Arc<ClientManager>,
}

impl DynamoDbCollector {
    pub fn new(clients: Arc<ClientManager>) -> Self {
        Self { clients }
    }
}

#[async_trait]
impl Collector for DynamoDbCollector {
    fn name(&self) -> ServiceName {
        ServiceKind::DynamoDb.service_name()
    }

    async fn collect(
        &self,
        region: &str,
        cancel: CancellationToken,
    ) -> Result<Vec<ResourceRecord>, CollectError> {
        let client = self.clients.dynamodb(region);
        let mut out = Vec::new();
        let mut start: Option<String> = None;
        let mut page = 0;

        loop {
            let request = client.list_tables().set_exclusive_start_table_name(start.take());
            let resp = cancellable(&cancel, request.send())
                .await?
                .map_err(|e| classify("ListTables", page, e))?;

            for table in resp.table_names() {
                if let Some(description) = describe(&client, table, &cancel).await? {
                    out.extend(convert_table(&description, region));
                }
            }

            start = resp.last_evaluated_table_name().map(str::to_string);
            page += 1;
            if start.is_none() {
                break;
            }
        }

        debug!(region, pages = page, tables = out.len(), "dynamodb listing complete");
        Ok(out)
    }
}

async fn describe(
    client: &Client,
    table: &str,
    cancel: &CancellationToken,
) -> Result<Option<TableDescription>, CollectError> {
    match cancellable(cancel, client.describe_table().table_name(table).send()).await? {
        Ok(resp) => Ok(resp.table().cloned()),
        Err(e) => {
            warn!(table, error = %classify("DescribeTable", 0, e), "skipping table");
            Ok(None)
        }
    }
}

fn convert_table(table: &TableDescription, region: &str) -> Option<ResourceRecord> {
    let name = table.table_name()?;
    let mut record = ResourceRecord::new(ServiceKind::DynamoDb.as_str(), region, name)
        .with_name(name)
        .with_kind("table")
        .with_class("table");

    record.state = table.table_status().map(|s| s.as_str().to_string());
    record.created_at = table.creation_date_time().and_then(to_utc);

    if let Some(arn) = table.table_arn() {
        record = record.with_extra("tableArn", arn);
    }
    if let Some(id) = table.table_id() {
        record = record.with_extra("tableId", id);
    }
    if let Some(items) = table.item_count() {
        record = record.with_extra("itemCount", items);
    }
    if let Some(bytes) = table.table_size_bytes() {
        record = record.with_extra("tableSizeBytes", bytes);
    }
    if let Some(mode) = table.billing_mode_summary().and_then(|b| b.billing_mode()) {
        record = record.with_extra("billingMode", mode.as_str());
    }
    if let Some(throughput) = table.provisioned_throughput() {
        if let Some(read) = throughput.read_capacity_units() {
            record = record.with_extra("readCapacityUnits", read);
        }
        if let Some(write) = throughput.write_capacity_units() {
            record = record.with_extra("writeCapacityUnits", write);
        }
    }
    if !table.global_secondary_indexes().is_empty() {
        record = record.with_extra("globalSecondaryIndexes", table.global_secondary_indexes().len() as i64);
    }
    if !table.local_secondary_indexes().is_empty() {
        record = record.with_extra("localSecondaryIndexes", table.local_secondary_indexes().len() as i64);
    }
    if let Some(enabled) = table.stream_specification().map(|s| s.stream_enabled()) {
        record = record.with_extra("streamEnabled", enabled);
    }

    Some(record)
}
