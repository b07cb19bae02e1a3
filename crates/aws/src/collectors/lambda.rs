//! Lambda function collector.

use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_lambda::types::FunctionConfiguration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use awsinv_core::{CollectError, Collector, ResourceRecord, ServiceName};

use crate::client::ClientManager;
use crate::convert::{cancellable, parse_lambda_timestamp};
use crate::error::classify;
use crate::service::ServiceKind;

/// Lambda functions (`$LATEST` configuration only).
pub struct LambdaCollector {
    clients: Arc<ClientManager>,
}

impl LambdaCollector {
    pub fn new(clients: Arc<ClientManager>) -> Self {
        Self { clients }
    }
}

#[async_trait]
impl Collector for LambdaCollector {
    fn name(&self) -> ServiceName {
        ServiceKind::Lambda.service_name()
    }

    async fn collect(
        &self,
        region: &str,
        cancel: CancellationToken,
    ) -> Result<Vec<ResourceRecord>, CollectError> {
        let client = self.clients.lambda(region);
        let mut out = Vec::new();
        let mut marker: Option<String> = None;
        let mut page = 0;

        loop {
            let request = client.list_functions().set_marker(marker.take());
            let resp = cancellable(&cancel, request.send())
                .await?
                .map_err(|e| classify("ListFunctions", page, e))?;

            out.extend(resp.functions().iter().filter_map(|f| convert_function(f, region)));

            marker = resp.next_marker().map(str::to_string);
            page += 1;
            if marker.is_none() {
                break;
            }
        }

        debug!(region, pages = page, functions = out.len(), "lambda listing complete");
        Ok(out)
    }
}

fn convert_function(function: &FunctionConfiguration, region: &str) -> Option<ResourceRecord> {
    let name = function.function_name()?;
    let mut record = ResourceRecord::new(ServiceKind::Lambda.as_str(), region, name).with_name(name);

    record.kind = function.runtime().map(|r| r.as_str().to_string());
    record.state = function.state().map(|s| s.as_str().to_string());
    record.class = function.memory_size().map(|mb| format!("{mb}MB"));
    record.created_at = function.last_modified().and_then(parse_lambda_timestamp);

    if let Some(arn) = function.function_arn() {
        record = record.with_extra("functionArn", arn);
    }
    if let Some(handler) = function.handler() {
        record = record.with_extra("handler", handler);
    }
    if let Some(description) = function.description().filter(|d| !d.is_empty()) {
        record = record.with_extra("description", description);
    }
    if let Some(timeout) = function.timeout() {
        record = record.with_extra("timeout", timeout);
    }
    if let Some(memory) = function.memory_size() {
        record = record.with_extra("memorySize", memory);
    }
    if let Some(version) = function.version() {
        record = record.with_extra("version", version);
    }
    if let Some(package) = function.package_type() {
        record = record.with_extra("packageType", package.as_str());
    }
    if let Some(status) = function.last_update_status() {
        record = record.with_extra("lastUpdateStatus", status.as_str());
    }
    let architectures: Vec<String> = function
        .architectures()
        .iter()
        .map(|a| a.as_str().to_string())
        .collect();
    if !architectures.is_empty() {
        record = record.with_extra("architectures", architectures);
    }
    record = record.with_extra("codeSize", function.code_size());

    Some(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_lambda::types::{Architecture, Runtime, State};
    use awsinv_core::ExtraValue;

    #[test]
    fn function_maps_to_record() {
        let function = FunctionConfiguration::builder()
            .function_name("resize-images")
            .runtime(Runtime::Python312)
            .state(State::Active)
            .memory_size(512)
            .last_modified("2024-03-01T12:30:45.123+0000")
            .architectures(Architecture::Arm64)
            .code_size(2048)
            .build();

        let record = convert_function(&function, "us-west-2").unwrap();
        assert_eq!(record.id, "resize-images");
        assert_eq!(record.kind.as_deref(), Some("python3.12"));
        assert_eq!(record.state(), Some("Active"));
        assert_eq!(record.class.as_deref(), Some("512MB"));
        assert!(record.created_at.is_some());
        assert_eq!(
            record.extra["architectures"],
            ExtraValue::StringList(vec!["arm64".into()])
        );
        assert_eq!(record.extra["codeSize"], ExtraValue::Integer(2048));
    }

    #[test]
    fn function_without_memory_has_no_class() {
        let function = FunctionConfiguration::builder().function_name("f").build();
        let record = convert_function(&function, "us-west-2").unwrap();
        assert!(record.class.is_none());
    }
}
