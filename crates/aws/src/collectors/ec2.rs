//! EC2 instance collector.

use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_ec2::types::Instance;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use awsinv_core::{CollectError, Collector, ResourceRecord, ServiceName};

use crate::client::ClientManager;
use crate::convert::{cancellable, tags, to_utc};
use crate::error::classify;
use crate::service::ServiceKind;

/// EC2 instances, one record per instance.
pub struct Ec2Collector {
    clients: Arc<ClientManager>,
}

impl Ec2Collector {
    pub fn new(clients: Arc<ClientManager>) -> Self {
        Self { clients }
    }
}

#[async_trait]
impl Collector for Ec2Collector {
    fn name(&self) -> ServiceName {
        ServiceKind::Ec2.service_name()
    }

    async fn collect(
        &self,
        region: &str,
        cancel: CancellationToken,
    ) -> Result<Vec<ResourceRecord>, CollectError> {
        let client = self.clients.ec2(region);
        let mut out = Vec::new();
        let mut token: Option<String> = None;
        let mut page = 0;

        loop {
            let request = client.describe_instances().set_next_token(token.take());
            let resp = cancellable(&cancel, request.send())
                .await?
                .map_err(|e| classify("DescribeInstances", page, e))?;

            for reservation in resp.reservations() {
                out.extend(
                    reservation
                        .instances()
                        .iter()
                        .filter_map(|i| convert_instance(i, region)),
                );
            }

            token = resp.next_token().map(str::to_string);
            page += 1;
            if token.is_none() {
                break;
            }
        }

        debug!(region, pages = page, instances = out.len(), "ec2 listing complete");
        Ok(out)
    }
}

fn convert_instance(instance: &Instance, region: &str) -> Option<ResourceRecord> {
    let id = instance.instance_id()?;
    let mut record = ResourceRecord::new(ServiceKind::Ec2.as_str(), region, id);

    record.tags = tags(instance.tags().iter().map(|t| (t.key(), t.value())));
    record.name = record.tags.get("Name").cloned();
    record.kind = instance.instance_type().map(|t| t.as_str().to_string());
    record.state = instance
        .state()
        .and_then(|s| s.name())
        .map(|n| n.as_str().to_string());
    record.created_at = instance.launch_time().and_then(to_utc);

    if let Some(platform) = instance.platform() {
        record = record.with_extra("platform", platform.as_str());
    }
    if let Some(arch) = instance.architecture() {
        record = record.with_extra("architecture", arch.as_str());
    }
    if let Some(root) = instance.root_device_type() {
        record = record.with_extra("rootDeviceType", root.as_str());
    }
    if let Some(virt) = instance.virtualization_type() {
        record = record.with_extra("virtualizationType", virt.as_str());
    }
    if let Some(ip) = instance.private_ip_address() {
        record = record.with_extra("privateIpAddress", ip);
    }
    if let Some(ip) = instance.public_ip_address() {
        record = record.with_extra("publicIpAddress", ip);
    }
    if let Some(vpc) = instance.vpc_id() {
        record = record.with_extra("vpcId", vpc);
    }
    if let Some(subnet) = instance.subnet_id() {
        record = record.with_extra("subnetId", subnet);
    }
    if let Some(key) = instance.key_name() {
        record = record.with_extra("keyName", key);
    }

    Some(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_ec2::primitives::DateTime;
    use aws_sdk_ec2::types::{InstanceState, InstanceStateName, InstanceType, Tag};
    use awsinv_core::ExtraValue;

    #[test]
    fn instance_maps_to_record() {
        let instance = Instance::builder()
            .instance_id("i-0abc")
            .instance_type(InstanceType::T3Micro)
            .state(InstanceState::builder().name(InstanceStateName::Running).build())
            .launch_time(DateTime::from_secs(1_700_000_000))
            .tags(Tag::builder().key("Name").value("web-1").build())
            .tags(Tag::builder().key("env").value("prod").build())
            .private_ip_address("10.0.0.5")
            .build();

        let record = convert_instance(&instance, "eu-west-1").unwrap();
        assert_eq!(record.service, "ec2");
        assert_eq!(record.region, "eu-west-1");
        assert_eq!(record.id, "i-0abc");
        assert_eq!(record.name.as_deref(), Some("web-1"));
        assert_eq!(record.kind.as_deref(), Some("t3.micro"));
        assert_eq!(record.state(), Some("running"));
        assert_eq!(record.created_at.map(|t| t.timestamp()), Some(1_700_000_000));
        assert_eq!(record.tags.len(), 2);
        assert_eq!(record.extra["privateIpAddress"], ExtraValue::from("10.0.0.5"));
    }

    #[test]
    fn instance_without_id_is_dropped() {
        assert!(convert_instance(&Instance::builder().build(), "us-east-1").is_none());
    }
}
