//! The set of AWS services this crate can collect.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use awsinv_core::{Collector, InventoryError, ServiceName};

use crate::client::ClientManager;
use crate::collectors::{DynamoDbCollector, Ec2Collector, LambdaCollector, RdsCollector, S3Collector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ServiceKind {
    Ec2,
    S3,
    Lambda,
    Rds,
    DynamoDb,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 5] = [
        ServiceKind::Ec2,
        ServiceKind::S3,
        ServiceKind::Lambda,
        ServiceKind::Rds,
        ServiceKind::DynamoDb,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ServiceKind::Ec2 => "ec2",
            ServiceKind::S3 => "s3",
            ServiceKind::Lambda => "lambda",
            ServiceKind::Rds => "rds",
            ServiceKind::DynamoDb => "dynamodb",
        }
    }

    pub fn service_name(self) -> ServiceName {
        ServiceName::new(self.as_str()).expect("built-in service names are valid")
    }

    pub fn collector(self, clients: Arc<ClientManager>) -> Arc<dyn Collector> {
        match self {
            ServiceKind::Ec2 => Arc::new(Ec2Collector::new(clients)),
            ServiceKind::S3 => Arc::new(S3Collector::new(clients)),
            ServiceKind::Lambda => Arc::new(LambdaCollector::new(clients)),
            ServiceKind::Rds => Arc::new(RdsCollector::new(clients)),
            ServiceKind::DynamoDb => Arc::new(DynamoDbCollector::new(clients)),
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceKind {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ServiceKind::ALL
            .into_iter()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| InventoryError::invalid_service(wanted))
    }
}

/// One collector per kind, sharing `clients`.
pub fn build_collectors(kinds: &[ServiceKind], clients: &Arc<ClientManager>) -> Vec<Arc<dyn Collector>> {
    kinds.iter().map(|k| k.collector(Arc::clone(clients))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_config::{BehaviorVersion, Region, SdkConfig};

    fn clients() -> Arc<ClientManager> {
        Arc::new(ClientManager::from_sdk_config(
            SdkConfig::builder()
                .behavior_version(BehaviorVersion::latest())
                .region(Region::new("us-east-1"))
                .build(),
        ))
    }

    #[test]
    fn every_kind_has_a_valid_name() {
        for kind in ServiceKind::ALL {
            assert_eq!(kind.service_name().as_str(), kind.as_str());
            assert_eq!(kind.to_string().parse::<ServiceKind>().unwrap(), kind);
        }
    }

    #[test]
    fn collectors_report_their_kind() {
        let collectors = build_collectors(&ServiceKind::ALL, &clients());
        let names: Vec<_> = collectors.iter().map(|c| c.name().to_string()).collect();
        assert_eq!(names, vec!["ec2", "s3", "lambda", "rds", "dynamodb"]);
    }

    #[test]
    fn only_s3_is_pinned() {
        for collector in build_collectors(&ServiceKind::ALL, &clients()) {
            let pinned = collector.regions();
            if collector.name().as_str() == "s3" {
                assert_eq!(pinned, Some(vec!["us-east-1".to_string()]));
            } else {
                assert!(pinned.is_none());
            }
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!("glacier".parse::<ServiceKind>().is_err());
    }
}
