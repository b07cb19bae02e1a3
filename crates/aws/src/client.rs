//! Shared AWS SDK configuration and region discovery.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_ec2::error::DisplayErrorContext;
use tracing::{debug, info};

use awsinv_core::{InventoryError, RegionCatalog};

/// Region used for account-level calls (region discovery, S3 bucket listing).
pub const DISCOVERY_REGION: &str = "us-east-1";

/// Credential and region settings read from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AwsSettings {
    /// Named profile from the shared config files.
    pub profile: Option<String>,
}

impl AwsSettings {
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }
}

/// Base SDK configuration, cloned per region on demand.
///
/// Credentials are resolved once, by the default provider chain, when the
/// manager is loaded. Every per-region config shares that provider.
#[derive(Debug, Clone)]
pub struct ClientManager {
    base: SdkConfig,
}

impl ClientManager {
    /// Load the base configuration from the environment and shared files.
    pub async fn load(settings: &AwsSettings) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(profile) = &settings.profile {
            loader = loader.profile_name(profile);
        }
        // Collectors always override the region; this only seeds the base config.
        loader = loader.region(Region::new(DISCOVERY_REGION));

        let base = loader.load().await;
        debug!(profile = settings.profile.as_deref().unwrap_or("default"), "aws configuration loaded");
        Self { base }
    }

    pub fn from_sdk_config(base: SdkConfig) -> Self {
        Self { base }
    }

    /// The base configuration with its region replaced by `region`.
    pub fn config_for(&self, region: &str) -> SdkConfig {
        self.base.to_builder().region(Region::new(region.to_string())).build()
    }

    pub fn ec2(&self, region: &str) -> aws_sdk_ec2::Client {
        aws_sdk_ec2::Client::new(&self.config_for(region))
    }

    pub fn s3(&self, region: &str) -> aws_sdk_s3::Client {
        aws_sdk_s3::Client::new(&self.config_for(region))
    }

    pub fn lambda(&self, region: &str) -> aws_sdk_lambda::Client {
        aws_sdk_lambda::Client::new(&self.config_for(region))
    }

    pub fn rds(&self, region: &str) -> aws_sdk_rds::Client {
        aws_sdk_rds::Client::new(&self.config_for(region))
    }

    pub fn dynamodb(&self, region: &str) -> aws_sdk_dynamodb::Client {
        aws_sdk_dynamodb::Client::new(&self.config_for(region))
    }
}

#[async_trait]
impl RegionCatalog for ClientManager {
    /// Regions enabled for the account, sorted.
    async fn discover_regions(&self) -> Result<Vec<String>, InventoryError> {
        let output = self
            .ec2(DISCOVERY_REGION)
            .describe_regions()
            .all_regions(false)
            .send()
            .await
            .map_err(|e| InventoryError::region_discovery(DisplayErrorContext(&e).to_string()))?;

        let mut regions: Vec<String> = output
            .regions()
            .iter()
            .filter_map(|r| r.region_name().map(str::to_string))
            .collect();
        regions.sort();
        regions.dedup();

        if regions.is_empty() {
            return Err(InventoryError::region_discovery("no enabled regions returned"));
        }

        info!(count = regions.len(), "discovered regions");
        Ok(regions)
    }
}
