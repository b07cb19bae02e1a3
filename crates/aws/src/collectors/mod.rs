//! One collector per AWS service.
//!
//! Every collector lists a single resource type in one region, following
//! pagination tokens until the listing is exhausted and checking the
//! cancellation token before each page.

pub mod dynamodb;
pub mod ec2;
pub mod lambda;
pub mod rds;
pub mod s3;

pub use dynamodb::DynamoDbCollector;
pub use ec2::Ec2Collector;
pub use lambda::LambdaCollector;
pub use rds::RdsCollector;
pub use s3::S3Collector;
