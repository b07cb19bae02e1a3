//! Rough monthly cost estimates from static on-demand rates.
//!
//! Rates are us-east-1 on-demand prices for around-the-clock usage
//! (730 hours a month). Usage-priced services get a flat figure. These are
//! ballpark numbers for spotting expensive resources, not billing data.

use std::collections::BTreeMap;

use serde::Serialize;

use awsinv_core::ResourceRecord;

pub const HOURS_PER_MONTH: f64 = 730.0;

const EC2_MONTHLY: &[(&str, f64)] = &[
    ("t3.micro", 8.47),
    ("t3.small", 16.94),
    ("t3a.medium", 27.07),
    ("t3.medium", 33.88),
    ("t3.large", 67.76),
    ("m5.large", 86.40),
    ("m5.xlarge", 172.80),
    ("c5.large", 68.00),
    ("c5.xlarge", 136.00),
    ("r5.large", 126.00),
    ("r5.xlarge", 252.00),
];
const EC2_UNKNOWN_TYPE: f64 = 50.0;

const RDS_MONTHLY: &[(&str, f64)] = &[
    ("db.t3.micro", 15.00),
    ("db.t3.small", 30.00),
    ("db.t3.medium", 60.00),
    ("db.t3.large", 120.00),
    ("db.m5.large", 171.00),
    ("db.m5.xlarge", 342.00),
    ("db.r5.large", 228.00),
    ("db.r5.xlarge", 456.00),
];
const RDS_UNKNOWN_CLASS: f64 = 100.0;

const LAMBDA_FLAT: f64 = 5.0;
const S3_FLAT: f64 = 1.0;
const DYNAMODB_FLAT: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Accuracy {
    /// Priced from a known size in the rate table.
    High,
    /// Flat figure for a typical usage pattern.
    Medium,
    /// Guess: unknown size, or usage the listing cannot see.
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostEstimate {
    pub monthly_usd: f64,
    pub accuracy: Accuracy,
    pub basis: String,
}

impl CostEstimate {
    fn new(monthly_usd: f64, accuracy: Accuracy, basis: impl Into<String>) -> Self {
        Self {
            monthly_usd,
            accuracy,
            basis: basis.into(),
        }
    }
}

/// Estimate the monthly cost of one resource.
///
/// Instances are only charged in their billable state (`running` for EC2,
/// `available` for RDS). Services without a rate estimate to zero.
pub fn estimate(record: &ResourceRecord) -> CostEstimate {
    match record.service.as_str() {
        "ec2" => metered(
            record.state() == Some("running"),
            EC2_MONTHLY,
            record.kind.as_deref(),
            EC2_UNKNOWN_TYPE,
        ),
        "rds" => metered(
            record.state() == Some("available"),
            RDS_MONTHLY,
            record.class.as_deref(),
            RDS_UNKNOWN_CLASS,
        ),
        "lambda" => CostEstimate::new(LAMBDA_FLAT, Accuracy::Medium, "flat estimate for moderate invocation volume"),
        "s3" => CostEstimate::new(S3_FLAT, Accuracy::Low, "flat estimate for light storage"),
        "dynamodb" => CostEstimate::new(DYNAMODB_FLAT, Accuracy::Low, "flat estimate for on-demand capacity"),
        _ => CostEstimate::new(0.0, Accuracy::Low, "no rate for this service"),
    }
}

fn metered(billed: bool, rates: &[(&str, f64)], size: Option<&str>, unknown: f64) -> CostEstimate {
    if !billed {
        return CostEstimate::new(0.0, Accuracy::High, "not billed in this state");
    }
    match size.and_then(|s| rate(rates, s).map(|monthly| (s, monthly))) {
        Some((size, monthly)) => CostEstimate::new(
            monthly,
            Accuracy::High,
            format!("{size} on-demand, ${:.4}/hour", monthly / HOURS_PER_MONTH),
        ),
        None => CostEstimate::new(unknown, Accuracy::Low, "size not in rate table; conservative estimate"),
    }
}

fn rate(rates: &[(&str, f64)], size: &str) -> Option<f64> {
    rates.iter().find(|(name, _)| *name == size).map(|(_, monthly)| *monthly)
}

/// Estimated totals over a set of resources.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostSummary {
    pub total: f64,
    pub by_service: BTreeMap<String, f64>,
    pub by_region: BTreeMap<String, f64>,
}

pub fn summarize(records: &[ResourceRecord]) -> CostSummary {
    let mut summary = CostSummary::default();
    for record in records {
        let monthly = estimate(record).monthly_usd;
        summary.total += monthly;
        *summary.by_service.entry(record.service.clone()).or_default() += monthly;
        *summary.by_region.entry(record.region.clone()).or_default() += monthly;
    }
    summary
}

/// `$12.34`
pub fn format_usd(amount: f64) -> String {
    format!("${amount:.2}")
}
