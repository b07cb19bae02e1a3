use std::time::Duration;

use clap::Parser;

use awsinv_aws::AwsSettings;
use awsinv_observability::LogFormat;
use awsinv_orchestrator::{CollectOptions, DEFAULT_PARALLELISM};
use awsinv_output::{Filter, OutputFormat, RenderOptions, SortKey};

#[derive(Parser, Debug)]
#[command(name = "awsinv")]
#[command(version)]
#[command(about = "Inventory AWS resources across services and regions", long_about = None)]
pub struct Args {
    /// Services to collect (comma separated). Defaults to all.
    #[arg(short, long, env = "AWSINV_SERVICES", value_delimiter = ',')]
    pub services: Vec<String>,

    /// Regions to collect (comma separated). Defaults to every enabled region.
    #[arg(short, long, env = "AWSINV_REGIONS", value_delimiter = ',')]
    pub regions: Vec<String>,

    /// Maximum concurrent collector calls.
    #[arg(short, long, env = "AWSINV_PARALLEL", default_value_t = DEFAULT_PARALLELISM)]
    pub parallel: usize,

    /// Deadline for the whole collection, e.g. `300s` or `5m`.
    #[arg(long, env = "AWSINV_TIMEOUT", default_value = "5m", value_parser = humantime::parse_duration)]
    pub timeout: Duration,

    /// Deadline for a single service/region call.
    #[arg(long, env = "AWSINV_TASK_TIMEOUT", value_parser = humantime::parse_duration)]
    pub task_timeout: Option<Duration>,

    /// Stop admitting work after the first failure.
    #[arg(long, env = "AWSINV_FAIL_FAST")]
    pub fail_fast: bool,

    /// Named AWS profile.
    #[arg(long, env = "AWSINV_PROFILE")]
    pub profile: Option<String>,

    /// Output format: table, json or csv.
    #[arg(short, long, env = "AWSINV_OUTPUT", default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Resource filter `key=value`; a trailing `*` matches substrings. Repeatable.
    #[arg(short, long = "filter", env = "AWSINV_FILTER")]
    pub filters: Vec<Filter>,

    /// Sort field: service, region, id, name, type or state.
    #[arg(long, env = "AWSINV_SORT", default_value_t = SortKey::Service)]
    pub sort: SortKey,

    /// Add rough monthly cost estimates (static us-east-1 on-demand rates).
    #[arg(long, env = "AWSINV_COST")]
    pub cost: bool,

    /// Log format: json or pretty.
    #[arg(long, env = "AWSINV_LOG_FORMAT", default_value = "pretty")]
    pub log_format: LogFormat,

    /// Debug-level logging.
    #[arg(short, long, env = "AWSINV_VERBOSE")]
    pub verbose: bool,

    /// Print the supported services and exit.
    #[arg(long)]
    pub list_services: bool,
}

impl Args {
    pub fn collect_options(&self) -> CollectOptions {
        let mut options = CollectOptions::default()
            .with_services(self.services.iter().map(|s| s.trim()))
            .with_regions(self.regions.iter().map(|r| r.trim()))
            .with_parallel(self.parallel)
            .with_timeout(self.timeout)
            .with_fail_fast(self.fail_fast);
        if let Some(limit) = self.task_timeout {
            options = options.with_task_timeout(limit);
        }
        options
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::default()
            .with_format(self.output)
            .with_filters(self.filters.clone())
            .with_sort(self.sort)
            .with_cost(self.cost)
    }

    pub fn aws_settings(&self) -> AwsSettings {
        AwsSettings {
            profile: self.profile.clone(),
        }
    }

    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
