mod args;

use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::warn;

use awsinv_aws::{ClientManager, ServiceKind, build_collectors};
use awsinv_core::{CancellationToken, RegionCatalog};
use awsinv_orchestrator::{CollectorRegistry, Orchestrator};

use crate::args::Args;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    awsinv_observability::init_with_level(args.log_format, args.log_level());

    let clients = Arc::new(ClientManager::load(&args.aws_settings()).await);

    let mut registry = CollectorRegistry::new();
    for collector in build_collectors(&ServiceKind::ALL, &clients) {
        registry.register(collector)?;
    }
    let catalog: Arc<dyn RegionCatalog> = clients;
    let orchestrator = Orchestrator::new(registry, catalog);

    if args.list_services {
        let mut stdout = std::io::stdout().lock();
        for service in orchestrator.available_services() {
            writeln!(stdout, "{service}")?;
        }
        return Ok(());
    }

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupt received; cancelling collection");
                cancel.cancel();
            }
        }
    });

    let report = orchestrator
        .collect_with_cancel(&args.collect_options(), cancel)
        .await
        .context("collection could not start")?;
    if report.has_errors() {
        warn!(errors = report.summary.error_count, "some collections failed; see the report");
    }

    let mut stdout = std::io::stdout().lock();
    awsinv_output::render(&report, &args.render_options(), &mut stdout)?;
    stdout.flush()?;
    Ok(())
}
