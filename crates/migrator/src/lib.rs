pub mod arguments;
pub mod artifact;
pub mod config;
pub mod deployer;
pub mod error;
pub mod infra;
pub mod plan;
pub mod report;
pub mod sequencer;
mod shutdown;

use {
    crate::{
        arguments::Arguments,
        artifact::ArtifactDir,
        infra::node::NodeDeployer,
        report::Summary,
        sequencer::Sequencer,
    },
    alloy::primitives::utils::format_ether,
    anyhow::{Context, Result},
    clap::Parser,
    std::{path::Path, sync::Arc},
};

pub async fn start(args: impl Iterator<Item = String>) {
    let args = Arguments::parse_from(args);
    let obs_config = observe::Config::new(
        args.log_filter.as_str(),
        args.log_stderr_threshold.into_level(),
        args.use_json_logs,
    );
    observe::tracing::initialize(&obs_config);
    observe::panic_hook::install();
    tracing::info!("running migrator with validated arguments:\n{}", args);

    tokio::select! {
        result = run(args) => {
            if let Err(err) = result {
                tracing::error!(?err, "migration failed");
                std::process::exit(1);
            }
        }
        _ = shutdown::signal_handler() => {
            tracing::warn!(
                "migration interrupted, deployments confirmed so far remain on chain and have to \
                 be reconciled manually"
            );
            std::process::exit(1);
        }
    }
}

/// Loads the plans, checks all of them and then runs them one after the
/// other. Nothing is deployed unless every plan passes the check.
pub async fn run(args: Arguments) -> Result<()> {
    let registry = Arc::new(ArtifactDir::new(args.artifacts_dir.clone()));
    tracing::debug!(root = %registry.root().display(), "resolving artifacts");
    let sequencer = Sequencer::new(registry);

    let mut plans = Vec::with_capacity(args.plan.len());
    for path in &args.plan {
        let plan = config::load(path).await?;
        let prepared = sequencer
            .check(&plan)
            .await
            .with_context(|| format!("migration {} is invalid", path.display()))?;
        tracing::info!(
            plan = %path.display(),
            deployments = prepared.len(),
            "migration is valid:\n{plan}"
        );
        plans.push((path, prepared));
    }
    if args.dry_run {
        tracing::info!("dry run, not deploying anything");
        return Ok(());
    }

    let deployer = NodeDeployer::new(
        args.node_url.clone(),
        &args.account()?,
        args.confirmations,
        args.confirmation_timeout,
    )?;
    let network = deployer.network().await?;
    tracing::info!(
        chain_id = network.chain_id,
        block_gas_limit = ?network.block_gas_limit,
        account = %network.account,
        balance = %format_ether(network.balance),
        "connected to network"
    );

    let mut summary = Summary::default();
    for (path, prepared) in &plans {
        tracing::info!(plan = %path.display(), "running migration");
        if let Err(err) = prepared.execute(&deployer, &mut summary).await {
            tracing::error!(plan = %path.display(), step = err.step(), "migration stopped");
            tracing::warn!("deployments confirmed before the failure:\n{summary}");
            if let Err(report_err) = report(&summary, args.report_path.as_deref()).await {
                tracing::error!(?report_err, "failed to save deployment report");
            }
            return Err(err).with_context(|| format!("migration {} failed", path.display()));
        }
    }

    tracing::info!("summary:\n{summary}");
    report(&summary, args.report_path.as_deref()).await
}

async fn report(summary: &Summary, path: Option<&Path>) -> Result<()> {
    if let Some(path) = path {
        summary.save(path).await?;
        tracing::info!(path = %path.display(), "saved deployment report");
    }
    Ok(())
}
