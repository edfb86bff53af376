mod aws_connector;
mod builder;
mod category;
mod cloud_api;
mod config;
mod dynamodb_client;
mod ec2_client;
mod efs_client;
mod error;
#[cfg(test)]
mod fixture;
mod fsx_client;
mod membership;
mod model;
mod output;
mod pagination;
mod rds_client;
mod redshift_client;
mod region;

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::aws_connector::{verify_credentials, AwsConnector};
use crate::builder::{BuildReport, InventoryBuilder};
use crate::category::ResourceCategory;
use crate::config::{InventoryConfig, Overrides};

const EXIT_FAILURE: i32 = 1;
const EXIT_EMPTY_INVENTORY: i32 = 3;

/// Collects an AWS resource inventory grouped by region and VPC.
#[derive(Debug, Parser)]
#[command(name = "vpc-inventory", version, about)]
struct Cli {
    /// Regions to scan, comma separated. Every enabled region when omitted.
    #[arg(short, long, env = "AWS_INVENTORY_REGIONS", value_delimiter = ',')]
    regions: Option<Vec<String>>,

    /// Resource categories to skip: ec2, rds, efs, fsx, redshift, dynamodb.
    #[arg(short, long, env = "AWS_INVENTORY_EXCLUDE", value_delimiter = ',')]
    exclude: Option<Vec<ResourceCategory>>,

    /// JSON output file. Defaults to a timestamped name in the working directory.
    #[arg(short, long, env = "AWS_INVENTORY_OUTPUT")]
    output: Option<PathBuf>,

    /// TOML config file; command-line values take precedence.
    #[arg(short, long, env = "AWS_INVENTORY_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long, env = "AWS_INVENTORY_MAX_CONCURRENT_REGIONS")]
    max_concurrent_regions: Option<usize>,

    /// Log filter, used when RUST_LOG is unset.
    #[arg(short, long, env = "AWS_INVENTORY_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines.
    #[arg(long, env = "AWS_INVENTORY_LOG_JSON")]
    log_json: bool,

    /// Skip the console summary.
    #[arg(long, env = "AWS_INVENTORY_NO_SUMMARY")]
    no_summary: bool,
}

enum RunOutcome {
    Written(PathBuf),
    Empty,
}

fn init_tracing(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if cli.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(cli: &Cli) -> Result<InventoryConfig> {
    let config = match &cli.config {
        Some(path) => InventoryConfig::load(path)
            .with_context(|| format!("failed to load config file {}", path.display()))?,
        None => InventoryConfig::default(),
    };
    let config = config
        .with_overrides(Overrides {
            regions: cli.regions.clone(),
            exclude: cli.exclude.clone(),
            output: cli.output.clone(),
            max_concurrent_regions: cli.max_concurrent_regions,
        })
        .validate()?;
    Ok(config)
}

/// A region listing that failed leaves nothing to scan; report it as a
/// failure rather than as an empty account.
fn ensure_regions_listed(report: &BuildReport) -> Result<()> {
    match &report.discovery_error {
        Some(error) => Err(error.clone()).context("could not list the enabled regions"),
        None => Ok(()),
    }
}

async fn run(cli: &Cli) -> Result<RunOutcome> {
    let config = load_config(cli)?;
    verify_credentials().await?;

    let builder = InventoryBuilder::new(AwsConnector::new(), config.exclusions())
        .with_max_concurrent_regions(config.max_concurrent_regions);
    let report = builder.build_inventory(&config.regions).await;
    ensure_regions_listed(&report)?;

    for skipped in &report.skipped_regions {
        warn!(region = %skipped.region, error = %skipped.error, "region omitted from inventory");
    }
    let inventory = report.inventory;
    info!(
        regions_scanned = inventory.regions.len(),
        regions_skipped = report.skipped_regions.len(),
        vpcs = inventory.vpc_count(),
        resources = inventory.resource_count(),
        "inventory complete"
    );

    if inventory.is_empty() {
        return Ok(RunOutcome::Empty);
    }

    if !cli.no_summary {
        output::print_summary(&inventory).context("failed to print summary")?;
    }
    let path = config.output.unwrap_or_else(output::default_filename);
    output::save_to_file(&inventory, &path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(RunOutcome::Written(path))
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli).await {
        Ok(RunOutcome::Written(path)) => {
            info!(path = %path.display(), "inventory saved");
        }
        Ok(RunOutcome::Empty) => {
            warn!("no resources found, nothing saved");
            process::exit(EXIT_EMPTY_INVENTORY);
        }
        Err(err) => {
            error!("{:#}", err);
            process::exit(EXIT_FAILURE);
        }
    }
}
