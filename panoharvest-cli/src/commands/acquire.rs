//! Acquire command - collect unique panorama locations per region.

use std::path::PathBuf;

use clap::Args;

use panoharvest::acquire::AcquisitionLoop;
use panoharvest::lookup::{ReqwestClient, StreetViewLookup};
use panoharvest::orchestrator::BatchOrchestrator;
use panoharvest::output::write_metadata_csv;
use panoharvest::region::GeoJsonRegionSource;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the acquire command.
#[derive(Debug, Args)]
pub struct AcquireArgs {
    /// Region name to process; repeat for several regions
    #[arg(long = "region", required = true)]
    pub regions: Vec<String>,

    /// Unique panoramas to acquire per region (default from config)
    #[arg(long)]
    pub quota: Option<usize>,

    /// Output CSV path for the metadata table
    #[arg(long, default_value = "data/metadata.csv")]
    pub output: PathBuf,

    /// GeoJSON boundaries file (default from config)
    #[arg(long)]
    pub boundaries: Option<PathBuf>,

    /// Feature property carrying region names (default from config)
    #[arg(long)]
    pub name_property: Option<String>,

    /// Bounding-box samples per batch (default from config)
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Lookup search radius in meters (default from config)
    #[arg(long)]
    pub radius: Option<u32>,

    /// Maps Platform API key
    #[arg(long)]
    pub api_key: Option<String>,

    /// File containing the API key (first line)
    #[arg(long)]
    pub api_key_file: Option<PathBuf>,
}

/// Run the acquire command.
pub fn run(args: AcquireArgs) -> Result<(), CliError> {
    let runner = CliRunner::new()?;
    runner.log_startup("acquire");
    let config = runner.config();

    // Resolve settings from CLI and config
    let quota = args.quota.unwrap_or(config.acquire.quota);
    if quota == 0 {
        return Err(CliError::Config("--quota must be positive".to_string()));
    }
    let boundaries = args
        .boundaries
        .or_else(|| config.regions.boundaries_file.clone())
        .ok_or_else(|| {
            CliError::Config(
                "No boundaries file configured. Pass --boundaries or set \
                 regions.boundaries_file"
                    .to_string(),
            )
        })?;
    let name_property = args
        .name_property
        .unwrap_or_else(|| config.regions.name_property.clone());
    let api_key = runner.resolve_api_key(args.api_key, args.api_key_file)?;

    let radius_m = args.radius.unwrap_or(config.lookup.radius_m);
    let mut acquire_config = config.acquire.to_acquire_config(radius_m);
    if let Some(batch_size) = args.batch_size {
        acquire_config = acquire_config.with_batch_size(batch_size);
    }

    let source = GeoJsonRegionSource::from_file(&boundaries, &name_property)?;
    let client = ReqwestClient::new()?;
    let lookup = StreetViewLookup::new(client, api_key);
    let orchestrator = BatchOrchestrator::new(source, AcquisitionLoop::new(lookup, acquire_config));

    println!(
        "Acquiring {} panoramas for each of {} region(s)...",
        quota,
        args.regions.len()
    );
    println!();

    let result = orchestrator.run(&args.regions, quota, &mut rand::thread_rng());

    for report in &result.reports {
        match &report.outcome {
            Ok(stats) => println!(
                "{} done. ({} panoramas, {} candidates, {:.2}% acceptance)",
                report.region,
                stats.accepted,
                stats.candidates_examined,
                stats.acceptance_rate() * 100.0
            ),
            Err(e) => eprintln!("{} failed: {}", report.region, e),
        }
    }

    if result.all_failed() {
        return Err(CliError::AllRegionsFailed);
    }

    write_metadata_csv(&args.output, &result.records)?;
    println!();
    println!(
        "✓ Saved {} rows to {}",
        result.records.len(),
        args.output.display()
    );

    Ok(())
}
