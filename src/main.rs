//! SeedAvg - seed-averaging report aggregator
//!
//! A CLI tool that collapses the per-seed run records of a benchmark
//! experiment into one averaged record per configuration and problem,
//! writing the result back to a flat properties store for the downstream
//! comparison tables.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad configuration, unknown attribute, missing run, I/O)

mod analysis;
mod cli;
mod config;
mod error;
mod models;
mod store;

use anyhow::{bail, Context, Result};
use cli::Args;
use config::Config;
use error::ReportError;
use std::path::{Path, PathBuf};
use store::{PropertiesStore, RunIndex};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("SeedAvg v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run_report(&args) {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Report failed: {}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .seedavg.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(".seedavg.toml");

    if path.exists() {
        eprintln!("⚠️  .seedavg.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .seedavg.toml")?;

    println!("✅ Created .seedavg.toml with default settings.");
    println!("   Edit it to customize seed markers, attributes and the outfile.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete averaging workflow.
fn run_report(args: &Args) -> Result<()> {
    // Load configuration
    let mut config = load_config(args)?;
    config.merge_with_args(args);

    let markers = config.seeds.markers.clone();
    if markers.is_empty() {
        bail!("No seed markers configured; use --seeds, --seed-range or .seedavg.toml");
    }
    let seed_count = config.seed_count();

    // The destination must be a properties store file; reject it before
    // doing any work.
    let outfile = PathBuf::from(&config.report.outfile);
    if !config.report.outfile.ends_with("properties") {
        return Err(ReportError::InvalidOutfile(config.report.outfile.clone()).into());
    }

    // Every attribute must have a known policy before aggregation starts.
    let attributes = analysis::classify_all(&config.report.attributes)?;

    // Step 1: Load the source store and index it
    let source_path = args
        .properties
        .as_deref()
        .context("No source properties file given")?;
    let source = PropertiesStore::load(source_path)?;
    info!("Loaded {} run records", source.len());

    if source.is_empty() {
        warn!("Source store is empty; nothing to aggregate");
    }

    let index = RunIndex::build(&source)?;

    // Step 2: Resolve the seed groups
    let base_names = analysis::resolve_base_names(index.algorithms(), &markers);
    info!(
        "{} seed groups across {} (domain, problem) pairs",
        base_names.len(),
        index.pairs().len()
    );

    if args.dry_run {
        return handle_dry_run(&base_names, seed_count);
    }

    // Step 3: Aggregate
    let records = analysis::aggregate(&index, &base_names, &attributes, &markers, seed_count)?;

    // Step 4: Write everything to the destination in one pass
    let mut destination = PropertiesStore::load_or_empty(&outfile)?;
    let count = records.len();
    for (key, record) in records {
        destination.insert(key, serde_json::to_value(&record)?);
    }
    destination.write()?;

    println!("\n📊 Averaging Summary:");
    println!("   Seed groups: {}", base_names.len());
    println!("   Attributes: {}", attributes.len());
    println!("   Records written: {}", count);
    println!("\n✅ Report saved to: {}", outfile.display());

    Ok(())
}

/// Handle --dry-run: print the resolved seed groups, write nothing.
fn handle_dry_run(base_names: &[String], seed_count: usize) -> Result<()> {
    println!("\n🔍 Dry run: resolving seed groups (nothing written)...\n");

    if base_names.is_empty() {
        println!("   No seeded configurations found.");
    } else {
        println!("   {} seed groups over {} seeds:\n", base_names.len(), seed_count);
        for base_name in base_names {
            println!("     {}", base_name);
        }
    }

    println!("\n✅ Dry run complete.");
    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .seedavg.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
