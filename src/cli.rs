//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// SeedAvg - seed-averaging report aggregator for benchmark experiments
///
/// Collapses per-seed run records from an experiment properties file into
/// one averaged record per configuration and problem, and writes the
/// result to a destination properties file.
///
/// Examples:
///   seedavg --properties eval/properties --outfile average-eval/properties --seed-range 2023..2033
///   seedavg --properties eval/properties --seeds=-s1,-s2 --attributes coverage,search_time
///   seedavg --properties eval/properties --seed-range 2023..2025 --dry-run
///   seedavg --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Source properties file with per-seed run records
    #[arg(
        short,
        long,
        value_name = "FILE",
        required_unless_present = "init_config"
    )]
    pub properties: Option<PathBuf>,

    /// Destination properties file for the averaged records
    ///
    /// Must point at a file named `properties`, the store file name the
    /// downstream reporting tools look for.
    #[arg(short, long, value_name = "FILE")]
    pub outfile: Option<PathBuf>,

    /// Seed marker substrings, comma-separated
    ///
    /// Example: --seeds=-s2023,-s2024 (note the '=' because markers start
    /// with a hyphen)
    #[arg(
        long,
        value_name = "MARKERS",
        value_delimiter = ',',
        allow_hyphen_values = true,
        conflicts_with = "seed_range"
    )]
    pub seeds: Option<Vec<String>>,

    /// Seed range shorthand, half-open: START..END
    ///
    /// --seed-range 2023..2033 expands to markers -s2023 through -s2032,
    /// matching how the experiment scripts name seeded configurations.
    #[arg(long, value_name = "RANGE")]
    pub seed_range: Option<String>,

    /// Total seed count
    ///
    /// Defaults to the number of seed markers. The arithmetic mean divides
    /// by this count and the geometric mean requires this many values.
    #[arg(long, value_name = "COUNT")]
    pub num_seeds: Option<usize>,

    /// Attribute names to aggregate, comma-separated
    ///
    /// Example: --attributes coverage,cost,search_time
    #[arg(short, long, value_name = "ATTRS", value_delimiter = ',')]
    pub attributes: Option<Vec<String>>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .seedavg.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Resolve seed groups and print them without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .seedavg.toml configuration file
    #[arg(long)]
    pub init_config: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref range) = self.seed_range {
            parse_seed_range(range)?;
        }

        if let Some(num_seeds) = self.num_seeds {
            if num_seeds == 0 {
                return Err("Seed count must be at least 1".to_string());
            }
        }

        if let Some(ref seeds) = self.seeds {
            if seeds.iter().any(|s| s.is_empty()) {
                return Err("Seed markers must be non-empty".to_string());
            }
        }

        if let Some(ref properties) = self.properties {
            if !properties.exists() {
                return Err(format!(
                    "Source properties file does not exist: {}",
                    properties.display()
                ));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Seed markers from --seeds or expanded from --seed-range.
    ///
    /// Returns `None` when neither flag was given (the config file then
    /// supplies the markers). Assumes `validate()` has passed.
    pub fn seed_markers(&self) -> Option<Vec<String>> {
        if let Some(ref seeds) = self.seeds {
            return Some(seeds.clone());
        }
        self.seed_range.as_ref().map(|range| {
            let (start, end) = parse_seed_range(range).expect("validated seed range");
            (start..end).map(|seed| format!("-s{seed}")).collect()
        })
    }
}

/// Parse a half-open `START..END` seed range.
fn parse_seed_range(range: &str) -> Result<(u64, u64), String> {
    let (start, end) = range
        .split_once("..")
        .ok_or_else(|| format!("Seed range must look like START..END, got: {range}"))?;

    let start: u64 = start
        .parse()
        .map_err(|_| format!("Invalid seed range start: {start}"))?;
    let end: u64 = end
        .parse()
        .map_err(|_| format!("Invalid seed range end: {end}"))?;

    if start >= end {
        return Err(format!("Seed range is empty: {range}"));
    }

    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            properties: Some(PathBuf::from("Cargo.toml")), // any existing file
            outfile: None,
            seeds: None,
            seed_range: None,
            num_seeds: None,
            attributes: None,
            config: None,
            dry_run: false,
            init_config: false,
            verbose: false,
            quiet: false,
        }
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_missing_source() {
        let mut args = make_args();
        args.properties = Some(PathBuf::from("no/such/properties"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_seed_range_expansion() {
        let mut args = make_args();
        args.seed_range = Some("2023..2026".to_string());
        assert!(args.validate().is_ok());
        assert_eq!(
            args.seed_markers(),
            Some(vec![
                "-s2023".to_string(),
                "-s2024".to_string(),
                "-s2025".to_string()
            ])
        );
    }

    #[test]
    fn test_explicit_seeds_pass_through() {
        let mut args = make_args();
        args.seeds = Some(vec!["-a1".to_string(), "-a2".to_string()]);
        assert_eq!(
            args.seed_markers(),
            Some(vec!["-a1".to_string(), "-a2".to_string()])
        );
    }

    #[test]
    fn test_invalid_seed_ranges() {
        assert!(parse_seed_range("2023").is_err());
        assert!(parse_seed_range("x..y").is_err());
        assert!(parse_seed_range("10..10").is_err());
        assert_eq!(parse_seed_range("1..3").unwrap(), (1, 3));
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
