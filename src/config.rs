//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.seedavg.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,

    /// Seed settings.
    #[serde(default)]
    pub seeds: SeedConfig,
}

/// Report output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Destination properties file.
    #[serde(default = "default_outfile")]
    pub outfile: String,

    /// Attribute names to aggregate.
    #[serde(default = "default_attributes")]
    pub attributes: Vec<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            outfile: default_outfile(),
            attributes: default_attributes(),
        }
    }
}

fn default_outfile() -> String {
    "average-eval/properties".to_string()
}

fn default_attributes() -> Vec<String> {
    vec![
        "avg_time_per_generator",
        "cost",
        "coverage",
        "initial_h_value",
        "expansions_until_last_jump",
        "num_abstractions",
        "score_evaluations",
        "score_expansions",
        "score_generated",
        "score_memory",
        "score_search_time",
        "score_total_time",
        "search_time",
        "total_time",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Seed group settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Seed marker substrings embedded in seeded configuration names
    /// (e.g. ["-s2023", "-s2024"]).
    #[serde(default)]
    pub markers: Vec<String>,

    /// Total configured seed count. Defaults to the number of markers.
    #[serde(default)]
    pub count: Option<usize>,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".seedavg.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings and only
    /// override when explicitly provided.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref outfile) = args.outfile {
            self.report.outfile = outfile.display().to_string();
        }
        if let Some(ref attributes) = args.attributes {
            self.report.attributes = attributes.clone();
        }
        if let Some(markers) = args.seed_markers() {
            self.seeds.markers = markers;
        }
        if let Some(count) = args.num_seeds {
            self.seeds.count = Some(count);
        }
    }

    /// Total seed count: explicit override, or one per marker.
    pub fn seed_count(&self) -> usize {
        self.seeds.count.unwrap_or(self.seeds.markers.len())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.report.outfile, "average-eval/properties");
        assert!(config.report.attributes.contains(&"coverage".to_string()));
        assert!(config.seeds.markers.is_empty());
        assert_eq!(config.seed_count(), 0);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[report]
outfile = "eval/properties"
attributes = ["coverage", "search_time"]

[seeds]
markers = ["-s2023", "-s2024"]
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.report.outfile, "eval/properties");
        assert_eq!(config.report.attributes, vec!["coverage", "search_time"]);
        assert_eq!(config.seeds.markers, vec!["-s2023", "-s2024"]);
        assert_eq!(config.seed_count(), 2);
    }

    #[test]
    fn test_seed_count_override() {
        let toml_content = r#"
[seeds]
markers = ["-s2023", "-s2024"]
count = 10
"#;
        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.seed_count(), 10);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[report]"));
        assert!(toml_str.contains("[seeds]"));
    }
}
