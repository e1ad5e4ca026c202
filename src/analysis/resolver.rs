//! Seed-group resolution.
//!
//! Collapses the per-seed configuration identifiers of an experiment into
//! the distinct base names that form the rows of the averaged report.

use std::collections::BTreeSet;
use tracing::debug;

/// Resolve the distinct base names from the full set of configuration
/// identifiers.
///
/// Markers are tried in caller-supplied order and the first one contained
/// in the identifier wins; only that single occurrence is removed. The
/// markers carry distinct numeric suffixes in practice, so order does not
/// change the outcome, but the first-match rule is part of the contract.
///
/// Identifiers matching no marker are the experiment's non-seeded
/// configurations and are left out of the averaging. The result is sorted
/// so report output is deterministic.
pub fn resolve_base_names(algorithms: &[String], seed_markers: &[String]) -> Vec<String> {
    let mut base_names = BTreeSet::new();

    for algorithm in algorithms {
        for marker in seed_markers {
            if algorithm.contains(marker.as_str()) {
                base_names.insert(algorithm.replacen(marker.as_str(), "", 1));
                break;
            }
        }
    }

    let base_names: Vec<String> = base_names.into_iter().collect();
    debug!("Resolved {} seed groups: {:?}", base_names.len(), base_names);
    base_names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_two_seeds_one_group() {
        let algorithms = strings(&["r-cpdbs-s2023", "r-cpdbs-s2024"]);
        let markers = strings(&["-s2023", "-s2024"]);
        assert_eq!(resolve_base_names(&algorithms, &markers), ["r-cpdbs"]);
    }

    #[test]
    fn test_distinct_configs_stay_distinct() {
        let algorithms = strings(&[
            "r-cpdbs-s2023",
            "r-zopdbs-s2023",
            "r-cpdbs-s2024",
            "r-zopdbs-s2024",
        ]);
        let markers = strings(&["-s2023", "-s2024"]);
        assert_eq!(
            resolve_base_names(&algorithms, &markers),
            ["r-cpdbs", "r-zopdbs"]
        );
    }

    #[test]
    fn test_unseeded_identifiers_are_excluded() {
        let algorithms = strings(&["r-cpdbs-s2023", "r-baseline"]);
        let markers = strings(&["-s2023"]);
        assert_eq!(resolve_base_names(&algorithms, &markers), ["r-cpdbs"]);
    }

    #[test]
    fn test_first_matching_marker_wins() {
        // Contrived overlapping markers; the earlier one must be removed.
        let algorithms = strings(&["r-cfg-s20-s201"]);
        let markers = strings(&["-s20", "-s201"]);
        assert_eq!(resolve_base_names(&algorithms, &markers), ["r-cfg-s201"]);
    }

    #[test]
    fn test_single_occurrence_removed() {
        let algorithms = strings(&["r-s1-cfg-s1"]);
        let markers = strings(&["-s1"]);
        assert_eq!(resolve_base_names(&algorithms, &markers), ["r-cfg-s1"]);
    }
}
