//! The flat JSON properties store.
//!
//! The experiment toolkit persists run records as a single top-level JSON
//! object in a file conventionally named `properties`: one key per run,
//! one object of named attribute values per key. This module reads and
//! writes that format and builds the lookup index the aggregator works
//! against.
//!
//! Insertion order is preserved end to end (`serde_json` is compiled with
//! `preserve_order`), so writing an unchanged store back produces an
//! identical file.

use crate::error::ReportError;
use crate::models::RunTriple;
use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// An insertion-ordered key-value store backed by a properties file.
#[derive(Debug, Clone)]
pub struct PropertiesStore {
    path: PathBuf,
    entries: Map<String, Value>,
}

impl PropertiesStore {
    /// Load a store from an existing properties file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read properties file: {}", path.display()))?;

        let entries: Map<String, Value> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse properties file: {}", path.display()))?;

        debug!("Loaded {} records from {}", entries.len(), path.display());

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// Open the store at `path`, starting empty if the file does not exist
    /// yet. Used for the destination store, which is created on first run.
    pub fn load_or_empty(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self {
                path: path.to_path_buf(),
                entries: Map::new(),
            })
        }
    }

    /// Number of records in the store.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[allow(dead_code)] // Read access for consumers and tests
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Insert a record, overwriting any existing entry with the same key.
    /// Overwriting keeps the key's original position, so re-running a
    /// report over unchanged inputs rewrites the file byte for byte.
    pub fn insert(&mut self, key: String, record: Value) {
        self.entries.insert(key, record);
    }

    /// Iterate over (key, record) pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    /// Flush the whole store to its file in a single write.
    pub fn write(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create directory: {}", parent.display())
                })?;
            }
        }

        let mut content = serde_json::to_string_pretty(&self.entries)?;
        content.push('\n');

        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write properties file: {}", self.path.display()))?;

        debug!("Wrote {} records to {}", self.entries.len(), self.path.display());
        Ok(())
    }
}

/// Index over a source store keyed by (algorithm, domain, problem).
///
/// Also collects, in first-seen order, the distinct algorithm names and the
/// distinct (domain, problem) pairs of the experiment.
#[derive(Debug)]
pub struct RunIndex<'a> {
    runs: HashMap<RunTriple, &'a Map<String, Value>>,
    algorithms: Vec<String>,
    pairs: Vec<(String, String)>,
}

impl<'a> RunIndex<'a> {
    /// Build the index by reading each record's identity fields.
    ///
    /// A record without `algorithm`, `domain` and `problem` string fields is
    /// a malformed store and aborts the report.
    pub fn build(store: &'a PropertiesStore) -> Result<Self, ReportError> {
        let mut runs = HashMap::with_capacity(store.len());
        let mut algorithms = Vec::new();
        let mut pairs = Vec::new();

        for (key, record) in store.iter() {
            let record = record
                .as_object()
                .ok_or_else(|| ReportError::MalformedRecord {
                    key: key.clone(),
                    field: "<object>".to_string(),
                })?;

            let algorithm = identity_field(key, record, "algorithm")?;
            let domain = identity_field(key, record, "domain")?;
            let problem = identity_field(key, record, "problem")?;

            if !algorithms.iter().any(|a| a == &algorithm) {
                algorithms.push(algorithm.clone());
            }
            let pair = (domain.clone(), problem.clone());
            if !pairs.contains(&pair) {
                pairs.push(pair);
            }

            runs.insert(
                RunTriple {
                    algorithm,
                    domain,
                    problem,
                },
                record,
            );
        }

        Ok(Self {
            runs,
            algorithms,
            pairs,
        })
    }

    /// Distinct algorithm identifiers, in first-seen order.
    pub fn algorithms(&self) -> &[String] {
        &self.algorithms
    }

    /// Distinct (domain, problem) pairs, in first-seen order.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Look up one attribute value of one run.
    ///
    /// A missing run record is a hard error: the caller asked for a seed
    /// whose run never reported back. An attribute that is missing from the
    /// record, or explicitly null, is an absent measurement (`Ok(None)`).
    pub fn value(&self, triple: &RunTriple, attribute: &str) -> Result<Option<f64>, ReportError> {
        let record = self.runs.get(triple).ok_or_else(|| ReportError::MissingRun {
            algorithm: triple.algorithm.clone(),
            domain: triple.domain.clone(),
            problem: triple.problem.clone(),
        })?;

        match record.get(attribute) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => {
                n.as_f64().ok_or_else(|| ReportError::NonNumericValue {
                    key: triple.to_string(),
                    attribute: attribute.to_string(),
                })
                .map(Some)
            }
            Some(_) => Err(ReportError::NonNumericValue {
                key: triple.to_string(),
                attribute: attribute.to_string(),
            }),
        }
    }
}

fn identity_field(
    key: &str,
    record: &Map<String, Value>,
    field: &str,
) -> Result<String, ReportError> {
    record
        .get(field)
        .and_then(Value::as_str)
        .map(String::from)
        .ok_or_else(|| ReportError::MalformedRecord {
            key: key.to_string(),
            field: field.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    fn fixture_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/properties")
    }

    fn store_with(entries: &[(&str, Value)]) -> PropertiesStore {
        let mut store = PropertiesStore {
            path: PathBuf::from("properties"),
            entries: Map::new(),
        };
        for (key, record) in entries {
            store.insert(key.to_string(), record.clone());
        }
        store
    }

    #[test]
    fn test_load_fixture() {
        let store = PropertiesStore::load(&fixture_path()).unwrap();
        assert_eq!(store.len(), 8);
        assert!(store.get("r-cpdbs-s2023-gripper-prob01.pddl").is_some());
    }

    #[test]
    fn test_index_collects_algorithms_and_pairs() {
        let store = PropertiesStore::load(&fixture_path()).unwrap();
        let index = RunIndex::build(&store).unwrap();

        assert_eq!(index.algorithms(), ["r-cpdbs-s2023", "r-cpdbs-s2024"]);
        assert_eq!(
            index.pairs(),
            [
                ("gripper".to_string(), "prob01.pddl".to_string()),
                ("gripper".to_string(), "prob02.pddl".to_string()),
                ("miconic".to_string(), "s1-0.pddl".to_string()),
                ("miconic".to_string(), "s2-0.pddl".to_string()),
            ]
        );
    }

    #[test]
    fn test_value_distinguishes_absent_from_missing_run() {
        let store = store_with(&[(
            "r-a-d-p",
            json!({"algorithm": "r-a", "domain": "d", "problem": "p", "coverage": 1}),
        )]);
        let index = RunIndex::build(&store).unwrap();

        let triple = RunTriple {
            algorithm: "r-a".to_string(),
            domain: "d".to_string(),
            problem: "p".to_string(),
        };
        assert_eq!(index.value(&triple, "coverage").unwrap(), Some(1.0));
        // attribute not reported by this run
        assert_eq!(index.value(&triple, "search_time").unwrap(), None);

        // run never reported at all
        let missing = RunTriple {
            algorithm: "r-b".to_string(),
            ..triple
        };
        let err = index.value(&missing, "coverage").unwrap_err();
        assert!(matches!(err, ReportError::MissingRun { .. }));
    }

    #[test]
    fn test_value_rejects_non_numeric() {
        let store = store_with(&[(
            "r-a-d-p",
            json!({"algorithm": "r-a", "domain": "d", "problem": "p", "error": "timeout"}),
        )]);
        let index = RunIndex::build(&store).unwrap();

        let triple = RunTriple {
            algorithm: "r-a".to_string(),
            domain: "d".to_string(),
            problem: "p".to_string(),
        };
        let err = index.value(&triple, "error").unwrap_err();
        assert!(matches!(err, ReportError::NonNumericValue { .. }));
    }

    #[test]
    fn test_malformed_record_is_rejected() {
        let store = store_with(&[("bad", json!({"algorithm": "r-a", "domain": "d"}))]);
        let err = RunIndex::build(&store).unwrap_err();
        assert!(matches!(
            err,
            ReportError::MalformedRecord { ref field, .. } if field == "problem"
        ));
    }

    #[test]
    fn test_write_round_trip_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("properties");

        let mut store = PropertiesStore::load_or_empty(&path).unwrap();
        assert!(store.is_empty());
        store.insert(
            "r-a-d-p".to_string(),
            json!({"algorithm": "r-a", "domain": "d", "problem": "p", "coverage": 1.0}),
        );
        store.write().unwrap();
        let first = std::fs::read(&path).unwrap();

        let reloaded = PropertiesStore::load(&path).unwrap();
        reloaded.write().unwrap();
        let second = std::fs::read(&path).unwrap();

        assert_eq!(first, second);
    }
}
