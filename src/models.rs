//! Data models for the seed-averaging report.
//!
//! The central type is [`AlgorithmId`], the structured form of the
//! configuration identifiers the experiment toolkit uses. Upstream those
//! are plain strings like `issue1000-base-cpdbs-s2023`; here the
//! revision/descriptor/seed parts are split apart once, at parse time,
//! instead of being re-spliced ad hoc wherever a per-seed lookup is needed.

use crate::error::ReportError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A configuration identifier split into its structural parts.
///
/// The textual form is `{revision}-{descriptor}{seed}`: everything up to
/// the first hyphen is the revision, the rest is the descriptor, and the
/// seed marker (e.g. `-s2023`), when present, is appended after the
/// descriptor. [`fmt::Display`] reproduces that form exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmId {
    pub revision: String,
    pub descriptor: String,
    pub seed: Option<String>,
}

impl AlgorithmId {
    /// Parse a base name (a configuration identifier with the seed marker
    /// already stripped) into revision and descriptor.
    ///
    /// Base names must contain at least one hyphen; the split happens at
    /// the first one.
    pub fn parse_base(name: &str) -> Result<Self, ReportError> {
        let (revision, descriptor) = name
            .split_once('-')
            .ok_or_else(|| ReportError::MalformedAlgorithm(name.to_string()))?;

        Ok(Self {
            revision: revision.to_string(),
            descriptor: descriptor.to_string(),
            seed: None,
        })
    }

    /// The identifier of the run this base name produced under `marker`.
    pub fn with_seed(&self, marker: &str) -> Self {
        Self {
            revision: self.revision.clone(),
            descriptor: self.descriptor.clone(),
            seed: Some(marker.to_string()),
        }
    }
}

impl fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.revision, self.descriptor)?;
        if let Some(ref seed) = self.seed {
            write!(f, "{}", seed)?;
        }
        Ok(())
    }
}

/// Identity of a single run record: (algorithm, domain, problem).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunTriple {
    pub algorithm: String,
    pub domain: String,
    pub problem: String,
}

impl fmt::Display for RunTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.algorithm, self.domain, self.problem)
    }
}

/// One averaged row of the final report.
///
/// Besides the identity fields, the record carries two entries per
/// aggregated attribute: the averaged value (or null) and a paired
/// `<attribute>-stddev` entry. The `-stddev` entry holds the unbiased
/// sample variance, not its square root; downstream consumers of the
/// properties file expect the quantity under that historical name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AveragedRecord {
    pub algorithm: String,
    pub domain: String,
    pub problem: String,
    pub id: Vec<String>,
    #[serde(flatten)]
    pub values: Map<String, Value>,
}

impl AveragedRecord {
    /// Create an averaged record for one (base name, domain, problem) cell.
    pub fn new(algorithm: &str, domain: &str, problem: &str) -> Self {
        Self {
            algorithm: algorithm.to_string(),
            domain: domain.to_string(),
            problem: problem.to_string(),
            id: vec![
                algorithm.to_string(),
                domain.to_string(),
                problem.to_string(),
            ],
            values: Map::new(),
        }
    }

    /// Store the averaged value and its paired spread entry.
    ///
    /// Absent values are written as explicit nulls so every averaged record
    /// carries the same set of keys.
    pub fn set_attribute(&mut self, attribute: &str, average: Option<f64>, spread: Option<f64>) {
        self.values
            .insert(attribute.to_string(), json_number(average));
        self.values
            .insert(format!("{attribute}-stddev"), json_number(spread));
    }
}

fn json_number(value: Option<f64>) -> Value {
    match value {
        Some(v) => Value::from(v),
        None => Value::Null,
    }
}
