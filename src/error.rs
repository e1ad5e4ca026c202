//! Error types for the aggregation pipeline.
//!
//! Every error here is fatal: the destination store is only written after
//! the whole aggregation has succeeded, so a failed run leaves it untouched.

use thiserror::Error;

/// Errors raised while building the averaged report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The destination path does not name a properties store file.
    #[error("outfile must be a path to a properties file, got: {0}")]
    InvalidOutfile(String),

    /// An attribute the caller requested has no known aggregation policy.
    #[error("don't know how to aggregate attribute '{0}'")]
    UnsupportedAttribute(String),

    /// A reconstructed per-seed identifier has no record in the source
    /// store. Distinct from a record whose attribute value is null: this
    /// means the seed's run produced no record at all.
    #[error("no run record for algorithm '{algorithm}' on {domain}:{problem}")]
    MissingRun {
        algorithm: String,
        domain: String,
        problem: String,
    },

    /// A configuration identifier without a revision-descriptor separator.
    #[error("algorithm identifier '{0}' contains no '-' separator")]
    MalformedAlgorithm(String),

    /// A source record lacking one of the identity fields.
    #[error("record '{key}' is missing field '{field}'")]
    MalformedRecord { key: String, field: String },

    /// An attribute value that is neither numeric nor null.
    #[error("attribute '{attribute}' of run '{key}' is not numeric")]
    NonNumericValue { key: String, attribute: String },
}
