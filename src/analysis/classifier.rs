//! Attribute classification.
//!
//! Every attribute a report asks for must map to one of two averaging
//! policies before any aggregation starts. The rules are closed-world on
//! purpose: an attribute nobody thought about is a configuration mistake,
//! not something to average with a guessed policy.

use crate::error::ReportError;

/// How the per-seed values of an attribute are collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Arithmetic mean over the full seed count, with an unbiased sample
    /// variance alongside when at least two seeds reported a value.
    ArithmeticWithVariance,
    /// Geometric mean, computed only when every configured seed reported a
    /// value; otherwise the average is absent. Partial seed sets would bias
    /// time-like attributes toward the runs that finished.
    GatedGeometric,
}

/// Attributes averaged arithmetically regardless of their name.
///
/// Checked before the substring rules, so `avg_time_per_generator` stays
/// arithmetic despite containing "time".
const ARITHMETIC_ATTRIBUTES: &[&str] = &[
    "avg_time_per_generator",
    "cost",
    "coverage",
    "initial_h_value",
    "expansions_until_last_jump",
    "num_abstractions",
];

/// Classify a single attribute name. First matching rule wins.
pub fn classify(attribute: &str) -> Result<Policy, ReportError> {
    if ARITHMETIC_ATTRIBUTES.contains(&attribute) || attribute.contains("score") {
        Ok(Policy::ArithmeticWithVariance)
    } else if attribute.contains("time") || attribute.contains("expansions") {
        Ok(Policy::GatedGeometric)
    } else {
        Err(ReportError::UnsupportedAttribute(attribute.to_string()))
    }
}

/// Classify every requested attribute up front.
///
/// Fails on the first unknown attribute so nothing is aggregated or
/// written for a half-understood attribute list.
pub fn classify_all(attributes: &[String]) -> Result<Vec<(String, Policy)>, ReportError> {
    attributes
        .iter()
        .map(|attr| classify(attr).map(|policy| (attr.clone(), policy)))
        .collect()
}
