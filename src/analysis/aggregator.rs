//! The averaging engine.
//!
//! For every (domain, problem) pair of the experiment and every seed-group
//! base name, gathers the per-seed values of each requested attribute and
//! collapses them into one averaged record according to the attribute's
//! policy.

use crate::analysis::classifier::Policy;
use crate::analysis::stats;
use crate::error::ReportError;
use crate::models::{AlgorithmId, AveragedRecord, RunTriple};
use crate::store::RunIndex;
use tracing::debug;

/// Aggregate the whole report.
///
/// Returns `(key, record)` pairs keyed `"{base}-{domain}-{problem}"`, in
/// deterministic order: (domain, problem) pairs as first seen in the source
/// store, base names sorted. The result is a pure function of the source
/// store and the configuration; no row depends on any other.
///
/// `seed_count` is the number of configured seeds. It is the denominator of
/// the arithmetic mean and the completeness gate of the geometric mean, and
/// may differ from `seed_markers.len()` only in unusual setups.
pub fn aggregate(
    index: &RunIndex<'_>,
    base_names: &[String],
    attributes: &[(String, Policy)],
    seed_markers: &[String],
    seed_count: usize,
) -> Result<Vec<(String, AveragedRecord)>, ReportError> {
    // Validate every base name before touching any run data.
    let ids = base_names
        .iter()
        .map(|name| AlgorithmId::parse_base(name))
        .collect::<Result<Vec<_>, _>>()?;

    let mut records = Vec::with_capacity(index.pairs().len() * base_names.len());

    for (domain, problem) in index.pairs() {
        for (base_name, id) in base_names.iter().zip(&ids) {
            debug!("Averaging {} on {}:{}", base_name, domain, problem);

            let key = format!("{base_name}-{domain}-{problem}");
            let mut record = AveragedRecord::new(base_name, domain, problem);

            for (attribute, policy) in attributes {
                let values = seed_values(index, id, domain, problem, attribute, seed_markers)?;
                let present: Vec<f64> = values.iter().flatten().copied().collect();

                let (average, spread) = match policy {
                    Policy::ArithmeticWithVariance => (
                        stats::seed_mean(&values),
                        stats::sample_variance(&present),
                    ),
                    Policy::GatedGeometric => {
                        let average = (present.len() == seed_count)
                            .then(|| stats::geometric_mean(&present));
                        (average, None)
                    }
                };

                record.set_attribute(attribute, average, spread);
            }

            records.push((key, record));
        }
    }

    Ok(records)
}

/// One attribute value per configured seed, in marker order.
///
/// Every reconstructed per-seed identifier must have a record in the source
/// store; a seed whose run never reported is a pipeline fault and aborts
/// the report.
fn seed_values(
    index: &RunIndex<'_>,
    id: &AlgorithmId,
    domain: &str,
    problem: &str,
    attribute: &str,
    seed_markers: &[String],
) -> Result<Vec<Option<f64>>, ReportError> {
    seed_markers
        .iter()
        .map(|marker| {
            let triple = RunTriple {
                algorithm: id.with_seed(marker).to_string(),
                domain: domain.to_string(),
                problem: problem.to_string(),
            };
            index.value(&triple, attribute)
        })
        .collect()
}
