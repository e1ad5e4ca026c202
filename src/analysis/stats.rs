//! Averaging primitives for seed-grouped measurements.

/// Mean over the full seed slot count.
///
/// The sum runs over the present values only, but the denominator is the
/// total number of slots, absent ones included. This matches how the
/// experiment toolkit has always averaged coverage-like attributes: a seed
/// that reported nothing drags the average toward zero instead of being
/// ignored. Returns `None` only for an empty slice.
pub fn seed_mean(values: &[Option<f64>]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: f64 = values.iter().flatten().sum();
    Some(sum / values.len() as f64)
}

/// Unbiased sample variance (n−1 denominator) of the present values,
/// taken about their own mean. Defined for two or more values.
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some(sum_sq / (values.len() - 1) as f64)
}

/// Geometric mean: the product of `v^(1/n)` over all values.
pub fn geometric_mean(values: &[f64]) -> f64 {
    debug_assert!(!values.is_empty());
    let exp = 1.0 / values.len() as f64;
    values.iter().map(|v| v.powf(exp)).product()
}
