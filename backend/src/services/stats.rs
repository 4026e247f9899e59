//! Small numeric helpers shared by the aggregators.

use std::cmp::Ordering;

/// Sort floats ascending; NaN compares equal.
pub(crate) fn sort_f64(values: &mut [f64]) {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
}

/// Median as `sorted[n / 2]` (upper-middle element for even lengths, never
/// averaged). `None` for an empty slice.
pub(crate) fn median_of_sorted(sorted: &[f64]) -> Option<f64> {
    sorted.get(sorted.len() / 2).copied()
}

/// `numerator / denominator`, or 0 when the denominator is 0.
pub(crate) fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Descending by `f64` key, NaN treated as equal.
pub(crate) fn desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}
