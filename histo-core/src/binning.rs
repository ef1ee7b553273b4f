//! Bucket boundaries and value classification shared by every solver.

use crate::bins::Bins;
use histo_common::Fp;

/// Upper bound of each bucket, ascending.
///
/// Bound `i` is `min + (i + 1) * (max - min) / bins`, computed forward from
/// `min`; the last bound is pinned to `max` so rounding never pushes an
/// in-range value past it.
///
/// When `max - min` overflows, each bound is instead interpolated from
/// `min / bins` and `max / bins`, whose weighted sum stays finite.
pub fn bin_limits(bins: usize, min: Fp, max: Fp) -> Vec<Fp> {
    debug_assert!(bins >= 1, "at least one bucket is required");
    debug_assert!(min <= max, "range must be sorted: [{min}, {max}]");
    let n = bins as Fp;
    let span = max - min;
    let mut limits: Vec<Fp> = if span.is_finite() {
        let step = span / n;
        (1..=bins).map(|i| min + i as Fp * step).collect()
    } else {
        let (lo, hi) = (min / n, max / n);
        (1..=bins).map(|i| lo * (bins - i) as Fp + hi * i as Fp).collect()
    };
    if let Some(last) = limits.last_mut() {
        *last = max;
    }
    limits
}

/// Number of limits strictly below `value`. Limits are inclusive upper
/// bounds; anything above the last limit is clamped into the last bucket.
#[inline]
pub fn bin_index(value: Fp, limits: &[Fp]) -> usize {
    debug_assert!(!limits.is_empty());
    limits
        .partition_point(|&limit| limit < value)
        .min(limits.len() - 1)
}

#[inline]
pub fn insert_to_bin(value: Fp, limits: &[Fp], bins: &mut Bins) {
    debug_assert_eq!(limits.len(), bins.len(), "limits/bins width mismatch");
    bins.record(bin_index(value, limits), value);
}

/// Bins every value of `values` into a fresh accumulator.
pub fn bin_slice(values: &[Fp], limits: &[Fp]) -> Bins {
    let mut bins = Bins::new(limits.len());
    for &value in values {
        insert_to_bin(value, limits, &mut bins);
    }
    bins
}
