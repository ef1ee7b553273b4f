use histo_common::Fp;
use serde::Serialize;

/// Per-bucket counts and maxima.
///
/// `maxes[i]` holds [`Bins::EMPTY_MAX`] until the first value lands in bucket `i`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bins {
    pub counts: Vec<u64>,
    pub maxes: Vec<Fp>,
}

impl Bins {
    /// Sentinel below any valid input.
    pub const EMPTY_MAX: Fp = Fp::NEG_INFINITY;

    /// Identity element of [`Bins::merge`].
    pub fn new(bins: usize) -> Self {
        Self {
            counts: vec![0; bins],
            maxes: vec![Self::EMPTY_MAX; bins],
        }
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Adds `value` to bucket `index`. On a tie the value already held wins,
    /// so the earliest inserted maximum is the one that survives.
    #[inline]
    pub fn record(&mut self, index: usize, value: Fp) {
        self.counts[index] += 1;
        if value > self.maxes[index] {
            self.maxes[index] = value;
        }
    }

    /// Folds `other` into `self`: counts add, maxes take the larger value.
    /// Ties keep `self`'s value, so merging partials in slice order gives the
    /// same bits as a single pass.
    pub fn merge(&mut self, other: &Bins) {
        debug_assert_eq!(self.len(), other.len(), "merging histograms of different widths");
        for (count, other_count) in self.counts.iter_mut().zip(&other.counts) {
            *count += other_count;
        }
        for (max, &other_max) in self.maxes.iter_mut().zip(&other.maxes) {
            if other_max > *max {
                *max = other_max;
            }
        }
    }

    /// Bucket maximum, `None` for an empty bucket.
    pub fn max_of(&self, index: usize) -> Option<Fp> {
        (self.counts[index] > 0).then(|| self.maxes[index])
    }

    /// Bit-level equality, distinguishing `0.0` from `-0.0`.
    pub fn bitwise_eq(&self, other: &Bins) -> bool {
        self.counts == other.counts
            && self.maxes.len() == other.maxes.len()
            && self.maxes.iter().zip(&other.maxes).all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_empty_identity() {
        let b = Bins::new(3);
        assert_eq!(b.counts, vec![0, 0, 0]);
        assert!(b.maxes.iter().all(|&m| m == Bins::EMPTY_MAX));
        assert_eq!(b.total(), 0);
        assert_eq!(b.max_of(1), None);
    }

    #[test]
    fn record_tracks_count_and_max() {
        let mut b = Bins::new(2);
        b.record(1, 3.0);
        b.record(1, 1.5);
        b.record(1, 4.0);
        assert_eq!(b.counts, vec![0, 3]);
        assert_eq!(b.max_of(1), Some(4.0));
        assert_eq!(b.max_of(0), None);
    }

    #[test]
    fn merge_sums_and_maxes() {
        let mut a = Bins::new(3);
        a.record(0, 0.5);
        a.record(2, 4.0);
        let mut b = Bins::new(3);
        b.record(0, 0.9);
        b.record(1, 2.0);
        b.record(2, 3.0);
        a.merge(&b);
        assert_eq!(a.counts, vec![2, 1, 2]);
        assert_eq!(a.maxes, vec![0.9, 2.0, 4.0]);
    }

    #[test]
    fn merge_with_identity_is_noop() {
        let mut a = Bins::new(2);
        a.record(0, 1.0);
        let before = a.clone();
        a.merge(&Bins::new(2));
        assert!(a.bitwise_eq(&before));
    }

    #[test]
    fn ties_keep_existing_bits() {
        let mut a = Bins::new(1);
        a.record(0, 0.0);
        a.record(0, -0.0);
        assert_eq!(a.maxes[0].to_bits(), 0.0f64.to_bits());
        let mut b = Bins::new(1);
        b.record(0, -0.0);
        a.merge(&b);
        assert_eq!(a.maxes[0].to_bits(), 0.0f64.to_bits());
        assert!(!a.bitwise_eq(&b));
    }
}
