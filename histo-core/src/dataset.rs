use histo_common::{Fp, HistoError, Result};
use rand::distributions::Uniform;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// `size` uniformly distributed values in `[min, max]`, reproducible per seed.
pub fn make_dataset(min: Fp, max: Fp, size: usize, seed: u64) -> Result<Vec<Fp>> {
    if !(min.is_finite() && max.is_finite()) || min > max {
        return Err(HistoError::InvalidArgument(format!(
            "dataset range must be finite and sorted, got [{min}, {max}]"
        )));
    }
    let rng = StdRng::seed_from_u64(seed);
    Ok(rng.sample_iter(Uniform::new_inclusive(min, max)).take(size).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_per_seed() {
        let a = make_dataset(0.0, 5.0, 1000, 100).unwrap();
        let b = make_dataset(0.0, 5.0, 1000, 100).unwrap();
        let c = make_dataset(0.0, 5.0, 1000, 101).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn values_in_range() {
        let d = make_dataset(-2.0, 3.0, 5000, 7).unwrap();
        assert_eq!(d.len(), 5000);
        assert!(d.iter().all(|&v| (-2.0..=3.0).contains(&v)));
    }

    #[test]
    fn constant_range() {
        assert!(make_dataset(1.5, 1.5, 10, 0).unwrap().iter().all(|&v| v == 1.5));
    }

    #[test]
    fn bad_range() {
        assert!(make_dataset(5.0, 0.0, 10, 0).is_err());
        assert!(make_dataset(0.0, f64::INFINITY, 10, 0).is_err());
    }
}
