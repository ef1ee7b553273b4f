use super::{check_preconditions, Solver};
use crate::binning::{bin_limits, bin_slice};
use crate::bins::Bins;
use crate::partition::slice_range;
use histo_common::{Fp, HistoError, Result, RunConfig};
use rayon::prelude::*;

/// Partition, bin each slice on its own worker, wait for all of them, then
/// fold the partials together.
#[derive(Debug, Clone, Copy, Default)]
pub struct Parallel;

impl Solver for Parallel {
    fn name(&self) -> &'static str {
        "GlobalSum"
    }

    fn solve(&self, config: &RunConfig, dataset: &[Fp]) -> Result<Bins> {
        check_preconditions(config, dataset);
        let workers = config.threads;
        let _span = tracing::debug_span!("solve", solver = self.name(), workers, size = dataset.len()).entered();
        let limits = bin_limits(config.bins, config.min, config.max);

        // one pool per call, sized to the worker count
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("histo-global-{i}"))
            .build()
            .map_err(|e| HistoError::Other(format!("failed to build worker pool: {e}")))?;

        // collect() returns only once every worker has finished
        let partials: Vec<Bins> = pool.install(|| {
            (0..workers)
                .into_par_iter()
                .map(|id| {
                    let range = slice_range(dataset.len(), workers, id);
                    tracing::debug!(worker = id, start = range.start, end = range.end, "binning slice");
                    bin_slice(&dataset[range], &limits)
                })
                .collect()
        });

        let mut output = Bins::new(config.bins);
        for partial in &partials {
            output.merge(partial);
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solvers::Serial;

    #[test]
    fn scenario_four_workers() {
        let data = [0.5, 1.5, 2.5, 3.5, 4.5, 5.0];
        let config = RunConfig::new(4, 5, 0.0, 5.0, data.len()).unwrap();
        let bins = Parallel.solve(&config, &data).unwrap();
        assert_eq!(bins.counts, vec![1, 1, 1, 1, 2]);
        assert_eq!(bins.maxes, vec![0.5, 1.5, 2.5, 3.5, 5.0]);
    }

    #[test]
    fn more_workers_than_values() {
        let data = [0.1, 0.9, 0.5];
        let config = RunConfig::new(8, 2, 0.0, 1.0, data.len()).unwrap();
        let bins = Parallel.solve(&config, &data).unwrap();
        assert!(bins.bitwise_eq(&Serial.solve(&config, &data).unwrap()));
    }

    #[test]
    fn idempotent() {
        let data: Vec<f64> = (0..1000).map(|i| (i % 97) as f64 / 10.0).collect();
        let config = RunConfig::new(3, 7, 0.0, 9.6, data.len()).unwrap();
        let a = Parallel.solve(&config, &data).unwrap();
        let b = Parallel.solve(&config, &data).unwrap();
        assert!(a.bitwise_eq(&b));
        assert_eq!(a.total(), 1000);
    }
}
