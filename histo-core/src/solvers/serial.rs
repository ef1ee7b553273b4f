use super::{check_preconditions, Solver};
use crate::binning::{bin_limits, bin_slice};
use crate::bins::Bins;
use histo_common::{Fp, Result, RunConfig};

/// Single-threaded pass over the whole dataset.
#[derive(Debug, Clone, Copy, Default)]
pub struct Serial;

impl Solver for Serial {
    fn name(&self) -> &'static str {
        "SerialSum"
    }

    fn solve(&self, config: &RunConfig, dataset: &[Fp]) -> Result<Bins> {
        check_preconditions(config, dataset);
        let _span = tracing::debug_span!("solve", solver = self.name(), size = dataset.len()).entered();
        let limits = bin_limits(config.bins, config.min, config.max);
        Ok(bin_slice(dataset, &limits))
    }
}
