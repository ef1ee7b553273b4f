use crate::{Fp, HistoError, Result};
use serde::{Deserialize, Serialize};

/// Immutable parameters of a single histogram run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub threads: usize,
    pub bins: usize,
    pub min: Fp,
    pub max: Fp,
    pub size: usize,
}

impl RunConfig {
    pub fn new(threads: usize, bins: usize, min: Fp, max: Fp, size: usize) -> Result<Self> {
        if threads == 0 {
            return Err(HistoError::InvalidArgument("number of threads must be >= 1".into()));
        }
        if bins == 0 {
            return Err(HistoError::InvalidArgument("number of bins must be >= 1".into()));
        }
        if !min.is_finite() || !max.is_finite() {
            return Err(HistoError::InvalidArgument(format!(
                "range bounds must be finite, got [{min}, {max}]"
            )));
        }
        if min > max {
            return Err(HistoError::InvalidArgument(format!("min ({min}) must be <= max ({max})")));
        }
        Ok(Self { threads, bins, min, max, size })
    }

    /// Same run with a different worker count; the serial baseline uses 1.
    pub fn with_threads(self, threads: usize) -> Result<Self> {
        Self::new(threads, self.bins, self.min, self.max, self.size)
    }

    /// `true` when every precondition the solvers rely on holds.
    pub fn is_valid(&self) -> bool {
        self.threads >= 1 && self.bins >= 1 && self.min <= self.max
    }
}
