use crate::bins::Bins;
use crate::solvers::Solver;
use histo_common::{Fp, HistoError, Result, RunConfig};
use serde::Serialize;
use std::time::Instant;

/// Elapsed-time statistics over repeated runs, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimingStats {
    pub mean_ms: f64,
    pub std_dev_ms: f64, // population standard deviation
    pub min_ms: f64,
    pub max_ms: f64,
}

impl TimingStats {
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self { mean_ms: 0.0, std_dev_ms: 0.0, min_ms: 0.0, max_ms: 0.0 };
        }
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let variance = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
        Self {
            mean_ms: mean,
            std_dev_ms: variance.sqrt(),
            min_ms: samples.iter().cloned().fold(f64::INFINITY, f64::min),
            max_ms: samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub name: String,
    pub config: RunConfig,
    #[serde(flatten)]
    pub stats: TimingStats,
    #[serde(skip)]
    pub bins: Option<Bins>, // bins from the last repetition
}

/// Runs solvers `reps` times against one config and dataset.
pub struct SolverTimer<'a> {
    config: RunConfig,
    dataset: &'a [Fp],
    reps: usize,
}

impl<'a> SolverTimer<'a> {
    pub fn new(config: RunConfig, dataset: &'a [Fp], reps: usize) -> Result<Self> {
        if reps == 0 {
            return Err(HistoError::InvalidArgument("reps must be >= 1".into()));
        }
        if dataset.len() != config.size {
            return Err(HistoError::InvalidArgument(format!(
                "dataset has {} values, config expects {}",
                dataset.len(),
                config.size
            )));
        }
        Ok(Self { config, dataset, reps })
    }

    pub fn time(&self, solver: &dyn Solver) -> Result<RunResult> {
        let mut samples = Vec::with_capacity(self.reps);
        let mut last = None;
        for rep in 0..self.reps {
            let start = Instant::now();
            let bins = solver.solve(&self.config, self.dataset)?;
            let elapsed = start.elapsed().as_secs_f64() * 1000.0;
            tracing::debug!(solver = solver.name(), threads = self.config.threads, rep, elapsed_ms = elapsed, "timed run");
            samples.push(elapsed);
            last = Some(bins);
        }
        let stats = TimingStats::from_samples(&samples);
        tracing::info!(solver = solver.name(), threads = self.config.threads, size = self.config.size, mean_ms = stats.mean_ms, "timing complete");
        Ok(RunResult {
            name: solver.name().to_owned(),
            config: self.config,
            stats,
            bins: last,
        })
    }

    pub fn time_all(&self, solvers: &[&dyn Solver]) -> Result<Vec<RunResult>> {
        solvers.iter().map(|s| self.time(*s)).collect()
    }
}
