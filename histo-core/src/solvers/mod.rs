pub mod parallel;
pub mod serial;
pub mod tree;

pub use parallel::Parallel;
pub use serial::Serial;
pub use tree::Tree;

use crate::bins::Bins;
use histo_common::{Fp, HistoError, Result, RunConfig};
use std::fmt;
use std::str::FromStr;

/// A histogram strategy. Solvers hold no state between calls, so repeated
/// solves over the same input give identical bins.
pub trait Solver: Sync {
    /// Stable name used in reports.
    fn name(&self) -> &'static str;

    /// Bins `dataset` over `config`'s range. The dataset is only borrowed for
    /// the duration of the call.
    fn solve(&self, config: &RunConfig, dataset: &[Fp]) -> Result<Bins>;
}

fn check_preconditions(config: &RunConfig, dataset: &[Fp]) {
    debug_assert!(config.is_valid(), "invalid run config: {config:?}");
    debug_assert_eq!(config.size, dataset.len(), "dataset size does not match config");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolverKind {
    Serial,
    Parallel,
    Tree,
}

impl SolverKind {
    pub const ALL: [SolverKind; 3] = [SolverKind::Serial, SolverKind::Parallel, SolverKind::Tree];

    pub fn solver(self) -> &'static dyn Solver {
        match self {
            SolverKind::Serial => &Serial,
            SolverKind::Parallel => &Parallel,
            SolverKind::Tree => &Tree,
        }
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SolverKind::Serial => "serial",
            SolverKind::Parallel => "parallel",
            SolverKind::Tree => "tree",
        })
    }
}

impl FromStr for SolverKind {
    type Err = HistoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "serial" | "serialsum" => Ok(SolverKind::Serial),
            "parallel" | "globalsum" => Ok(SolverKind::Parallel),
            "tree" | "treestructuredsum" => Ok(SolverKind::Tree),
            other => Err(HistoError::InvalidArgument(format!("unknown solver: {other}"))),
        }
    }
}
