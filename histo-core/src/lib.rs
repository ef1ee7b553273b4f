pub mod binning;
pub mod bins;
pub mod dataset;
pub mod export;
pub mod partition;
pub mod rendezvous;
pub mod solvers;
pub mod timer;
pub mod topology;

pub use binning::{bin_index, bin_limits, bin_slice, insert_to_bin};
pub use bins::Bins;
pub use dataset::make_dataset;
pub use export::{export_csv, export_json, format_bins, write_csv, write_csv_header, write_csv_rows};
pub use histo_common::{Fp, HistoError, Result, RunConfig};
pub use partition::{partition, slice_range};
pub use rendezvous::{Rendezvous, Signal};
pub use solvers::{Parallel, Serial, Solver, SolverKind, Tree};
pub use timer::{RunResult, SolverTimer, TimingStats};
