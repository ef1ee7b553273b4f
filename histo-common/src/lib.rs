pub mod config;
pub mod run;
pub use config::{BenchSettings, OutputSettings, Settings};
pub use run::RunConfig;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HistoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, HistoError>;

/// Floating point type of every dataset value, boundary and bucket maximum.
pub type Fp = f64;
