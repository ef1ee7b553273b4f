use crate::Fp;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchSettings {
    #[serde(default = "default_reps")]
    pub reps: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_threads")]
    pub threads: Vec<usize>,
    #[serde(default = "default_sizes")]
    pub sizes: Vec<usize>,
    #[serde(default = "default_min")]
    pub min: Fp,
    #[serde(default = "default_max")]
    pub max: Fp,
    #[serde(default = "default_bins")]
    pub bins: usize,
}

fn default_reps() -> usize {
    10
}
fn default_seed() -> u64 {
    100
}
fn default_threads() -> Vec<usize> {
    vec![1, 2, 4, 8, 16, 32, 64, 128]
}
fn default_sizes() -> Vec<usize> {
    vec![10_000, 100_000, 1_000_000, 10_000_000]
}
fn default_min() -> Fp {
    0.0
}
fn default_max() -> Fp {
    5.0
}
fn default_bins() -> usize {
    5
}

impl Default for BenchSettings {
    fn default() -> Self {
        Self {
            reps: default_reps(),
            seed: default_seed(),
            threads: default_threads(),
            sizes: default_sizes(),
            min: default_min(),
            max: default_max(),
            bins: default_bins(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    #[serde(default = "default_precision")]
    pub precision: usize, // decimal places for timing columns
}

fn default_delimiter() -> char {
    ','
}
fn default_precision() -> usize {
    6
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            precision: default_precision(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub bench: BenchSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

impl Settings {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("histo")
            .join("config.toml")
    }

    pub fn load() -> crate::Result<Self> {
        let path = if let Ok(env_path) = std::env::var("HISTO_CONFIG") {
            PathBuf::from(env_path) // $HISTO_CONFIG overrides default config path
        } else {
            Self::config_path()
        };
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let cfg: Self =
            toml::from_str(&content).map_err(|e| crate::HistoError::Config(e.to_string()))?;
        Ok(cfg)
    }

    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::HistoError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let s = Settings::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(s.bench.reps, 10);
        assert_eq!(s.bench.seed, 100);
        assert_eq!(s.bench.threads, vec![1, 2, 4, 8, 16, 32, 64, 128]);
        assert_eq!(s.output.delimiter, ',');
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[bench]\nreps = 3\nsizes = [100]\n").unwrap();
        let s = Settings::load_from(&path).unwrap();
        assert_eq!(s.bench.reps, 3);
        assert_eq!(s.bench.sizes, vec![100]);
        assert_eq!(s.bench.bins, 5);
        assert_eq!(s.output.precision, 6);
    }

    #[test]
    fn malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[bench\nreps = ").unwrap();
        assert!(matches!(Settings::load_from(&path), Err(crate::HistoError::Config(_))));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut s = Settings::default();
        s.bench.threads = vec![3, 5];
        s.output.delimiter = ';';
        s.save_to(&path).unwrap();
        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded.bench.threads, vec![3, 5]);
        assert_eq!(loaded.output.delimiter, ';');
    }
}
