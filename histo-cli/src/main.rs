use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use histo_common::{Fp, RunConfig, Settings};
use histo_core::{
    bin_limits, export_csv, export_json, format_bins, make_dataset, write_csv_header,
    write_csv_rows, RunResult, Solver, SolverKind, SolverTimer,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn parse_positive(s: &str) -> Result<usize, String> { // threads/bins must be >= 1 at CLI parse time
    let v: usize = s.parse().map_err(|_| format!("not a non-negative integer: {s}"))?;
    if v >= 1 { Ok(v) } else { Err("must be >= 1".into()) }
}

fn parse_solver(s: &str) -> Result<SolverKind, String> {
    s.parse().map_err(|e| format!("{e}"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Csv,
    Json,
}

#[derive(Parser)]
#[command(name = "histo", version, about = "Serial, partitioned and tree-reduced histogram solvers")]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Time the solvers on one generated dataset
    Run {
        #[arg(value_parser = parse_positive)] threads: usize,
        #[arg(value_parser = parse_positive)] bins: usize,
        #[arg(allow_negative_numbers = true)] min: Fp,
        #[arg(allow_negative_numbers = true)] max: Fp,
        size: usize,
        #[arg(long, value_delimiter = ',', value_parser = parse_solver)]
        solver: Option<Vec<SolverKind>>,
        #[arg(long)] seed: Option<u64>,
        #[arg(long)] reps: Option<usize>,
        #[arg(long, value_enum, default_value = "csv")] format: Format,
        #[arg(long)] output: Option<PathBuf>,
        #[arg(long)] show_bins: bool,
    },
    /// Sweep thread counts and dataset sizes from the settings file
    Bench {
        #[arg(long)] reps: Option<usize>,
        #[arg(long)] seed: Option<u64>,
        #[arg(long, value_delimiter = ',')] sizes: Option<Vec<usize>>,
        #[arg(long, value_delimiter = ',')] threads: Option<Vec<usize>>,
        #[arg(long, value_enum, default_value = "csv")] format: Format,
        #[arg(long)] output: Option<PathBuf>,
    },
    /// Print the effective settings as TOML
    Config {
        /// Write the effective settings to the config path
        #[arg(long)] save: bool,
    },
    /// Generate shell completions
    Completions { shell: clap_complete::Shell },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr) // keep stdout clean for the report
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let settings = Settings::load().unwrap_or_else(|e| {
        tracing::warn!("ignoring unreadable settings: {e}");
        Settings::default()
    });
    match cli.command {
        Commands::Run { threads, bins, min, max, size, solver, seed, reps, format, output, show_bins } => {
            let config = RunConfig::new(threads, bins, min, max, size).map_err(|e| anyhow::anyhow!("{e}"))?;
            let solvers = solver.unwrap_or_else(|| SolverKind::ALL.to_vec());
            let seed = seed.unwrap_or(settings.bench.seed);
            let reps = reps.unwrap_or(settings.bench.reps);
            run_single(config, &solvers, seed, reps, format, output.as_deref(), show_bins, &settings)?
        }
        Commands::Bench { reps, seed, sizes, threads, format, output } => {
            let mut bench = settings.bench.clone();
            if let Some(r) = reps { bench.reps = r; }
            if let Some(s) = seed { bench.seed = s; }
            if let Some(s) = sizes { bench.sizes = s; }
            if let Some(t) = threads { bench.threads = t; }
            let settings = Settings { bench, ..settings };
            run_bench(&settings, format, output.as_deref())?
        }
        Commands::Config { save } => {
            print!("{}", settings.to_toml().map_err(|e| anyhow::anyhow!("{e}"))?);
            if save {
                settings.save().map_err(|e| anyhow::anyhow!("{e}"))?;
                eprintln!("Settings saved to {}", Settings::config_path().display());
            }
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "histo", &mut io::stdout());
        }
    }
    Ok(())
}

/// Config a solver is timed with; the serial baseline is always reported with one thread.
fn config_for(kind: SolverKind, config: RunConfig) -> anyhow::Result<RunConfig> {
    match kind {
        SolverKind::Serial => config.with_threads(1).map_err(|e| anyhow::anyhow!("{e}")),
        _ => Ok(config),
    }
}

fn time_solver(config: RunConfig, dataset: &[Fp], reps: usize, solver: &dyn Solver) -> anyhow::Result<RunResult> {
    let timer = SolverTimer::new(config, dataset, reps).map_err(|e| anyhow::anyhow!("{e}"))?;
    timer.time(solver).map_err(|e| anyhow::anyhow!("{e}"))
}

#[allow(clippy::too_many_arguments)]
fn run_single(
    config: RunConfig,
    solvers: &[SolverKind],
    seed: u64,
    reps: usize,
    format: Format,
    output: Option<&Path>,
    show_bins: bool,
    settings: &Settings,
) -> anyhow::Result<()> {
    let dataset = make_dataset(config.min, config.max, config.size, seed).map_err(|e| anyhow::anyhow!("{e}"))?;
    let mut results = Vec::with_capacity(solvers.len());
    for &kind in solvers {
        results.push(time_solver(config_for(kind, config)?, &dataset, reps, kind.solver())?);
    }
    emit(&results, format, output, settings)?;
    if show_bins {
        let limits = bin_limits(config.bins, config.min, config.max);
        for r in &results {
            if let Some(bins) = &r.bins {
                eprintln!("{}:", r.name);
                eprint!("{}", format_bins(&limits, bins));
            }
        }
    }
    Ok(())
}

fn run_bench(settings: &Settings, format: Format, output: Option<&Path>) -> anyhow::Result<()> {
    let bench = &settings.bench;
    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let flag = Arc::clone(&interrupted);
        ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))?;
    }

    // rows go to stdout as each size finishes unless a report file was requested
    let streaming = output.is_none() && format == Format::Csv;
    let delimiter = settings.output.delimiter;
    let precision = settings.output.precision;
    let mut stdout = io::stdout().lock();
    if streaming {
        write_csv_header(&mut stdout, delimiter).map_err(|e| anyhow::anyhow!("{e}"))?;
    }

    let mut all = Vec::new();
    'sizes: for &size in &bench.sizes {
        let dataset = make_dataset(bench.min, bench.max, size, bench.seed).map_err(|e| anyhow::anyhow!("{e}"))?;
        let base = RunConfig::new(1, bench.bins, bench.min, bench.max, size).map_err(|e| anyhow::anyhow!("{e}"))?;
        let mut results = vec![time_solver(base, &dataset, bench.reps, SolverKind::Serial.solver())?];
        for &threads in &bench.threads {
            if interrupted.load(Ordering::SeqCst) {
                tracing::warn!(size, threads, "bench interrupted, reporting partial results");
                all.extend(results);
                break 'sizes;
            }
            let config = base.with_threads(threads).map_err(|e| anyhow::anyhow!("{e}"))?;
            for kind in [SolverKind::Parallel, SolverKind::Tree] {
                results.push(time_solver(config, &dataset, bench.reps, kind.solver())?);
            }
        }
        if streaming {
            write_csv_rows(&mut stdout, &results, delimiter, precision).map_err(|e| anyhow::anyhow!("{e}"))?;
            stdout.flush()?;
        }
        all.extend(results);
    }

    if !streaming {
        drop(stdout);
        emit(&all, format, output, settings)?;
    }
    Ok(())
}

fn emit(results: &[RunResult], format: Format, output: Option<&Path>, settings: &Settings) -> anyhow::Result<()> {
    let delimiter = settings.output.delimiter;
    let precision = settings.output.precision;
    match (format, output) {
        (Format::Csv, Some(path)) => {
            export_csv(path, results, delimiter, precision).map_err(|e| anyhow::anyhow!("{e}"))?;
            eprintln!("Report written to {}", path.display());
        }
        (Format::Json, Some(path)) => {
            export_json(path, results).map_err(|e| anyhow::anyhow!("{e}"))?;
            eprintln!("Report written to {}", path.display());
        }
        (Format::Csv, None) => {
            let mut stdout = io::stdout().lock();
            histo_core::write_csv(&mut stdout, results, delimiter, precision).map_err(|e| anyhow::anyhow!("{e}"))?;
        }
        (Format::Json, None) => {
            println!("{}", serde_json::to_string_pretty(results)?);
        }
    }
    Ok(())
}
