//! Command-line interface for cachestat.

use crate::config::Config;
use cachestat_core::JsonReporter;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "cachestat")]
#[command(about = "Bootstrap confidence limits for simulated cache access latencies")]
#[command(version)]
pub struct Cli {
    /// Path to config file (defaults to .cachestat.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Estimate mean latency and worst-case fractions for each sample group
    Analyze(AnalyzeArgs),
    /// Generate the four sample files from the cache model
    Simulate(SimulateArgs),
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Number of bootstrap resamples per interval
    #[arg(long)]
    pub resamples: Option<usize>,

    /// Confidence level for the intervals (0.0-1.0)
    #[arg(long)]
    pub confidence_level: Option<f64>,

    /// Master seed for the bootstrap generator
    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory that relative sample paths are resolved against
    #[arg(long)]
    pub group_dir: Option<PathBuf>,

    /// Write each group's empirical CDF as CSV into this directory
    #[arg(long)]
    pub ecdf_dir: Option<PathBuf>,

    /// Print results as JSON instead of a text report
    #[arg(long)]
    pub json: bool,

    /// Include each group's empirical CDF in the JSON output (implies --json)
    #[arg(long)]
    pub json_ecdf: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

#[derive(Debug, Args)]
pub struct SimulateArgs {
    /// Number of accesses simulated per group
    #[arg(long)]
    pub trials: Option<usize>,

    /// Directory the sample files are written to
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

impl AnalyzeArgs {
    /// The JSON reporter selected by `--json` or `--json-ecdf`, if any.
    pub fn json_reporter(&self) -> Option<JsonReporter> {
        if self.json_ecdf {
            Some(JsonReporter::new().with_ecdf())
        } else if self.json {
            Some(JsonReporter::new())
        } else {
            None
        }
    }
}

impl Cli {
    /// Apply CLI overrides to the configuration.
    ///
    /// CLI arguments take precedence over config file values.
    /// Only non-None optional values will override the config.
    pub fn apply_to_config(&self, config: &mut Config) {
        match &self.command {
            Command::Analyze(args) => {
                if let Some(resamples) = args.resamples {
                    config.bootstrap.resamples = resamples;
                }
                if let Some(confidence_level) = args.confidence_level {
                    config.bootstrap.confidence_level = confidence_level;
                }
                if let Some(seed) = args.seed {
                    config.bootstrap.seed = seed;
                }
            }
            Command::Simulate(args) => {
                if let Some(trials) = args.trials {
                    config.simulation.trials = trials;
                }
                if let Some(out_dir) = &args.out_dir {
                    config.simulation.output_dir = out_dir.clone();
                }
            }
        }
    }
}
