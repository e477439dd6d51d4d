//! cachestat: bootstrap confidence limits for cache access latencies
//!
//! This library loads latency samples for each workload/cache configuration,
//! estimates the mean access time and the fraction of accesses faster than the
//! worst case with percentile bootstrap intervals, and can generate the samples
//! from a simple cache timing model.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod loader;
pub mod simulate;

// Re-export core types for convenience
pub use cachestat_core::report::{
    GroupOutcome, GroupReport, JsonReporter, ReportError, Reporter, TerminalReporter,
};
pub use cachestat_core::stats::{
    bootstrap_ci, build_ecdf, frac_lt_threshold, Bootstrap, ConfidenceInterval, Ecdf, Estimate,
    FractionBelow, Mean, Statistic, StatsError,
};
pub use cachestat_core::{GroupSummary, SampleGroup};

// Re-export main types from this crate
pub use analysis::{write_ecdf_csv, AnalysisError, Analyzer};
pub use cli::Cli;
pub use config::{Config, GroupSpec};
pub use loader::{load_samples, parse_samples, LoadError};
pub use simulate::{CacheModel, Pattern, SimulationError, Simulator};
