//! Core types and utilities for cachestat.
//!
//! This crate holds the resampling engine used by the cachestat CLI: empirical
//! CDF construction, percentile bootstrap confidence intervals for arbitrary
//! scalar statistics, and the reporters that render per-group summaries.

pub mod group;
pub mod report;
pub mod stats;

// Re-export main types for convenience
pub use group::{GroupSummary, SampleGroup};
pub use report::{GroupOutcome, GroupReport, JsonReporter, ReportError, Reporter, TerminalReporter};
pub use stats::{
    bootstrap_ci, build_ecdf, derive_seed, frac_lt_threshold, quantile, seeded_rng, Bootstrap,
    ConfidenceInterval, Ecdf, EngineRng, Estimate, FractionBelow, Mean, Statistic, StatsError,
};
