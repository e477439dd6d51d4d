use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the statistical engine.
///
/// Invalid input is the only failure mode: the engine performs no I/O, so there
/// is nothing transient to retry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl StatsError {
    pub(crate) fn empty_sample() -> Self {
        Self::InvalidInput("sample must contain at least one value".to_string())
    }

    pub(crate) fn resamples(got: usize) -> Self {
        Self::InvalidInput(format!("resample count must be at least 1, got {}", got))
    }

    pub(crate) fn alpha(alpha: f64) -> Self {
        Self::InvalidInput(format!("significance level must be in (0, 1), got {}", alpha))
    }

    pub(crate) fn quantile_level(q: f64) -> Self {
        Self::InvalidInput(format!("quantile must be in [0, 1], got {}", q))
    }
}

/// A scalar summary of a sample.
///
/// Implementations must be pure: the same sample always evaluates to the same
/// value, with no state carried between calls.
pub trait Statistic: Send + Sync {
    /// Evaluate the statistic on a (non-empty) sample.
    fn evaluate(&self, sample: &[f64]) -> f64;

    /// Short human-readable name, used in logs and failure messages.
    fn name(&self) -> String;
}

/// A two-sided confidence interval at a given confidence level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
    /// The confidence level (e.g., 0.95 for a 95% interval).
    pub level: f64,
}

impl ConfidenceInterval {
    /// Whether `value` lies within the closed interval.
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }

    /// Distance between the bounds.
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// A point estimate together with its bootstrap confidence interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    /// The statistic evaluated on the original sample.
    pub point: f64,
    pub interval: ConfidenceInterval,
}

mod bootstrap;
mod ecdf;
mod quantile;
mod statistic;

pub use bootstrap::{bootstrap_ci, derive_seed, seeded_rng, Bootstrap, EngineRng};
pub use ecdf::{build_ecdf, Ecdf};
pub use quantile::quantile;
pub use statistic::{frac_lt_threshold, FractionBelow, Mean};
