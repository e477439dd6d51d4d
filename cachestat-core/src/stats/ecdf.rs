use serde::{Deserialize, Serialize};

use super::StatsError;

/// Empirical cumulative distribution function of a sample.
///
/// Stored as two equal-length sequences: the sample sorted ascending and the
/// cumulative probability `(i + 1) / n` at each rank `i`. The last probability
/// is exactly 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ecdf {
    values: Vec<f64>,
    probabilities: Vec<f64>,
}

/// Build the empirical CDF of `samples`.
///
/// Ties are kept as separate steps, so every rank advances the probability by
/// exactly `1 / n`.
///
/// # Errors
/// Returns [`StatsError::InvalidInput`] if `samples` is empty.
pub fn build_ecdf(samples: &[f64]) -> Result<Ecdf, StatsError> {
    if samples.is_empty() {
        return Err(StatsError::empty_sample());
    }

    let mut values = samples.to_vec();
    values.sort_by(|a, b| a.total_cmp(b));

    let n = values.len() as f64;
    let probabilities = (1..=values.len()).map(|rank| rank as f64 / n).collect();

    Ok(Ecdf {
        values,
        probabilities,
    })
}

impl Ecdf {
    /// Sorted sample values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Cumulative probability at each sorted rank.
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Number of steps (the sample size).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `(value, probability)` pairs in rank order.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.values
            .iter()
            .copied()
            .zip(self.probabilities.iter().copied())
    }

    /// Fraction of the sample at or below `x`.
    pub fn eval(&self, x: f64) -> f64 {
        let at_or_below = self.values.partition_point(|v| *v <= x);
        at_or_below as f64 / self.values.len() as f64
    }
}
