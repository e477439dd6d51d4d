use statrs::statistics::Statistics;

use super::Statistic;

/// Arithmetic mean of the sample.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mean;

impl Statistic for Mean {
    fn evaluate(&self, sample: &[f64]) -> f64 {
        sample.iter().mean()
    }

    fn name(&self) -> String {
        "mean".to_string()
    }
}

/// Fraction of the sample strictly below a threshold.
///
/// The threshold is part of the statistic rather than captured state, so one
/// instance per group carries that group's worst-case constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FractionBelow {
    pub threshold: f64,
}

impl FractionBelow {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl Statistic for FractionBelow {
    fn evaluate(&self, sample: &[f64]) -> f64 {
        frac_lt_threshold(sample, self.threshold)
    }

    fn name(&self) -> String {
        format!("fraction < {}", self.threshold)
    }
}

/// Fraction of `data` strictly below `threshold`. Returns 0 for an empty slice.
pub fn frac_lt_threshold(data: &[f64], threshold: f64) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let below = data.iter().filter(|&&x| x < threshold).count();
    below as f64 / data.len() as f64
}
