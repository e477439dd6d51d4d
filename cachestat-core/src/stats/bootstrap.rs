use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::quantile::quantile_sorted;
use super::{ConfidenceInterval, Estimate, Statistic, StatsError};

/// The pseudo-random generator the engine is run with.
pub type EngineRng = ChaCha8Rng;

/// Create an engine generator from a 64-bit seed.
pub fn seeded_rng(seed: u64) -> EngineRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Derive an independent seed for task `index` from a master seed (SplitMix64).
///
/// Each sample group gets its own stream this way, so a group's bounds do not
/// depend on how many draws earlier groups consumed.
pub fn derive_seed(master: u64, index: u64) -> u64 {
    let mut z = master.wrapping_add(index.wrapping_add(1).wrapping_mul(0x9e37_79b9_7f4a_7c15));
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Percentile bootstrap confidence interval for `statistic` over `data`.
///
/// Draws `resamples` case resamples of size `n = data.len()` with replacement,
/// evaluates the statistic on each, and returns the `alpha / 2` and
/// `1 - alpha / 2` quantiles of the replicates (linear interpolation).
///
/// Draws are consumed from `rng` replicate by replicate, and within a
/// replicate index by index, each index being one `rng.gen_range(0..n)`. The
/// same generator state and arguments therefore always give the same bounds.
///
/// # Errors
/// Returns [`StatsError::InvalidInput`] if `data` is empty, `resamples` is zero
/// or `alpha` is not strictly between 0 and 1.
pub fn bootstrap_ci<R, S>(
    rng: &mut R,
    statistic: &S,
    data: &[f64],
    resamples: usize,
    alpha: f64,
) -> Result<ConfidenceInterval, StatsError>
where
    R: Rng + ?Sized,
    S: Statistic + ?Sized,
{
    if data.is_empty() {
        return Err(StatsError::empty_sample());
    }
    if resamples < 1 {
        return Err(StatsError::resamples(resamples));
    }
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(StatsError::alpha(alpha));
    }

    let n = data.len();
    let mut resample = vec![0.0; n];
    let mut replicates = Vec::with_capacity(resamples);

    for _ in 0..resamples {
        for slot in resample.iter_mut() {
            *slot = data[rng.gen_range(0..n)];
        }
        replicates.push(statistic.evaluate(&resample));
    }

    replicates.sort_by(|a, b| a.total_cmp(b));
    let lower = quantile_sorted(&replicates, alpha / 2.0);
    let upper = quantile_sorted(&replicates, 1.0 - alpha / 2.0);

    Ok(ConfidenceInterval {
        lower,
        upper: upper.max(lower),
        level: 1.0 - alpha,
    })
}

/// Bootstrap settings shared by every statistic in a run.
#[derive(Debug, Clone)]
pub struct Bootstrap {
    /// Number of resamples drawn per interval (default: 2000).
    pub resamples: usize,
    /// Confidence level of the interval (default: 0.95).
    pub confidence_level: f64,
}

impl Default for Bootstrap {
    fn default() -> Self {
        Self {
            resamples: 2000,
            confidence_level: 0.95,
        }
    }
}

impl Bootstrap {
    pub fn new(resamples: usize, confidence_level: f64) -> Self {
        Self {
            resamples,
            confidence_level,
        }
    }

    /// Significance level, the complement of the confidence level.
    pub fn alpha(&self) -> f64 {
        1.0 - self.confidence_level
    }

    /// Confidence interval for `statistic` over `data`.
    pub fn interval<R, S>(
        &self,
        rng: &mut R,
        statistic: &S,
        data: &[f64],
    ) -> Result<ConfidenceInterval, StatsError>
    where
        R: Rng + ?Sized,
        S: Statistic + ?Sized,
    {
        bootstrap_ci(rng, statistic, data, self.resamples, self.alpha())
    }

    /// Point estimate on the original sample plus its confidence interval.
    pub fn estimate<R, S>(
        &self,
        rng: &mut R,
        statistic: &S,
        data: &[f64],
    ) -> Result<Estimate, StatsError>
    where
        R: Rng + ?Sized,
        S: Statistic + ?Sized,
    {
        let interval = self.interval(rng, statistic, data)?;
        Ok(Estimate {
            point: statistic.evaluate(data),
            interval,
        })
    }
}
