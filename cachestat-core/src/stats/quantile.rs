use super::StatsError;

/// Compute the `q`-quantile of `values` by linear interpolation between order
/// statistics.
///
/// With the values sorted ascending as `x[0..n]`, the quantile sits at the
/// fractional rank `h = (n - 1) * q` and interpolates between `x[floor(h)]` and
/// `x[floor(h) + 1]`. `q = 0` is the minimum and `q = 1` the maximum.
///
/// # Errors
/// Returns [`StatsError::InvalidInput`] if `values` is empty or `q` is outside
/// `[0, 1]`.
pub fn quantile(values: &[f64], q: f64) -> Result<f64, StatsError> {
    if values.is_empty() {
        return Err(StatsError::empty_sample());
    }
    if !(0.0..=1.0).contains(&q) {
        return Err(StatsError::quantile_level(q));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    Ok(quantile_sorted(&sorted, q))
}

/// Linear-interpolation quantile of an already sorted, non-empty slice.
pub(crate) fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    let rank = q * (n - 1) as f64;
    let lower_idx = rank.floor() as usize;
    let upper_idx = (lower_idx + 1).min(n - 1);
    let fraction = rank - lower_idx as f64;

    let lower = sorted[lower_idx];
    let upper = sorted[upper_idx];
    if lower == upper {
        // Keeps degenerate replicate sets exact.
        return lower;
    }
    lower + fraction * (upper - lower)
}
