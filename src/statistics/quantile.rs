//! Percentile computation using the R-7 linear interpolation rule.
//!
//! The caller's slice is never reordered: [`calc_quantile`] copies the
//! samples into a private buffer and sorts that.

use thiserror::Error;

/// Error returned when a quantile request is malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QuantileError {
    /// Percentile is NaN, not an integer, or outside (0, 100].
    #[error("Quantile must be an integer greater than 0 and less than or equal to 100")]
    InvalidPercentile,
    /// Sample set is empty or contains NaN.
    #[error("Data must be an array of numbers and must contain at least one element")]
    InvalidSamples,
}

/// Compute the value at `percentile` over `samples`.
///
/// Uses the "R-7" quantile definition (linear interpolation between the two
/// closest order statistics), so a single sample is returned unchanged for any
/// percentile and `percentile == 100` yields the maximum.
///
/// # Arguments
///
/// * `percentile` - Integer-valued percentile in (0, 100]
/// * `samples` - Non-empty measurements without NaN entries
///
/// # Errors
///
/// [`QuantileError::InvalidPercentile`] is checked first, then
/// [`QuantileError::InvalidSamples`].
///
/// # Example
///
/// ```
/// use timing_matchers::calc_quantile;
///
/// assert_eq!(calc_quantile(75.0, &[2.0, 0.0, 1.0]), Ok(1.5));
/// ```
pub fn calc_quantile(percentile: f64, samples: &[f64]) -> Result<f64, QuantileError> {
    if !is_valid_percentile(percentile) {
        return Err(QuantileError::InvalidPercentile);
    }
    if samples.is_empty() || samples.iter().any(|x| x.is_nan()) {
        return Err(QuantileError::InvalidSamples);
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    Ok(quantile_sorted(percentile / 100.0, &sorted))
}

/// Quantile at fraction `q` in [0, 1] over data already sorted ascending.
///
/// # Panics
///
/// Panics if `sorted` is empty or if `q` is outside [0, 1] (including NaN).
pub fn quantile_sorted(q: f64, sorted: &[f64]) -> f64 {
    assert!(!sorted.is_empty(), "Cannot compute quantile of empty slice");
    assert!(
        (0.0..=1.0).contains(&q),
        "Quantile probability must be in [0, 1]"
    );

    let pos = (sorted.len() - 1) as f64 * q;
    let base = pos.floor() as usize;
    let rest = pos - pos.floor();

    if base + 1 < sorted.len() {
        sorted[base] + rest * (sorted[base + 1] - sorted[base])
    } else {
        sorted[base]
    }
}

fn is_valid_percentile(p: f64) -> bool {
    p.is_finite() && p.fract() == 0.0 && p > 0.0 && p <= 100.0
}
