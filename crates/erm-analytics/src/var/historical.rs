//! Historical VaR calculation.

use erm_core::types::{ConfidenceLevel, DataFrequency, TimeHorizon};
use erm_core::{RiskError, RiskResult};
use nalgebra::DMatrix;

/// Portfolio return per period: `Σ w_i r_i[t]`.
pub fn portfolio_returns(returns: &DMatrix<f64>, weights: &[f64]) -> RiskResult<Vec<f64>> {
    if returns.ncols() != weights.len() {
        return Err(RiskError::statistical(format!(
            "return matrix has {} assets, {} weights given",
            returns.ncols(),
            weights.len()
        )));
    }
    Ok(returns
        .row_iter()
        .map(|row| row.iter().zip(weights).map(|(r, w)| r * w).sum())
        .collect())
}

/// Calculate historical VaR from a series of portfolio returns.
///
/// # Arguments
///
/// * `returns` - Per-period portfolio returns (as decimals, e.g., -0.01 for -1%)
/// * `portfolio_value` - Current portfolio value
/// * `confidence` - Confidence level
/// * `horizon` - Time horizon
/// * `frequency` - Sampling frequency of `returns`
///
/// The empirical quantile is scaled to the horizon with the same
/// square-root-of-time rule as the parametric method. A quantile that is a
/// gain yields a VaR of 0.
pub fn historical_var(
    returns: &[f64],
    portfolio_value: f64,
    confidence: ConfidenceLevel,
    horizon: TimeHorizon,
    frequency: DataFrequency,
) -> RiskResult<f64> {
    if returns.is_empty() {
        return Err(RiskError::statistical("no returns provided"));
    }
    if returns.iter().any(|r| !r.is_finite()) {
        return Err(RiskError::statistical("portfolio returns contain non-finite values"));
    }

    // Sort returns (ascending - worst returns first)
    let mut sorted_returns = returns.to_vec();
    sorted_returns.sort_by(f64::total_cmp);

    // The epsilon absorbs the representation error of 1 - p (0.09999... for 90%).
    let tail = 1.0 - confidence.probability();
    let var_index = ((tail * sorted_returns.len() as f64 + 1e-9).floor() as usize)
        .min(sorted_returns.len() - 1);
    let var_return = sorted_returns[var_index];

    let scaled_return = var_return * frequency.annualization_factor() * horizon.scaling_factor();

    Ok((-scaled_return * portfolio_value).max(0.0))
}
