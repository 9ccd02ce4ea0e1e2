//! Parametric (variance-covariance) VaR calculation.

use erm_core::types::{ConfidenceLevel, DataFrequency, TimeHorizon};
use erm_core::{RiskError, RiskResult};
use erm_math::distributions::standard_normal_quantile;
use erm_math::linear_algebra::{check_covariance, mat_vec};
use nalgebra::DMatrix;
use tracing::debug;

/// Relative tolerance under which a negative diversification benefit is
/// treated as rounding.
const ROUNDING_TOLERANCE: f64 = 1e-9;

/// Inputs of a parametric VaR calculation.
#[derive(Debug, Clone, Copy)]
pub struct ParametricInputs<'a> {
    /// Market value of each asset.
    pub market_values: &'a [f64],
    /// Per-period covariance of asset returns.
    pub covariance: &'a DMatrix<f64>,
    /// Confidence level.
    pub confidence: ConfidenceLevel,
    /// VaR horizon.
    pub horizon: TimeHorizon,
    /// Sampling frequency of the returns behind `covariance`.
    pub frequency: DataFrequency,
}

/// Output of a parametric VaR calculation. Vectors follow input order.
#[derive(Debug, Clone, PartialEq)]
pub struct ParametricVaR {
    /// Standard-normal quantile for the confidence level.
    pub z_score: f64,
    /// √(horizon / 252).
    pub horizon_factor: f64,
    /// Sum of market values.
    pub portfolio_value: f64,
    /// Asset weights.
    pub weights: Vec<f64>,
    /// Per-period portfolio variance `wᵀΣw`.
    pub portfolio_variance: f64,
    /// Annualised portfolio volatility (fraction, not percent).
    pub volatility: f64,
    /// Portfolio VaR in currency units.
    pub var: f64,
    /// Annualised volatility of each asset (fraction).
    pub asset_volatility: Vec<f64>,
    /// Standalone VaR of each asset.
    pub standalone: Vec<f64>,
    /// Euler contribution of each asset; sums to `var`.
    pub contributions: Vec<f64>,
    /// Σ standalone − `var`.
    pub diversification_benefit: f64,
}

impl ParametricVaR {
    /// Sum of standalone VaRs.
    pub fn standalone_sum(&self) -> f64 {
        self.standalone.iter().sum()
    }
}

/// Calculates parametric VaR with Euler allocation.
///
/// `VaR = z × σ_annual × √(horizon/252) × V` where `σ_annual` is the
/// per-period portfolio volatility `√(wᵀΣw)` annualised by the data
/// frequency. Standalone VaR uses each asset's own variance and value;
/// contributions are `w_i (Σw)_i / wᵀΣw × VaR`.
///
/// # Errors
///
/// [`RiskError::StatisticalComputationError`] when the covariance matrix
/// is not a valid covariance, its size does not match the holdings, the
/// portfolio has no value, or the portfolio variance is zero or not finite.
pub fn parametric_var(inputs: &ParametricInputs<'_>) -> RiskResult<ParametricVaR> {
    let n = inputs.market_values.len();
    if n == 0 {
        return Err(RiskError::statistical("no assets to aggregate"));
    }
    if inputs.covariance.nrows() != n {
        return Err(RiskError::statistical(format!(
            "covariance matrix is {}x{} for {} assets",
            inputs.covariance.nrows(),
            inputs.covariance.ncols(),
            n
        )));
    }
    check_covariance(inputs.covariance)?;

    let portfolio_value: f64 = inputs.market_values.iter().sum();
    if !portfolio_value.is_finite() || portfolio_value <= 0.0 {
        return Err(RiskError::statistical(format!(
            "portfolio value must be positive, got {portfolio_value}"
        )));
    }
    let weights: Vec<f64> = inputs
        .market_values
        .iter()
        .map(|v| v / portfolio_value)
        .collect();

    let sigma_w = mat_vec(inputs.covariance, &weights)?;
    let portfolio_variance: f64 = weights.iter().zip(sigma_w.iter()).map(|(w, s)| w * s).sum();
    if !portfolio_variance.is_finite() {
        return Err(RiskError::statistical("portfolio variance is not finite"));
    }
    if portfolio_variance <= 0.0 {
        return Err(RiskError::statistical(format!(
            "portfolio variance is {portfolio_variance:e}; VaR contributions are undefined for a riskless portfolio"
        )));
    }

    let z_score = standard_normal_quantile(inputs.confidence.probability())?;
    let annualization = inputs.frequency.annualization_factor();
    let horizon_factor = inputs.horizon.scaling_factor();
    let scale = z_score * annualization * horizon_factor;

    let volatility = portfolio_variance.sqrt() * annualization;
    let var = scale * portfolio_variance.sqrt() * portfolio_value;

    let asset_volatility: Vec<f64> = (0..n)
        .map(|i| inputs.covariance[(i, i)].max(0.0).sqrt() * annualization)
        .collect();
    let standalone: Vec<f64> = (0..n)
        .map(|i| scale * inputs.covariance[(i, i)].max(0.0).sqrt() * inputs.market_values[i])
        .collect();
    let contributions: Vec<f64> = (0..n)
        .map(|i| weights[i] * sigma_w[i] / portfolio_variance * var)
        .collect();

    let mut diversification_benefit = standalone.iter().sum::<f64>() - var;
    if diversification_benefit < 0.0 && diversification_benefit > -ROUNDING_TOLERANCE * var {
        diversification_benefit = 0.0;
    }

    debug!(
        assets = n,
        z_score,
        volatility,
        var,
        diversification_benefit,
        "parametric VaR computed"
    );

    Ok(ParametricVaR {
        z_score,
        horizon_factor,
        portfolio_value,
        weights,
        portfolio_variance,
        volatility,
        var,
        asset_volatility,
        standalone,
        contributions,
        diversification_benefit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn inputs<'a>(
        values: &'a [f64],
        cov: &'a DMatrix<f64>,
        confidence: ConfidenceLevel,
        days: u32,
    ) -> ParametricInputs<'a> {
        ParametricInputs {
            market_values: values,
            covariance: cov,
            confidence,
            horizon: TimeHorizon::new(days).unwrap(),
            frequency: DataFrequency::Daily,
        }
    }

    #[test]
    fn test_single_asset_one_day() {
        // 1% daily vol, 1,000,000 at 95%: 1.645 × 0.01 × 1,000,000
        let cov = DMatrix::from_row_slice(1, 1, &[0.0001]);
        let values = [1_000_000.0];
        let r = parametric_var(&inputs(&values, &cov, ConfidenceLevel::P95, 1)).unwrap();
        assert_relative_eq!(r.var, 16_448.536, epsilon = 0.01);
        assert_relative_eq!(r.standalone[0], r.var, epsilon = 1e-9);
        assert_eq!(r.diversification_benefit, 0.0);
    }

    #[test]
    fn test_ten_day_99_daily_applies_root_ten_once() {
        let cov = DMatrix::from_row_slice(1, 1, &[0.0001]);
        let values = [1_000_000.0];
        let r = parametric_var(&inputs(&values, &cov, ConfidenceLevel::P99, 10)).unwrap();
        assert_relative_eq!(r.z_score, 2.326, epsilon = 1e-3);
        // z × σ_daily × √10 × V
        let expected = r.z_score * 0.01 * 10f64.sqrt() * 1_000_000.0;
        assert_relative_eq!(r.var, expected, epsilon = 1e-6);
        // annualised vol = 1% × √252
        assert_relative_eq!(r.volatility, 0.01 * 252f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_weekly_annualisation() {
        let cov = DMatrix::from_row_slice(1, 1, &[0.0004]);
        let values = [100.0];
        let mut i = inputs(&values, &cov, ConfidenceLevel::P95, 1);
        i.frequency = DataFrequency::Weekly;
        let r = parametric_var(&i).unwrap();
        assert_relative_eq!(r.volatility, 0.02 * 52f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_contributions_sum_to_var() {
        let cov = DMatrix::from_row_slice(
            3,
            3,
            &[
                0.0004, 0.0001, -0.00005, //
                0.0001, 0.0009, 0.0002, //
                -0.00005, 0.0002, 0.0001,
            ],
        );
        let values = [500.0, 300.0, 200.0];
        let r = parametric_var(&inputs(&values, &cov, ConfidenceLevel::P99, 5)).unwrap();
        let sum: f64 = r.contributions.iter().sum();
        assert_relative_eq!(sum, r.var, max_relative = 1e-12);
        assert!(r.diversification_benefit > 0.0);
    }

    #[test]
    fn test_perfect_correlation_has_no_benefit() {
        let cov = DMatrix::from_row_slice(2, 2, &[0.0001, 0.0002, 0.0002, 0.0004]);
        let values = [50.0, 50.0];
        let r = parametric_var(&inputs(&values, &cov, ConfidenceLevel::P95, 1)).unwrap();
        assert!(r.diversification_benefit.abs() < 1e-9 * r.var);
    }

    #[test]
    fn test_zero_variance_portfolio_is_an_error() {
        let cov = DMatrix::from_row_slice(1, 1, &[0.0]);
        let values = [1_000.0];
        let err = parametric_var(&inputs(&values, &cov, ConfidenceLevel::P95, 1)).unwrap_err();
        assert!(matches!(err, RiskError::StatisticalComputationError { .. }));
    }

    #[test]
    fn test_indefinite_covariance_is_an_error() {
        let cov = DMatrix::from_row_slice(2, 2, &[0.0001, 0.0005, 0.0005, 0.0001]);
        let values = [1.0, 1.0];
        let err = parametric_var(&inputs(&values, &cov, ConfidenceLevel::P95, 1)).unwrap_err();
        match err {
            RiskError::StatisticalComputationError { condition } => {
                assert!(condition.contains("positive semidefinite"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_dimension_mismatch() {
        let cov = DMatrix::from_row_slice(1, 1, &[0.0001]);
        let values = [1.0, 2.0];
        assert!(parametric_var(&inputs(&values, &cov, ConfidenceLevel::P95, 1)).is_err());
    }
}
