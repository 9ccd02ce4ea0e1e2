//! Integrated VaR calculator for a portfolio.
//!
//! `VaRCalculator` runs the whole pipeline for one analysis: it restricts
//! the price history to the held assets and the lookback window, derives
//! returns, covariance and correlation, computes parametric VaR with Euler
//! allocation, cross-checks with historical simulation and scores the result
//! on the organisation's risk matrix.
//!
//! # Example
//!
//! ```ignore
//! use erm_analytics::VaRCalculator;
//!
//! let calc = VaRCalculator::new(&scale)?;
//! let result = calc.calculate(&portfolio, &history, &config)?;
//!
//! println!("VaR: {:.2}", result.var);
//! println!("Likelihood {} / Impact {}", result.likelihood_score, result.impact_score);
//! ```

use erm_core::types::{AnalysisConfig, Portfolio, PriceHistory, ScaleConfig};
use erm_core::RiskResult;
use erm_math::statistics::{
    correlation_from_covariance, covariance_matrix, detect_frequency, return_matrix,
};
use tracing::{debug, warn};

use crate::scale::score;
use crate::var::{
    historical_var, parametric_var, portfolio_returns, AnalysisWarning, AssetVaR, ParametricInputs,
    VaRResult,
};

/// Calculator for portfolio VaR against a fixed scale configuration.
#[derive(Debug, Clone, Copy)]
pub struct VaRCalculator<'a> {
    scale: &'a ScaleConfig,
}

impl<'a> VaRCalculator<'a> {
    /// Creates a calculator. Fails if the scale thresholds are invalid.
    pub fn new(scale: &'a ScaleConfig) -> RiskResult<Self> {
        scale.validate()?;
        Ok(Self { scale })
    }

    /// Returns the scale configuration.
    pub fn scale(&self) -> &ScaleConfig {
        self.scale
    }

    /// Runs a full analysis.
    ///
    /// # Errors
    ///
    /// - [`erm_core::RiskError::MissingPriceSeries`] if a holding has no price column
    /// - [`erm_core::RiskError::StatisticalComputationError`] if the window is
    ///   too short, the covariance is degenerate or the portfolio is riskless
    pub fn calculate(
        &self,
        portfolio: &Portfolio,
        history: &PriceHistory,
        config: &AnalysisConfig,
    ) -> RiskResult<VaRResult> {
        let assets = portfolio.assets();
        let mut window = history.select(&assets)?;
        if let Some(lookback) = config.lookback {
            window = window.tail(lookback);
        }

        let frequency = match config.frequency {
            Some(f) => f,
            None => detect_frequency(window.dates())?,
        };

        let mut warnings = Vec::new();
        let observations = window.len();
        let recommended = frequency.recommended_observations();
        if observations < recommended {
            warn!(
                observations,
                recommended, "short price history; reduced statistical confidence"
            );
            warnings.push(AnalysisWarning::ReducedConfidence {
                observations,
                recommended,
            });
        }

        let returns = return_matrix(&window, config.return_method)?;
        let covariance = covariance_matrix(&returns)?;
        let correlation = correlation_from_covariance(&covariance)?;
        for &i in &correlation.zero_variance {
            warn!(asset = assets[i], "constant price series; correlation treated as 0");
            warnings.push(AnalysisWarning::ZeroVariance {
                asset: assets[i].to_string(),
            });
        }

        let market_values = portfolio.market_values();
        let parametric = parametric_var(&ParametricInputs {
            market_values: &market_values,
            covariance: &covariance,
            confidence: config.confidence,
            horizon: config.horizon,
            frequency,
        })?;

        let port_returns = portfolio_returns(&returns, &parametric.weights)?;
        let historical = historical_var(
            &port_returns,
            parametric.portfolio_value,
            config.confidence,
            config.horizon,
            frequency,
        )?;

        let volatility_pct = parametric.volatility * 100.0;
        let scores = score(
            self.scale,
            volatility_pct,
            parametric.portfolio_value,
            parametric.var,
        )?;

        let asset_rows = portfolio
            .holdings()
            .iter()
            .enumerate()
            .map(|(i, holding)| AssetVaR {
                asset: holding.asset.clone(),
                asset_type: holding.asset_type,
                market_value: market_values[i],
                weight: parametric.weights[i],
                volatility_pct: parametric.asset_volatility[i] * 100.0,
                standalone_var: parametric.standalone[i],
                contribution: parametric.contributions[i],
                contribution_pct: parametric.contributions[i] / parametric.var * 100.0,
            })
            .collect();

        debug!(
            assets = assets.len(),
            observations,
            %frequency,
            var = parametric.var,
            likelihood = scores.likelihood,
            impact = scores.impact,
            "portfolio VaR analysis complete"
        );

        Ok(VaRResult {
            portfolio_name: config
                .portfolio_name
                .clone()
                .or_else(|| portfolio.name.clone()),
            portfolio_value: parametric.portfolio_value,
            var: parametric.var,
            volatility_pct,
            confidence: config.confidence,
            z_score: parametric.z_score,
            horizon_days: config.horizon.days(),
            frequency,
            observations,
            assets: asset_rows,
            standalone_var_sum: parametric.standalone_sum(),
            diversification_benefit: parametric.diversification_benefit,
            historical_var: Some(historical),
            likelihood_score: scores.likelihood,
            impact_score: scores.impact,
            matrix_size: self.scale.matrix_size,
            correlation: correlation.to_rows(),
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Duration, NaiveDate};
    use erm_core::types::{
        AssetType, ConfidenceLevel, DataFrequency, Holding, MatrixSize, PriceSeries, TimeHorizon,
    };
    use erm_core::RiskError;

    fn dates(n: usize) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..n).map(|i| start + Duration::days(i as i64)).collect()
    }

    /// Prices following a deterministic zig-zag with the given amplitude.
    fn zigzag(n: usize, start: f64, amp: f64, phase: usize) -> Vec<f64> {
        let mut p = start;
        (0..n)
            .map(|i| {
                if i > 0 {
                    let up = (i + phase) % 3 != 0;
                    p *= if up { 1.0 + amp } else { 1.0 - 1.5 * amp };
                }
                p
            })
            .collect()
    }

    fn two_asset_case(n: usize) -> (Portfolio, PriceHistory) {
        let portfolio = Portfolio::new(vec![
            Holding::new("EQ", AssetType::Equity, 1_000.0, 50.0).unwrap(),
            Holding::new("BD", AssetType::Bond, 500.0, 100.0).unwrap(),
        ])
        .unwrap();
        let history = PriceHistory::new(
            dates(n),
            vec![
                PriceSeries::new("EQ", zigzag(n, 50.0, 0.01, 0)),
                PriceSeries::new("BD", zigzag(n, 100.0, 0.004, 1)),
            ],
        )
        .unwrap();
        (portfolio, history)
    }

    fn config() -> AnalysisConfig {
        AnalysisConfig::new(ConfidenceLevel::P95, TimeHorizon::new(1).unwrap())
    }

    #[test]
    fn test_full_run_properties() {
        let (portfolio, history) = two_asset_case(300);
        let scale = ScaleConfig::standard(MatrixSize::Five);
        let result = VaRCalculator::new(&scale)
            .unwrap()
            .calculate(&portfolio, &history, &config())
            .unwrap();

        assert_relative_eq!(result.portfolio_value, 100_000.0);
        assert_eq!(result.frequency, DataFrequency::Daily);
        assert_eq!(result.observations, 300);
        assert!(result.warnings.is_empty());
        assert_relative_eq!(result.contribution_sum(), result.var, max_relative = 1e-10);
        assert!(result.diversification_benefit >= 0.0);
        assert!(result.historical_var.is_some());
        assert_eq!(result.correlation[0][0], 1.0);
        assert!((1..=5).contains(&result.likelihood_score));
        assert_eq!(result.impact_score, 3);
    }

    #[test]
    fn test_short_history_warns() {
        let (portfolio, history) = two_asset_case(30);
        let scale = ScaleConfig::default();
        let result = VaRCalculator::new(&scale)
            .unwrap()
            .calculate(&portfolio, &history, &config())
            .unwrap();
        assert_eq!(
            result.warnings,
            vec![AnalysisWarning::ReducedConfidence {
                observations: 30,
                recommended: 252
            }]
        );
    }

    #[test]
    fn test_lookback_limits_window() {
        let (portfolio, history) = two_asset_case(400);
        let scale = ScaleConfig::default();
        let result = VaRCalculator::new(&scale)
            .unwrap()
            .calculate(&portfolio, &history, &config().with_lookback(260))
            .unwrap();
        assert_eq!(result.observations, 260);
    }

    #[test]
    fn test_constant_asset_flagged_not_fatal() {
        let n = 260;
        let portfolio = Portfolio::new(vec![
            Holding::new("EQ", AssetType::Equity, 10.0, 50.0).unwrap(),
            Holding::new("CASH", AssetType::Cash, 500.0, 1.0).unwrap(),
        ])
        .unwrap();
        let history = PriceHistory::new(
            dates(n),
            vec![
                PriceSeries::new("EQ", zigzag(n, 50.0, 0.01, 0)),
                PriceSeries::new("CASH", vec![1.0; n]),
            ],
        )
        .unwrap();
        let scale = ScaleConfig::default();
        let result = VaRCalculator::new(&scale)
            .unwrap()
            .calculate(&portfolio, &history, &config())
            .unwrap();

        assert!(result.warnings.contains(&AnalysisWarning::ZeroVariance {
            asset: "CASH".to_string()
        }));
        assert_eq!(result.correlation[0][1], 0.0);
        assert_eq!(result.assets[1].standalone_var, 0.0);
        assert_relative_eq!(result.assets[1].contribution, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_missing_price_series() {
        let (_, history) = two_asset_case(30);
        let portfolio =
            Portfolio::new(vec![Holding::new("FX", AssetType::Other, 1.0, 1.0).unwrap()]).unwrap();
        let scale = ScaleConfig::default();
        let err = VaRCalculator::new(&scale)
            .unwrap()
            .calculate(&portfolio, &history, &config())
            .unwrap_err();
        assert_eq!(err, RiskError::missing_price_series("FX"));
    }

    #[test]
    fn test_all_cash_portfolio_is_not_zero_var() {
        let n = 30;
        let portfolio =
            Portfolio::new(vec![Holding::new("CASH", AssetType::Cash, 1.0, 1.0).unwrap()]).unwrap();
        let history =
            PriceHistory::new(dates(n), vec![PriceSeries::new("CASH", vec![1.0; n])]).unwrap();
        let scale = ScaleConfig::default();
        let err = VaRCalculator::new(&scale)
            .unwrap()
            .calculate(&portfolio, &history, &config())
            .unwrap_err();
        assert!(matches!(err, RiskError::StatisticalComputationError { .. }));
    }

    #[test]
    fn test_invalid_scale_rejected_up_front() {
        let mut scale = ScaleConfig::default();
        scale.volatility_thresholds = vec![1.0, 2.0];
        assert!(VaRCalculator::new(&scale).is_err());
    }
}
