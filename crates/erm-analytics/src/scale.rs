//! Mapping of VaR figures onto the organisation's risk matrix.

use erm_core::types::{ImpactBasis, ScaleConfig};
use erm_core::RiskResult;
use serde::{Deserialize, Serialize};

/// Likelihood and impact scores on a 1..=N scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskScores {
    /// Likelihood, driven by annualised volatility.
    pub likelihood: u8,
    /// Impact, driven by portfolio value or VaR amount.
    pub impact: u8,
}

impl RiskScores {
    /// Likelihood × impact, the heatmap cell rating.
    pub fn rating(&self) -> u16 {
        u16::from(self.likelihood) * u16::from(self.impact)
    }
}

/// Scores a VaR run against a scale configuration.
///
/// The configuration is validated first, so a badly ordered threshold array
/// surfaces as [`erm_core::RiskError::ThresholdOrderingViolation`] rather than
/// producing a meaningless score.
pub fn score(
    scale: &ScaleConfig,
    volatility_pct: f64,
    portfolio_value: f64,
    var: f64,
) -> RiskResult<RiskScores> {
    scale.validate()?;
    let impact_value = match scale.impact_basis {
        ImpactBasis::PortfolioValue => portfolio_value,
        ImpactBasis::VarAmount => var,
    };
    Ok(RiskScores {
        likelihood: scale.likelihood_score(volatility_pct),
        impact: scale.impact_score(impact_value),
    })
}
