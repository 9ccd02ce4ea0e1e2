//! Value at Risk (VaR) calculations.
//!
//! VaR estimates the loss not expected to be exceeded over a time horizon
//! at a given confidence level.

mod historical;
mod parametric;

pub use historical::*;
pub use parametric::*;

use erm_core::types::{AssetType, ConfidenceLevel, DataFrequency, MatrixSize};
use serde::{Deserialize, Serialize};

/// Per-asset breakdown of a VaR run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetVaR {
    /// Asset identifier.
    pub asset: String,
    /// Asset class.
    pub asset_type: AssetType,
    /// Market value.
    pub market_value: f64,
    /// Share of portfolio value.
    pub weight: f64,
    /// Annualised volatility, in percent.
    pub volatility_pct: f64,
    /// VaR of the position on its own, ignoring correlation.
    pub standalone_var: f64,
    /// Euler allocation of portfolio VaR to this asset.
    pub contribution: f64,
    /// `contribution` as a percentage of portfolio VaR.
    pub contribution_pct: f64,
}

/// Conditions that lower the reliability of a result without invalidating it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisWarning {
    /// Fewer observations than one year of data at the detected frequency.
    ReducedConfidence {
        /// Prices in the lookback window.
        observations: usize,
        /// Recommended minimum.
        recommended: usize,
    },
    /// An asset's price never moved; its correlations are reported as 0.
    ZeroVariance {
        /// The asset.
        asset: String,
    },
}

impl std::fmt::Display for AnalysisWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReducedConfidence {
                observations,
                recommended,
            } => write!(
                f,
                "only {observations} observations (recommended at least {recommended}); estimates carry reduced statistical confidence"
            ),
            Self::ZeroVariance { asset } => write!(
                f,
                "asset '{asset}' has constant prices; its correlation with other assets is treated as 0"
            ),
        }
    }
}

/// Result of one portfolio VaR analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaRResult {
    /// Portfolio display name.
    pub portfolio_name: Option<String>,
    /// Sum of market values.
    pub portfolio_value: f64,
    /// Parametric portfolio VaR, in currency units.
    pub var: f64,
    /// Annualised portfolio volatility, in percent.
    pub volatility_pct: f64,
    /// Confidence level.
    pub confidence: ConfidenceLevel,
    /// Standard-normal quantile used.
    pub z_score: f64,
    /// Horizon in days.
    pub horizon_days: u32,
    /// Sampling frequency of the price history.
    pub frequency: DataFrequency,
    /// Prices in the lookback window.
    pub observations: usize,
    /// Per-asset breakdown, in holdings order.
    pub assets: Vec<AssetVaR>,
    /// Sum of standalone VaRs.
    pub standalone_var_sum: f64,
    /// Standalone sum minus portfolio VaR.
    pub diversification_benefit: f64,
    /// Historical-simulation VaR over the same window, as a cross-check.
    pub historical_var: Option<f64>,
    /// Likelihood score (1..=N) from annualised volatility.
    pub likelihood_score: u8,
    /// Impact score (1..=N).
    pub impact_score: u8,
    /// Matrix size the scores refer to.
    pub matrix_size: MatrixSize,
    /// Correlation matrix rows, in holdings order.
    pub correlation: Vec<Vec<f64>>,
    /// Reliability warnings.
    pub warnings: Vec<AnalysisWarning>,
}

impl VaRResult {
    /// Sum of per-asset contributions. Equals `var` up to rounding.
    pub fn contribution_sum(&self) -> f64 {
        self.assets.iter().map(|a| a.contribution).sum()
    }
}

impl std::fmt::Display for VaRResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "VaR({}, {}d): {:.2} on {:.2} (vol {:.2}%, L{} I{})",
            self.confidence,
            self.horizon_days,
            self.var,
            self.portfolio_value,
            self.volatility_pct,
            self.likelihood_score,
            self.impact_score
        )
    }
}
