//! Ordinal likelihood/impact scales.
//!
//! A scale of N points is described by N-1 strictly ascending thresholds.
//! A value scores `1 + (number of thresholds <= value)`: below the first
//! threshold scores 1, at or above the last scores N, and a value exactly on
//! a threshold falls in the higher bucket.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{RiskError, RiskResult};

/// Size of the organisation's risk matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "u8", into = "u8")]
pub enum MatrixSize {
    /// 5×5 matrix.
    #[default]
    Five,
    /// 6×6 matrix.
    Six,
}

impl MatrixSize {
    /// Number of points on each axis.
    pub fn points(&self) -> u8 {
        match self {
            Self::Five => 5,
            Self::Six => 6,
        }
    }

    /// Number of thresholds per scale.
    pub fn threshold_count(&self) -> usize {
        usize::from(self.points()) - 1
    }
}

impl TryFrom<u8> for MatrixSize {
    type Error = RiskError;

    fn try_from(points: u8) -> RiskResult<Self> {
        match points {
            5 => Ok(Self::Five),
            6 => Ok(Self::Six),
            other => Err(RiskError::invalid_configuration(
                "matrix_size",
                format!("{other} is not a supported matrix size; use 5 or 6"),
            )),
        }
    }
}

impl From<MatrixSize> for u8 {
    fn from(size: MatrixSize) -> u8 {
        size.points()
    }
}

impl fmt::Display for MatrixSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.points();
        write!(f, "{n}x{n}")
    }
}

/// Which figure drives the impact score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ImpactBasis {
    /// Total portfolio value.
    #[default]
    PortfolioValue,
    /// Portfolio VaR amount.
    VarAmount,
}

/// Threshold configuration mapping volatility and value onto ordinal scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleConfig {
    /// Risk matrix size.
    pub matrix_size: MatrixSize,
    /// Annualised volatility thresholds, in percent.
    pub volatility_thresholds: Vec<f64>,
    /// Currency thresholds for the impact score.
    pub value_thresholds: Vec<f64>,
    /// Figure compared against `value_thresholds`.
    #[serde(default)]
    pub impact_basis: ImpactBasis,
}

impl ScaleConfig {
    /// Creates a validated scale configuration.
    pub fn new(
        matrix_size: MatrixSize,
        volatility_thresholds: Vec<f64>,
        value_thresholds: Vec<f64>,
    ) -> RiskResult<Self> {
        let config = Self {
            matrix_size,
            volatility_thresholds,
            value_thresholds,
            impact_basis: ImpactBasis::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Sets the impact basis.
    #[must_use]
    pub fn with_impact_basis(mut self, basis: ImpactBasis) -> Self {
        self.impact_basis = basis;
        self
    }

    /// Default thresholds for a matrix size.
    pub fn standard(matrix_size: MatrixSize) -> Self {
        let (volatility_thresholds, value_thresholds) = match matrix_size {
            MatrixSize::Five => (
                vec![5.0, 10.0, 20.0, 30.0],
                vec![10_000.0, 100_000.0, 1_000_000.0, 10_000_000.0],
            ),
            MatrixSize::Six => (
                vec![5.0, 10.0, 15.0, 25.0, 40.0],
                vec![10_000.0, 100_000.0, 500_000.0, 1_000_000.0, 10_000_000.0],
            ),
        };
        Self {
            matrix_size,
            volatility_thresholds,
            value_thresholds,
            impact_basis: ImpactBasis::default(),
        }
    }

    /// Checks both threshold arrays.
    pub fn validate(&self) -> RiskResult<()> {
        check_thresholds(
            "volatility",
            &self.volatility_thresholds,
            self.matrix_size.threshold_count(),
        )?;
        check_thresholds(
            "value",
            &self.value_thresholds,
            self.matrix_size.threshold_count(),
        )
    }

    /// Likelihood score for an annualised volatility in percent.
    pub fn likelihood_score(&self, volatility_pct: f64) -> u8 {
        score_against(volatility_pct, &self.volatility_thresholds)
    }

    /// Impact score for a currency amount.
    pub fn impact_score(&self, value: f64) -> u8 {
        score_against(value, &self.value_thresholds)
    }
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self::standard(MatrixSize::default())
    }
}

/// Validates one threshold array: expected length, finite, strictly increasing.
pub fn check_thresholds(scale: &str, thresholds: &[f64], expected: usize) -> RiskResult<()> {
    if thresholds.len() != expected {
        return Err(RiskError::invalid_configuration(
            format!("{scale}_thresholds"),
            format!("expected {expected} thresholds, got {}", thresholds.len()),
        ));
    }
    if let Some(bad) = thresholds.iter().find(|t| !t.is_finite()) {
        return Err(RiskError::invalid_configuration(
            format!("{scale}_thresholds"),
            format!("threshold {bad} is not finite"),
        ));
    }
    for (i, pair) in thresholds.windows(2).enumerate() {
        if pair[1] <= pair[0] {
            return Err(RiskError::ThresholdOrderingViolation {
                scale: scale.to_string(),
                index: i + 1,
                previous: pair[0],
                next: pair[1],
            });
        }
    }
    Ok(())
}

/// Scores `value` against ascending thresholds. Ties go to the higher bucket.
pub fn score_against(value: f64, thresholds: &[f64]) -> u8 {
    let passed = thresholds.iter().take_while(|t| value >= **t).count();
    (passed + 1) as u8
}
