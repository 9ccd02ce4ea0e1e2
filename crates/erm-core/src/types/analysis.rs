//! Analysis settings read from the Configuration sheet.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{RiskError, RiskResult};

/// Trading days used to annualise volatility and to scale the VaR horizon.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Supported VaR confidence levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ConfidenceLevel {
    /// 90%
    P90,
    /// 95%
    #[default]
    P95,
    /// 99%
    P99,
    /// 99.9%
    P999,
}

impl ConfidenceLevel {
    /// Returns the confidence as a probability (e.g. 0.95).
    pub fn probability(&self) -> f64 {
        match self {
            Self::P90 => 0.90,
            Self::P95 => 0.95,
            Self::P99 => 0.99,
            Self::P999 => 0.999,
        }
    }

    /// Returns the confidence as a percentage (e.g. 95.0).
    pub fn percent(&self) -> f64 {
        self.probability() * 100.0
    }

    /// All supported levels.
    pub fn all() -> &'static [Self] {
        &[Self::P90, Self::P95, Self::P99, Self::P999]
    }

    /// Parses `95`, `95%` or `0.95` style values.
    ///
    /// A fraction is only accepted without a `%` suffix, so `0.95%` is rejected.
    pub fn parse(s: &str) -> RiskResult<Self> {
        let has_percent = s.trim().ends_with('%');
        let trimmed = s.trim().trim_end_matches('%').trim();
        let value: f64 = trimmed.parse().map_err(|_| {
            RiskError::invalid_configuration("confidence_level", format!("'{s}' is not a number"))
        })?;
        let percent = if !has_percent && value <= 1.0 {
            value * 100.0
        } else {
            value
        };

        Self::all()
            .iter()
            .copied()
            .find(|level| (level.percent() - percent).abs() < 1e-6)
            .ok_or_else(|| {
                RiskError::invalid_configuration(
                    "confidence_level",
                    format!("{s} is not supported; use one of 90, 95, 99, 99.9"),
                )
            })
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::P90 => write!(f, "90%"),
            Self::P95 => write!(f, "95%"),
            Self::P99 => write!(f, "99%"),
            Self::P999 => write!(f, "99.9%"),
        }
    }
}

/// VaR time horizon in days. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct TimeHorizon(u32);

impl TimeHorizon {
    /// Creates a horizon of `days` days.
    pub fn new(days: u32) -> RiskResult<Self> {
        if days == 0 {
            return Err(RiskError::invalid_configuration(
                "time_horizon",
                "horizon must be at least one day",
            ));
        }
        Ok(Self(days))
    }

    /// Parses a positive whole number, tolerating spreadsheet renderings such as `10.0`.
    pub fn parse(s: &str) -> RiskResult<Self> {
        let value: f64 = s.trim().parse().map_err(|_| {
            RiskError::invalid_configuration("time_horizon", format!("'{s}' is not a number"))
        })?;
        if !value.is_finite() || value.fract() != 0.0 || value < 1.0 || value > f64::from(u32::MAX)
        {
            return Err(RiskError::invalid_configuration(
                "time_horizon",
                format!("'{s}' is not a positive whole number of days"),
            ));
        }
        Self::new(value as u32)
    }

    /// Number of days.
    pub fn days(&self) -> u32 {
        self.0
    }

    /// √(days / 252): scales an annualised volatility to the horizon.
    pub fn scaling_factor(&self) -> f64 {
        (f64::from(self.0) / TRADING_DAYS_PER_YEAR).sqrt()
    }
}

impl TryFrom<u32> for TimeHorizon {
    type Error = RiskError;

    fn try_from(days: u32) -> RiskResult<Self> {
        Self::new(days)
    }
}

impl From<TimeHorizon> for u32 {
    fn from(h: TimeHorizon) -> u32 {
        h.0
    }
}

impl Default for TimeHorizon {
    fn default() -> Self {
        Self(1)
    }
}

/// Sampling frequency of the price history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DataFrequency {
    /// Trading-day observations.
    #[default]
    Daily,
    /// Weekly observations.
    Weekly,
    /// Monthly observations.
    Monthly,
}

impl DataFrequency {
    /// Observations per year used for annualisation.
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Self::Daily => 252,
            Self::Weekly => 52,
            Self::Monthly => 12,
        }
    }

    /// √(periods per year).
    pub fn annualization_factor(&self) -> f64 {
        f64::from(self.periods_per_year()).sqrt()
    }

    /// Observations below which estimates carry reduced statistical confidence
    /// (one year of data).
    pub fn recommended_observations(&self) -> usize {
        self.periods_per_year() as usize
    }

    /// Parses `daily`, `weekly` or `monthly` (or their initials).
    pub fn parse(s: &str) -> RiskResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "d" | "day" => Ok(Self::Daily),
            "weekly" | "w" | "week" => Ok(Self::Weekly),
            "monthly" | "m" | "month" => Ok(Self::Monthly),
            _ => Err(RiskError::invalid_configuration(
                "frequency",
                format!("'{s}' is not one of daily, weekly, monthly"),
            )),
        }
    }
}

impl fmt::Display for DataFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        };
        f.write_str(name)
    }
}

/// How returns are derived from consecutive prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReturnMethod {
    /// `p[t] / p[t-1] - 1`
    #[default]
    Simple,
    /// `ln(p[t] / p[t-1])`
    Log,
}

impl ReturnMethod {
    /// Parses `simple` or `log`.
    pub fn parse(s: &str) -> RiskResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "simple" | "arithmetic" => Ok(Self::Simple),
            "log" | "logarithmic" => Ok(Self::Log),
            _ => Err(RiskError::invalid_configuration(
                "return_method",
                format!("'{s}' is not one of simple, log"),
            )),
        }
    }
}

/// Settings for one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AnalysisConfig {
    /// VaR confidence level.
    pub confidence: ConfidenceLevel,
    /// VaR horizon.
    pub horizon: TimeHorizon,
    /// Explicit data frequency; detected from the date axis when `None`.
    pub frequency: Option<DataFrequency>,
    /// Number of most recent observations to use; whole history when `None`.
    pub lookback: Option<usize>,
    /// Return derivation.
    pub return_method: ReturnMethod,
    /// Optional portfolio display name.
    pub portfolio_name: Option<String>,
}

impl AnalysisConfig {
    /// Creates a configuration with the required settings.
    pub fn new(confidence: ConfidenceLevel, horizon: TimeHorizon) -> Self {
        Self {
            confidence,
            horizon,
            ..Self::default()
        }
    }

    /// Sets an explicit data frequency.
    #[must_use]
    pub fn with_frequency(mut self, frequency: DataFrequency) -> Self {
        self.frequency = Some(frequency);
        self
    }

    /// Sets the lookback window.
    #[must_use]
    pub fn with_lookback(mut self, observations: usize) -> Self {
        self.lookback = Some(observations);
        self
    }

    /// Sets the return method.
    #[must_use]
    pub fn with_return_method(mut self, method: ReturnMethod) -> Self {
        self.return_method = method;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_confidence_parse_variants() {
        assert_eq!(ConfidenceLevel::parse("95").unwrap(), ConfidenceLevel::P95);
        assert_eq!(ConfidenceLevel::parse("99%").unwrap(), ConfidenceLevel::P99);
        assert_eq!(ConfidenceLevel::parse("0.90").unwrap(), ConfidenceLevel::P90);
        assert_eq!(ConfidenceLevel::parse("99.9").unwrap(), ConfidenceLevel::P999);
        assert_eq!(ConfidenceLevel::parse("0.999").unwrap(), ConfidenceLevel::P999);
    }

    #[test]
    fn test_confidence_rejects_unsupported() {
        let err = ConfidenceLevel::parse("97.5").unwrap_err();
        assert!(
            matches!(err, RiskError::InvalidConfiguration { ref key, .. } if key == "confidence_level")
        );
        assert!(ConfidenceLevel::parse("high").is_err());
    }

    #[test]
    fn test_confidence_fraction_with_percent_rejected() {
        for raw in ["0.9%", "0.95%"] {
            let err = ConfidenceLevel::parse(raw).unwrap_err();
            assert!(
                matches!(err, RiskError::InvalidConfiguration { ref key, .. } if key == "confidence_level"),
                "{raw} should be rejected"
            );
        }
        assert_eq!(ConfidenceLevel::parse("95%").unwrap(), ConfidenceLevel::P95);
        assert_eq!(ConfidenceLevel::parse("0.95").unwrap(), ConfidenceLevel::P95);
        assert_eq!(ConfidenceLevel::parse(" 99.9 % ").unwrap(), ConfidenceLevel::P999);
    }

    #[test]
    fn test_horizon_parse() {
        assert_eq!(TimeHorizon::parse("10").unwrap().days(), 10);
        assert_eq!(TimeHorizon::parse("10.0").unwrap().days(), 10);
        assert!(TimeHorizon::parse("0").is_err());
        assert!(TimeHorizon::parse("-5").is_err());
        assert!(TimeHorizon::parse("2.5").is_err());
        assert!(TimeHorizon::parse("ten").is_err());
    }

    #[test]
    fn test_horizon_scaling_matches_daily_root_t() {
        // Annual vol scaled to 10 days equals daily vol scaled by sqrt(10).
        let daily_vol = 0.01;
        let annual_vol = daily_vol * DataFrequency::Daily.annualization_factor();
        let h = TimeHorizon::new(10).unwrap();
        assert_relative_eq!(annual_vol * h.scaling_factor(), daily_vol * 10f64.sqrt(), epsilon = 1e-15);
    }

    #[test]
    fn test_frequency_periods() {
        assert_eq!(DataFrequency::Daily.periods_per_year(), 252);
        assert_eq!(DataFrequency::Weekly.periods_per_year(), 52);
        assert_eq!(DataFrequency::Monthly.periods_per_year(), 12);
        assert_eq!(DataFrequency::parse("Weekly").unwrap(), DataFrequency::Weekly);
        assert!(DataFrequency::parse("hourly").is_err());
    }

    #[test]
    fn test_horizon_serde_rejects_zero() {
        assert!(serde_json::from_str::<TimeHorizon>("0").is_err());
        let h: TimeHorizon = serde_json::from_str("5").unwrap();
        assert_eq!(h.days(), 5);
    }
}
