//! Historical price series on a shared date axis.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{RiskError, RiskResult};

/// Prices of one asset, aligned to the owning [`PriceHistory`] date axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    /// Asset identifier.
    pub asset: String,
    /// One price per date of the axis.
    pub prices: Vec<f64>,
}

impl PriceSeries {
    /// Creates a price series.
    pub fn new(asset: impl Into<String>, prices: Vec<f64>) -> Self {
        Self {
            asset: asset.into(),
            prices,
        }
    }
}

/// Complete price history: ascending dates and one series per asset.
///
/// Invariants: dates strictly increasing, every series as long as the date
/// axis, every price finite and positive, asset identifiers unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    dates: Vec<NaiveDate>,
    series: Vec<PriceSeries>,
}

impl PriceHistory {
    /// Creates a price history, validating alignment and prices.
    pub fn new(dates: Vec<NaiveDate>, series: Vec<PriceSeries>) -> RiskResult<Self> {
        if let Some(pair) = dates.windows(2).find(|w| w[1] <= w[0]) {
            return Err(RiskError::invalid_configuration(
                "date",
                format!("dates must be strictly increasing ({} then {})", pair[0], pair[1]),
            ));
        }

        let mut seen = HashSet::with_capacity(series.len());
        for s in &series {
            if !seen.insert(s.asset.as_str()) {
                return Err(RiskError::invalid_configuration(
                    s.asset.clone(),
                    "price series appears more than once",
                ));
            }
            if s.prices.len() != dates.len() {
                return Err(RiskError::invalid_configuration(
                    s.asset.clone(),
                    format!(
                        "series has {} prices for {} dates",
                        s.prices.len(),
                        dates.len()
                    ),
                ));
            }
            if let Some(pos) = s.prices.iter().position(|p| !p.is_finite() || *p <= 0.0) {
                return Err(RiskError::invalid_configuration(
                    s.asset.clone(),
                    format!("price on {} must be positive, got {}", dates[pos], s.prices[pos]),
                ));
            }
        }

        Ok(Self { dates, series })
    }

    /// The date axis.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// All series, in column order.
    pub fn series(&self) -> &[PriceSeries] {
        &self.series
    }

    /// Looks up the series of one asset.
    pub fn get(&self, asset: &str) -> Option<&PriceSeries> {
        self.series.iter().find(|s| s.asset == asset)
    }

    /// Asset identifiers, in column order.
    pub fn assets(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.asset.as_str()).collect()
    }

    /// Number of observations (dates).
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// True if there are no observations.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Keeps only the most recent `observations` dates.
    #[must_use]
    pub fn tail(&self, observations: usize) -> Self {
        let start = self.dates.len().saturating_sub(observations);
        Self {
            dates: self.dates[start..].to_vec(),
            series: self
                .series
                .iter()
                .map(|s| PriceSeries::new(s.asset.clone(), s.prices[start..].to_vec()))
                .collect(),
        }
    }

    /// Returns a history restricted to `assets`, in the given order.
    ///
    /// Fails with [`RiskError::MissingPriceSeries`] for the first asset
    /// without a column.
    pub fn select(&self, assets: &[&str]) -> RiskResult<Self> {
        let series = assets
            .iter()
            .map(|asset| {
                self.get(asset)
                    .cloned()
                    .ok_or_else(|| RiskError::missing_price_series(*asset))
            })
            .collect::<RiskResult<Vec<_>>>()?;
        Ok(Self {
            dates: self.dates.clone(),
            series,
        })
    }
}
