//! Portfolio holdings.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{RiskError, RiskResult};

/// Broad asset class of a holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    /// Listed or private equity.
    Equity,
    /// Fixed income.
    Bond,
    /// Cash and cash equivalents.
    Cash,
    /// Anything else (commodities, funds, derivatives...).
    #[default]
    Other,
}

impl AssetType {
    /// Parses an asset type label. Unknown labels map to [`AssetType::Other`].
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "equity" | "equities" | "stock" | "share" => Self::Equity,
            "bond" | "bonds" | "fixed income" => Self::Bond,
            "cash" => Self::Cash,
            _ => Self::Other,
        }
    }

    /// Returns the canonical label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equity => "equity",
            Self::Bond => "bond",
            Self::Cash => "cash",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single position: quantity of an asset at a unit price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Asset identifier, matching a Price_History column.
    pub asset: String,
    /// Asset class.
    pub asset_type: AssetType,
    /// Units held.
    pub quantity: f64,
    /// Current price per unit.
    pub unit_price: f64,
}

impl Holding {
    /// Creates a holding, rejecting negative or non-finite quantities and prices.
    pub fn new(
        asset: impl Into<String>,
        asset_type: AssetType,
        quantity: f64,
        unit_price: f64,
    ) -> RiskResult<Self> {
        let asset = asset.into();
        if asset.trim().is_empty() {
            return Err(RiskError::invalid_holding(asset, "asset identifier is empty"));
        }
        if !quantity.is_finite() || quantity < 0.0 {
            return Err(RiskError::invalid_holding(
                asset,
                format!("quantity must be a non-negative number, got {quantity}"),
            ));
        }
        if !unit_price.is_finite() || unit_price < 0.0 {
            return Err(RiskError::invalid_holding(
                asset,
                format!("unit price must be a non-negative number, got {unit_price}"),
            ));
        }
        Ok(Self {
            asset,
            asset_type,
            quantity,
            unit_price,
        })
    }

    /// Market value = quantity × unit price.
    pub fn market_value(&self) -> f64 {
        self.quantity * self.unit_price
    }
}

/// A set of holdings with unique asset identifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    /// Optional display name.
    pub name: Option<String>,
    holdings: Vec<Holding>,
}

impl Portfolio {
    /// Creates a portfolio. Holdings must be non-empty and uniquely named.
    pub fn new(holdings: Vec<Holding>) -> RiskResult<Self> {
        if holdings.is_empty() {
            return Err(RiskError::invalid_configuration(
                "holdings",
                "portfolio has no holdings",
            ));
        }
        let mut seen = HashSet::with_capacity(holdings.len());
        for holding in &holdings {
            if !seen.insert(holding.asset.as_str()) {
                return Err(RiskError::invalid_holding(
                    holding.asset.clone(),
                    "asset appears more than once",
                ));
            }
        }
        Ok(Self {
            name: None,
            holdings,
        })
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns the holdings in sheet order.
    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    /// Returns the asset identifiers in sheet order.
    pub fn assets(&self) -> Vec<&str> {
        self.holdings.iter().map(|h| h.asset.as_str()).collect()
    }

    /// Number of holdings.
    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    /// Always false: construction rejects empty portfolios.
    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    /// Market value of each holding, in sheet order.
    pub fn market_values(&self) -> Vec<f64> {
        self.holdings.iter().map(Holding::market_value).collect()
    }

    /// Portfolio value: sum of market values.
    pub fn total_value(&self) -> f64 {
        self.holdings.iter().map(Holding::market_value).sum()
    }

    /// Weights (market value ÷ portfolio value), in sheet order.
    ///
    /// Fails when the portfolio is worth nothing, since weights are undefined.
    pub fn weights(&self) -> RiskResult<Vec<f64>> {
        let total = self.total_value();
        if total <= 0.0 || !total.is_finite() {
            return Err(RiskError::statistical(format!(
                "portfolio value must be positive to derive weights, got {total}"
            )));
        }
        Ok(self
            .holdings
            .iter()
            .map(|h| h.market_value() / total)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn holding(asset: &str, qty: f64, price: f64) -> Holding {
        Holding::new(asset, AssetType::Equity, qty, price).unwrap()
    }

    #[test]
    fn test_asset_type_parse() {
        assert_eq!(AssetType::parse("Equity"), AssetType::Equity);
        assert_eq!(AssetType::parse(" BOND "), AssetType::Bond);
        assert_eq!(AssetType::parse("cash"), AssetType::Cash);
        assert_eq!(AssetType::parse("gold"), AssetType::Other);
    }

    #[test]
    fn test_holding_rejects_negative_quantity() {
        let err = Holding::new("X", AssetType::Equity, -1.0, 10.0).unwrap_err();
        assert!(matches!(err, RiskError::InvalidHolding { .. }));
    }

    #[test]
    fn test_holding_rejects_nan_price() {
        assert!(Holding::new("X", AssetType::Bond, 1.0, f64::NAN).is_err());
    }

    #[test]
    fn test_portfolio_value_is_sum_of_market_values() {
        let p = Portfolio::new(vec![holding("A", 10.0, 5.0), holding("B", 2.0, 25.0)]).unwrap();
        assert_relative_eq!(p.total_value(), 100.0);
        let weights = p.weights().unwrap();
        assert_relative_eq!(weights[0], 0.5);
        assert_relative_eq!(weights[1], 0.5);
    }

    #[test]
    fn test_portfolio_rejects_duplicates() {
        let err = Portfolio::new(vec![holding("A", 1.0, 1.0), holding("A", 2.0, 1.0)]).unwrap_err();
        assert!(matches!(err, RiskError::InvalidHolding { ref asset, .. } if asset == "A"));
    }

    #[test]
    fn test_portfolio_rejects_empty() {
        assert!(Portfolio::new(vec![]).is_err());
    }

    #[test]
    fn test_zero_value_portfolio_has_no_weights() {
        let p = Portfolio::new(vec![holding("A", 0.0, 5.0)]).unwrap();
        assert!(matches!(
            p.weights(),
            Err(RiskError::StatisticalComputationError { .. })
        ));
    }
}
