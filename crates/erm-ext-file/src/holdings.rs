//! Portfolio_Holdings sheet parsing.

use std::collections::HashSet;

use erm_core::types::{AssetType, Holding, Portfolio};
use erm_core::{RiskError, RiskResult};

use crate::workbook::Sheet;

/// Parses the holdings sheet into a portfolio.
///
/// Required headers: `asset`, `type`, `quantity`, `price`. Blank rows are
/// skipped; an unknown or blank `type` maps to [`AssetType::Other`].
pub fn parse_holdings(sheet: &Sheet) -> RiskResult<Portfolio> {
    let asset_col = sheet.require_column("asset")?;
    let type_col = sheet.require_column("type")?;
    let quantity_col = sheet.require_column("quantity")?;
    let price_col = sheet.require_column("price")?;

    let mut holdings = Vec::with_capacity(sheet.rows.len());
    let mut seen = HashSet::new();

    for row in 0..sheet.rows.len() {
        if sheet.is_blank_row(row) {
            continue;
        }

        let asset = sheet.cell(row, asset_col);
        if asset.is_empty() {
            return Err(sheet.error_at(row, "asset identifier is blank"));
        }
        if !seen.insert(asset.to_string()) {
            return Err(sheet.error_at(row, format!("duplicate asset '{asset}'")));
        }

        let asset_type = AssetType::parse(sheet.cell(row, type_col));
        let quantity = parse_amount(sheet, row, quantity_col, "quantity")?;
        let price = parse_amount(sheet, row, price_col, "price")?;

        let holding = Holding::new(asset, asset_type, quantity, price)
            .map_err(|e| sheet.error_at(row, e.to_string()))?;
        holdings.push(holding);
    }

    if holdings.is_empty() {
        return Err(RiskError::malformed(&sheet.name, 2, "no holdings found"));
    }

    Portfolio::new(holdings)
}

fn parse_amount(sheet: &Sheet, row: usize, col: usize, field: &str) -> RiskResult<f64> {
    let raw = sheet.cell(row, col);
    let value: f64 = parse_number(raw)
        .ok_or_else(|| sheet.error_at(row, format!("{field} '{raw}' is not a number")))?;
    if value < 0.0 {
        return Err(sheet.error_at(row, format!("{field} must not be negative, got {value}")));
    }
    Ok(value)
}

/// Parses a number, tolerating thousands separators.
pub(crate) fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}
