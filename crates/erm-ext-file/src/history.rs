//! Price_History sheet parsing.
//!
//! The sheet is read into a [`RawPriceHistory`] that still allows blank
//! cells. Completeness is only enforced for held assets inside the lookback
//! window, when the raw history is narrowed into a
//! [`PriceHistory`](erm_core::types::PriceHistory).

use std::collections::HashSet;

use chrono::NaiveDate;
use erm_core::types::{PriceHistory, PriceSeries};
use erm_core::{RiskError, RiskResult};
use tracing::debug;

use crate::holdings::parse_number;
use crate::workbook::Sheet;

/// Accepted date formats, tried in order.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parses a date in one of the accepted formats.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// One price column; `None` marks a blank cell.
#[derive(Debug, Clone, PartialEq)]
pub struct RawColumn {
    /// Asset identifier (the column header).
    pub asset: String,
    /// One entry per date.
    pub prices: Vec<Option<f64>>,
}

/// Price history as read from the sheet, sorted by date, gaps preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPriceHistory {
    /// Strictly ascending dates.
    pub dates: Vec<NaiveDate>,
    /// Columns in sheet order.
    pub columns: Vec<RawColumn>,
}

impl RawPriceHistory {
    /// Looks up a column.
    pub fn column(&self, asset: &str) -> Option<&RawColumn> {
        self.columns.iter().find(|c| c.asset == asset)
    }

    /// Narrows to the held assets over the lookback window.
    ///
    /// # Errors
    ///
    /// - [`RiskError::MissingPriceSeries`] for the first held asset without a column
    /// - [`RiskError::IncompleteData`] for the first run of blank cells inside
    ///   the window, checking held assets in column order
    pub fn into_history(self, assets: &[&str], lookback: Option<usize>) -> RiskResult<PriceHistory> {
        if let Some(missing) = assets.iter().find(|a| self.column(a).is_none()) {
            return Err(RiskError::missing_price_series(*missing));
        }

        let start = lookback.map_or(0, |n| self.dates.len().saturating_sub(n));
        let window = &self.dates[start..];

        for column in self
            .columns
            .iter()
            .filter(|c| assets.contains(&c.asset.as_str()))
        {
            if let Some(gap) = first_gap(&column.prices[start..]) {
                return Err(RiskError::IncompleteData {
                    asset: column.asset.clone(),
                    from: window[gap.0],
                    to: window[gap.1],
                    missing: gap.1 - gap.0 + 1,
                });
            }
        }

        let series = self
            .columns
            .into_iter()
            .filter(|c| assets.contains(&c.asset.as_str()))
            .map(|c| {
                let prices = c.prices[start..].iter().flatten().copied().collect();
                PriceSeries::new(c.asset, prices)
            })
            .collect();

        debug!(
            observations = window.len(),
            assets = assets.len(),
            "price history narrowed to lookback window"
        );
        PriceHistory::new(window.to_vec(), series)
    }
}

/// First and last index of the first run of blanks.
fn first_gap(prices: &[Option<f64>]) -> Option<(usize, usize)> {
    let from = prices.iter().position(Option::is_none)?;
    let len = prices[from..].iter().take_while(|p| p.is_none()).count();
    Some((from, from + len - 1))
}

/// Parses the price history sheet.
///
/// Requires a `date` header and at least one asset column. Rows may appear
/// in any order; they are sorted by date and duplicates are rejected.
pub fn parse_history(sheet: &Sheet) -> RiskResult<RawPriceHistory> {
    let date_col = sheet.require_column("date")?;

    let mut seen = HashSet::new();
    let mut asset_cols = Vec::new();
    for (col, header) in sheet.headers.iter().enumerate() {
        if col == date_col || header.is_empty() {
            continue;
        }
        if !seen.insert(header.as_str()) {
            return Err(RiskError::malformed(
                &sheet.name,
                1,
                format!("duplicate asset column '{header}'"),
            ));
        }
        asset_cols.push((col, header.clone()));
    }
    if asset_cols.is_empty() {
        return Err(RiskError::malformed(&sheet.name, 1, "no asset price columns"));
    }

    // (date, sheet row index, prices)
    let mut rows: Vec<(NaiveDate, usize, Vec<Option<f64>>)> = Vec::with_capacity(sheet.rows.len());
    for row in 0..sheet.rows.len() {
        if sheet.is_blank_row(row) {
            continue;
        }
        let raw_date = sheet.cell(row, date_col);
        let date = parse_date(raw_date).ok_or_else(|| {
            sheet.error_at(
                row,
                format!("date '{raw_date}' is not YYYY-MM-DD, YYYY/MM/DD or MM/DD/YYYY"),
            )
        })?;

        let prices = asset_cols
            .iter()
            .map(|(col, asset)| {
                let raw = sheet.cell(row, *col);
                if raw.is_empty() {
                    return Ok(None);
                }
                let price = parse_number(raw).ok_or_else(|| {
                    sheet.error_at(row, format!("price '{raw}' for '{asset}' is not a number"))
                })?;
                if price <= 0.0 {
                    return Err(sheet.error_at(
                        row,
                        format!("price for '{asset}' must be positive, got {price}"),
                    ));
                }
                Ok(Some(price))
            })
            .collect::<RiskResult<Vec<_>>>()?;

        rows.push((date, row, prices));
    }

    rows.sort_by_key(|(date, _, _)| *date);
    if let Some(pair) = rows.windows(2).find(|w| w[0].0 == w[1].0) {
        let (date, row) = (pair[1].0, pair[0].1.max(pair[1].1));
        return Err(sheet.error_at(row, format!("duplicate date {date}")));
    }

    let dates = rows.iter().map(|(d, _, _)| *d).collect();
    let columns = asset_cols
        .iter()
        .enumerate()
        .map(|(i, (_, asset))| RawColumn {
            asset: asset.clone(),
            prices: rows.iter().map(|(_, _, p)| p[i]).collect(),
        })
        .collect();

    Ok(RawPriceHistory { dates, columns })
}
