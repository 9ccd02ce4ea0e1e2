//! # ERM Ext File
//!
//! File-based workbook loader for the ERM risk analytics engine.
//!
//! A workbook carries three sheets:
//! - `Portfolio_Holdings`: asset, type, quantity, price
//! - `Price_History`: a date column plus one price column per asset
//! - `Configuration`: key/value analysis settings
//!
//! Sheets come either from a directory holding one `<sheet name>.csv` per
//! sheet, or from [`Sheet`]s built in memory by a caller that already parsed
//! a spreadsheet. Every defect is reported as a typed
//! [`RiskError`](erm_core::RiskError); nothing is coerced or partially loaded.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod configuration;
mod history;
mod holdings;
mod workbook;

pub use configuration::parse_configuration;
pub use history::{parse_date, parse_history, RawColumn, RawPriceHistory};
pub use holdings::parse_holdings;
pub use workbook::{Sheet, Workbook, CONFIG_SHEET, HISTORY_SHEET, HOLDINGS_SHEET, REQUIRED_SHEETS};

use std::path::Path;

use erm_core::types::{AnalysisConfig, Portfolio, PriceHistory};
use erm_core::RiskResult;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Everything an analysis run needs, loaded and validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioWorkbook {
    /// Holdings, in sheet order.
    pub holdings: Portfolio,
    /// Price history of the held assets over the lookback window.
    pub history: PriceHistory,
    /// Analysis settings.
    pub config: AnalysisConfig,
}

/// Loads a workbook from a directory of CSV sheets.
pub fn load_workbook_dir(dir: impl AsRef<Path>) -> RiskResult<PortfolioWorkbook> {
    let dir = dir.as_ref();
    let workbook = Workbook::from_dir(dir)?;
    let loaded = load_workbook(&workbook)?;
    info!(
        path = %dir.display(),
        assets = loaded.holdings.len(),
        observations = loaded.history.len(),
        "workbook loaded"
    );
    Ok(loaded)
}

/// Parses and validates an in-memory workbook.
///
/// Sheets are checked in order: configuration, holdings, then price history,
/// so a configuration error is reported before any data defect.
pub fn load_workbook(workbook: &Workbook) -> RiskResult<PortfolioWorkbook> {
    let config = parse_configuration(workbook.sheet(CONFIG_SHEET)?)?;
    let mut holdings = parse_holdings(workbook.sheet(HOLDINGS_SHEET)?)?;
    let raw = parse_history(workbook.sheet(HISTORY_SHEET)?)?;

    let history = raw.into_history(&holdings.assets(), config.lookback)?;

    if let Some(name) = &config.portfolio_name {
        holdings = holdings.with_name(name.clone());
    }
    Ok(PortfolioWorkbook {
        holdings,
        history,
        config,
    })
}
