//! Configuration sheet parsing.

use std::collections::HashMap;

use erm_core::types::{AnalysisConfig, ConfidenceLevel, DataFrequency, ReturnMethod, TimeHorizon};
use erm_core::{RiskError, RiskResult};
use tracing::warn;

use crate::workbook::Sheet;

const KNOWN_KEYS: [&str; 6] = [
    "confidence_level",
    "time_horizon",
    "frequency",
    "lookback",
    "return_method",
    "portfolio_name",
];

/// Smallest lookback that still yields two returns for a covariance estimate.
const MIN_LOOKBACK: usize = 3;

/// Parses the `key`/`value` configuration sheet.
///
/// Keys are matched case-insensitively. `confidence_level` and
/// `time_horizon` are required; unknown keys are logged and ignored.
pub fn parse_configuration(sheet: &Sheet) -> RiskResult<AnalysisConfig> {
    let key_col = sheet.require_column("key")?;
    let value_col = sheet.require_column("value")?;

    let mut entries: HashMap<String, String> = HashMap::new();
    for row in 0..sheet.rows.len() {
        if sheet.is_blank_row(row) {
            continue;
        }
        let key = sheet.cell(row, key_col).to_lowercase();
        if key.is_empty() {
            return Err(sheet.error_at(row, "configuration key is blank"));
        }
        if !KNOWN_KEYS.contains(&key.as_str()) {
            warn!(key = %key, "ignoring unknown configuration key");
            continue;
        }
        let value = sheet.cell(row, value_col).to_string();
        if entries.insert(key.clone(), value).is_some() {
            return Err(sheet.error_at(row, format!("duplicate configuration key '{key}'")));
        }
    }

    let value = |key: &str| entries.get(key).map(String::as_str).filter(|v| !v.is_empty());
    let required = |key: &str| {
        value(key).ok_or_else(|| RiskError::invalid_configuration(key, "required value is missing"))
    };

    let confidence = ConfidenceLevel::parse(required("confidence_level")?)?;
    let horizon = TimeHorizon::parse(required("time_horizon")?)?;
    let mut config = AnalysisConfig::new(confidence, horizon);

    if let Some(raw) = value("frequency") {
        config = config.with_frequency(DataFrequency::parse(raw)?);
    }
    if let Some(raw) = value("lookback") {
        config = config.with_lookback(parse_lookback(raw)?);
    }
    if let Some(raw) = value("return_method") {
        config = config.with_return_method(ReturnMethod::parse(raw)?);
    }
    config.portfolio_name = value("portfolio_name").map(str::to_string);

    Ok(config)
}

fn parse_lookback(raw: &str) -> RiskResult<usize> {
    let invalid = || {
        RiskError::invalid_configuration(
            "lookback",
            format!("'{raw}' is not a whole number of observations of at least {MIN_LOOKBACK}"),
        )
    };
    let value: f64 = raw.trim().parse().map_err(|_| invalid())?;
    if !value.is_finite() || value.fract() != 0.0 || value < MIN_LOOKBACK as f64 {
        return Err(invalid());
    }
    Ok(value as usize)
}
