//! Error types for the risk analytics engine.
//!
//! Every failure is detected synchronously while loading a workbook or
//! computing a result, and carries enough context (sheet, row, asset, date
//! range) for the user to correct the input and re-run.

use chrono::NaiveDate;
use thiserror::Error;

/// A specialized Result type for risk analytics operations.
pub type RiskResult<T> = Result<T, RiskError>;

/// The error taxonomy of the VaR engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RiskError {
    /// A held asset has no matching column in the price history.
    #[error("Missing price series for asset '{asset}' in Price_History")]
    MissingPriceSeries {
        /// The held asset without a price column.
        asset: String,
    },

    /// The price history has gaps inside the lookback window.
    #[error(
        "Incomplete data for asset '{asset}': {missing} missing observation(s) from {from} to {to}"
    )]
    IncompleteData {
        /// Asset whose column has missing values.
        asset: String,
        /// First date of the missing run.
        from: NaiveDate,
        /// Last date of the missing run.
        to: NaiveDate,
        /// Number of consecutive missing observations.
        missing: usize,
    },

    /// A configuration value is unsupported or out of range.
    #[error("Invalid configuration '{key}': {reason}")]
    InvalidConfiguration {
        /// The configuration key at fault.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A statistical or matrix computation could not be carried out.
    #[error("Statistical computation failed: {condition}")]
    StatisticalComputationError {
        /// The offending condition.
        condition: String,
    },

    /// Scale thresholds are not strictly ascending.
    #[error(
        "{scale} thresholds must be strictly increasing: threshold {index} ({next}) does not exceed {previous}"
    )]
    ThresholdOrderingViolation {
        /// Which threshold array is at fault.
        scale: String,
        /// Index of the first threshold breaking the order.
        index: usize,
        /// The threshold before it.
        previous: f64,
        /// The offending threshold.
        next: f64,
    },

    /// A holding carries an impossible quantity or price.
    #[error("Invalid holding '{asset}': {reason}")]
    InvalidHolding {
        /// The asset identifier.
        asset: String,
        /// Why the holding was rejected.
        reason: String,
    },

    /// A workbook sheet is missing, lacks a header, or holds an unparseable cell.
    #[error("Malformed sheet '{sheet}' at row {row}: {reason}")]
    MalformedSheet {
        /// Sheet name.
        sheet: String,
        /// 1-based spreadsheet row (the header is row 1).
        row: usize,
        /// What is wrong with the row.
        reason: String,
    },

    /// The workbook could not be read.
    #[error("I/O error reading '{path}': {message}")]
    Io {
        /// Path that failed.
        path: String,
        /// Underlying error message.
        message: String,
    },
}

impl RiskError {
    /// Creates a missing price series error.
    #[must_use]
    pub fn missing_price_series(asset: impl Into<String>) -> Self {
        Self::MissingPriceSeries {
            asset: asset.into(),
        }
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_configuration(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Creates a statistical computation error.
    #[must_use]
    pub fn statistical(condition: impl Into<String>) -> Self {
        Self::StatisticalComputationError {
            condition: condition.into(),
        }
    }

    /// Creates an invalid holding error.
    #[must_use]
    pub fn invalid_holding(asset: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidHolding {
            asset: asset.into(),
            reason: reason.into(),
        }
    }

    /// Creates a malformed sheet error.
    #[must_use]
    pub fn malformed(sheet: impl Into<String>, row: usize, reason: impl Into<String>) -> Self {
        Self::MalformedSheet {
            sheet: sheet.into(),
            row,
            reason: reason.into(),
        }
    }

    /// Returns true if the error stems from the uploaded workbook rather than
    /// the computation.
    pub fn is_input_defect(&self) -> bool {
        matches!(
            self,
            Self::MissingPriceSeries { .. }
                | Self::IncompleteData { .. }
                | Self::InvalidConfiguration { .. }
                | Self::InvalidHolding { .. }
                | Self::MalformedSheet { .. }
                | Self::Io { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_data_display_names_range() {
        let err = RiskError::IncompleteData {
            asset: "BOND_A".to_string(),
            from: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            to: NaiveDate::from_ymd_opt(2024, 3, 8).unwrap(),
            missing: 5,
        };
        let msg = err.to_string();
        assert!(msg.contains("BOND_A"));
        assert!(msg.contains("2024-03-04"));
        assert!(msg.contains("2024-03-08"));
        assert!(msg.contains("5 missing"));
    }

    #[test]
    fn test_malformed_sheet_display() {
        let err = RiskError::malformed("Portfolio_Holdings", 4, "quantity is not a number");
        assert_eq!(
            err.to_string(),
            "Malformed sheet 'Portfolio_Holdings' at row 4: quantity is not a number"
        );
        assert!(err.is_input_defect());
    }

    #[test]
    fn test_statistical_error_is_not_input_defect() {
        assert!(!RiskError::statistical("covariance matrix is not positive semidefinite")
            .is_input_defect());
    }
}
