//! Integration tests for loading CSV workbooks from disk.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use approx::assert_relative_eq;
use chrono::{Duration, NaiveDate};
use erm_core::types::{AssetType, ConfidenceLevel};
use erm_core::RiskError;
use erm_ext_file::{load_workbook_dir, HISTORY_SHEET, HOLDINGS_SHEET};
use tempfile::TempDir;

const HOLDINGS: &str = "asset,type,quantity,price\n\
                        ACME,equity,1000,50\n\
                        UST10,Bond,200,98.5\n\
                        CASH,cash,10000,1\n";

const CONFIG: &str = "key,value\n\
                      confidence_level,95%\n\
                      time_horizon,10\n\
                      portfolio_name,Main fund\n";

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// Price_History CSV over `days` consecutive dates; `blank` lists
/// (column index, day index) cells to leave empty.
fn history_csv(days: usize, blank: &[(usize, usize)]) -> String {
    let mut out = String::from("date,ACME,UST10,CASH,UNHELD\n");
    for t in 0..days {
        let date = start() + Duration::days(t as i64);
        let cells = [
            50.0 * (1.0 + 0.01 * ((t % 5) as f64 - 2.0)),
            98.0 + (t % 3) as f64 * 0.25,
            1.0,
            7.0,
        ];
        write!(out, "{}", date.format("%Y-%m-%d")).unwrap();
        for (c, value) in cells.iter().enumerate() {
            if blank.contains(&(c, t)) {
                out.push(',');
            } else {
                write!(out, ",{value}").unwrap();
            }
        }
        out.push('\n');
    }
    out
}

fn write_workbook(dir: &Path, holdings: &str, history: &str, config: &str) {
    fs::write(dir.join("Portfolio_Holdings.csv"), holdings).unwrap();
    fs::write(dir.join("Price_History.csv"), history).unwrap();
    fs::write(dir.join("Configuration.csv"), config).unwrap();
}

#[test]
fn loads_complete_workbook() {
    let dir = TempDir::new().unwrap();
    write_workbook(dir.path(), HOLDINGS, &history_csv(30, &[(3, 0)]), CONFIG);

    let wb = load_workbook_dir(dir.path()).unwrap();

    assert_eq!(wb.holdings.assets(), vec!["ACME", "UST10", "CASH"]);
    assert_eq!(wb.holdings.holdings()[1].asset_type, AssetType::Bond);
    assert_relative_eq!(wb.holdings.total_value(), 50_000.0 + 19_700.0 + 10_000.0);
    assert_eq!(wb.holdings.name.as_deref(), Some("Main fund"));
    assert_eq!(wb.config.confidence, ConfidenceLevel::P95);
    assert_eq!(wb.config.horizon.days(), 10);
    assert_eq!(wb.history.len(), 30);
    assert_eq!(wb.history.assets(), vec!["ACME", "UST10", "CASH"]);
}

#[test]
fn five_missing_days_reported_as_incomplete_data() {
    let dir = TempDir::new().unwrap();
    let blank: Vec<(usize, usize)> = (10..15).map(|t| (1, t)).collect();
    write_workbook(dir.path(), HOLDINGS, &history_csv(40, &blank), CONFIG);

    let err = load_workbook_dir(dir.path()).unwrap_err();
    assert_eq!(
        err,
        RiskError::IncompleteData {
            asset: "UST10".to_string(),
            from: start() + Duration::days(10),
            to: start() + Duration::days(14),
            missing: 5,
        }
    );
    let message = err.to_string();
    assert!(message.contains("UST10"));
    assert!(message.contains("2024-01-11"));
    assert!(message.contains("2024-01-15"));
}

#[test]
fn gap_before_lookback_window_is_accepted() {
    let dir = TempDir::new().unwrap();
    let blank: Vec<(usize, usize)> = (0..5).map(|t| (0, t)).collect();
    let config = format!("{CONFIG}lookback,20\n");
    write_workbook(dir.path(), HOLDINGS, &history_csv(40, &blank), &config);

    let wb = load_workbook_dir(dir.path()).unwrap();
    assert_eq!(wb.history.len(), 20);
    assert_eq!(wb.history.dates()[0], start() + Duration::days(20));
}

#[test]
fn holding_without_price_column() {
    let dir = TempDir::new().unwrap();
    let holdings = format!("{HOLDINGS}GOLD,commodity,3,1900\n");
    write_workbook(dir.path(), &holdings, &history_csv(10, &[]), CONFIG);

    let err = load_workbook_dir(dir.path()).unwrap_err();
    assert_eq!(err, RiskError::missing_price_series("GOLD"));
}

#[test]
fn missing_sheet_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("Portfolio_Holdings.csv"), HOLDINGS).unwrap();
    fs::write(dir.path().join("Configuration.csv"), CONFIG).unwrap();

    let err = load_workbook_dir(dir.path()).unwrap_err();
    match err {
        RiskError::MalformedSheet { sheet, .. } => assert_eq!(sheet, HISTORY_SHEET),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn malformed_holdings_row_number() {
    let dir = TempDir::new().unwrap();
    let holdings = "asset,type,quantity,price\nACME,equity,1000,50\nUST10,bond,-5,98\n";
    write_workbook(dir.path(), holdings, &history_csv(10, &[]), CONFIG);

    let err = load_workbook_dir(dir.path()).unwrap_err();
    match err {
        RiskError::MalformedSheet { sheet, row, .. } => {
            assert_eq!(sheet, HOLDINGS_SHEET);
            assert_eq!(row, 3);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn invalid_confidence_level() {
    let dir = TempDir::new().unwrap();
    let config = "key,value\nconfidence_level,80\ntime_horizon,1\n";
    write_workbook(dir.path(), HOLDINGS, &history_csv(10, &[]), config);

    assert!(matches!(
        load_workbook_dir(dir.path()),
        Err(RiskError::InvalidConfiguration { .. })
    ));
}

#[test]
fn not_a_directory() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("workbook.xlsx");
    fs::write(&file, b"PK").unwrap();
    assert!(matches!(load_workbook_dir(&file), Err(RiskError::Io { .. })));
}
