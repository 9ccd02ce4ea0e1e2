//! End-to-end tests of the `erm` binary.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn erm() -> Command {
    let mut cmd = Command::cargo_bin("erm").unwrap();
    cmd.env_remove("ERM_SCALE_DIR")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

/// Writes a three-asset workbook with 30 consecutive daily prices.
fn write_workbook(dir: &Path) {
    fs::write(
        dir.join("Portfolio_Holdings.csv"),
        "asset,type,quantity,price\n\
         ACME,equity,1000,50\n\
         UST10,bond,200,98.5\n\
         GOLD,commodity,10,2000\n",
    )
    .unwrap();
    fs::write(
        dir.join("Configuration.csv"),
        "key,value\n\
         confidence_level,99%\n\
         time_horizon,10\n\
         portfolio_name,Main fund\n",
    )
    .unwrap();

    let mut history = String::from("date,ACME,UST10,GOLD\n");
    for day in 1..=30 {
        let t = day as f64;
        writeln!(
            history,
            "2024-01-{day:02},{:.4},{:.4},{:.4}",
            50.0 * (1.0 + 0.02 * ((day % 5) as f64 - 2.0)),
            98.0 + 0.3 * ((day % 3) as f64),
            2000.0 + 15.0 * (t * 0.7).sin(),
        )
        .unwrap();
    }
    fs::write(dir.join("Price_History.csv"), history).unwrap();
}

#[test]
fn analyze_prints_tables() {
    let dir = TempDir::new().unwrap();
    write_workbook(dir.path());

    erm()
        .arg("analyze")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Portfolio VaR: Main fund"))
        .stdout(predicate::str::contains("Value at Risk"))
        .stdout(predicate::str::contains("Diversification Benefit"))
        .stdout(predicate::str::contains("UST10"))
        .stderr(predicate::str::contains("only 30 observations"));
}

#[test]
fn analyze_json_output() {
    let dir = TempDir::new().unwrap();
    write_workbook(dir.path());

    let output = erm()
        .args(["--format", "json", "analyze"])
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["portfolio_name"], "Main fund");
    assert_eq!(result["horizon_days"], 10);
    assert_eq!(result["matrix_size"], 5);
    assert_eq!(result["assets"].as_array().unwrap().len(), 3);
    assert!(result["var"].as_f64().unwrap() > 0.0);

    let var = result["var"].as_f64().unwrap();
    let contributions: f64 = result["assets"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["contribution"].as_f64().unwrap())
        .sum();
    assert!((contributions - var).abs() < 1e-6 * var);
}

#[test]
fn analyze_uses_stored_scale() {
    let workbook = TempDir::new().unwrap();
    let scales = TempDir::new().unwrap();
    write_workbook(workbook.path());

    erm()
        .args(["scale", "init", "acme", "--matrix-size", "6", "--scale-dir"])
        .arg(scales.path())
        .assert()
        .success();

    let output = erm()
        .args(["--format", "json", "analyze", "--org", "acme"])
        .arg(workbook.path())
        .env("ERM_SCALE_DIR", scales.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["matrix_size"], 6);
}

#[test]
fn analyze_reports_missing_price_column() {
    let dir = TempDir::new().unwrap();
    write_workbook(dir.path());
    fs::write(
        dir.path().join("Price_History.csv"),
        "date,ACME,UST10\n2024-01-01,50,98\n2024-01-02,51,98.5\n",
    )
    .unwrap();

    erm()
        .arg("analyze")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("GOLD"));
}

#[test]
fn analyze_rejects_missing_directory() {
    let dir = TempDir::new().unwrap();

    erm()
        .arg("analyze")
        .arg(dir.path().join("nope"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot load workbook"));
}

#[test]
fn matrix_size_outside_range_rejected() {
    let dir = TempDir::new().unwrap();

    erm()
        .args(["analyze", "--matrix-size", "7"])
        .arg(dir.path())
        .assert()
        .failure();
}

#[test]
fn scale_init_then_show() {
    let scales = TempDir::new().unwrap();

    erm()
        .args(["scale", "init", "acme", "--scale-dir"])
        .arg(scales.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("stored 5x5 scale for 'acme'"));
    assert!(scales.path().join("acme.json").exists());

    // A second init without --force must not overwrite.
    erm()
        .args(["scale", "init", "acme", "--matrix-size", "6", "--scale-dir"])
        .arg(scales.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    erm()
        .args(["scale", "show", "acme", "--scale-dir"])
        .arg(scales.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Scale: acme (stored)"))
        .stdout(predicate::str::contains("10,000,000.00"));
}

#[test]
fn scale_show_falls_back_to_standard() {
    let scales = TempDir::new().unwrap();

    let output = erm()
        .args(["--format", "json", "scale", "show", "newco", "--matrix-size", "6"])
        .env("ERM_SCALE_DIR", scales.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let scale: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(scale["matrix_size"], 6);
    assert_eq!(scale["volatility_thresholds"].as_array().unwrap().len(), 5);
}

#[test]
fn read_only_commands_do_not_create_scale_dir() {
    let workbook = TempDir::new().unwrap();
    let scales = TempDir::new().unwrap();
    let missing = scales.path().join("absent");
    write_workbook(workbook.path());

    erm()
        .args(["scale", "show", "acme", "--scale-dir"])
        .arg(&missing)
        .assert()
        .success()
        .stdout(predicate::str::contains("Scale: acme (standard)"));

    erm()
        .args(["analyze", "--org", "acme", "--scale-dir"])
        .arg(&missing)
        .arg(workbook.path())
        .assert()
        .success();
    assert!(!missing.exists());

    erm()
        .args(["scale", "init", "acme", "--scale-dir"])
        .arg(&missing)
        .assert()
        .success();
    assert!(missing.join("acme.json").exists());
}

#[test]
fn scale_validate_reports_each_field() {
    let dir = TempDir::new().unwrap();
    let valid = dir.path().join("valid.json");
    let invalid = dir.path().join("invalid.json");
    fs::write(
        &valid,
        r#"{"matrix_size": 5, "volatility_thresholds": [5, 10, 20, 30],
            "value_thresholds": [1e4, 1e5, 1e6, 1e7]}"#,
    )
    .unwrap();
    fs::write(
        &invalid,
        r#"{"matrix_size": 5, "volatility_thresholds": [5, 20, 10, 30],
            "value_thresholds": [1e4, 1e5, 1e6]}"#,
    )
    .unwrap();

    erm()
        .args(["scale", "validate"])
        .arg(&valid)
        .assert()
        .success()
        .stdout(predicate::str::contains("valid 5x5 scale"));

    erm()
        .args(["scale", "validate"])
        .arg(&invalid)
        .assert()
        .failure()
        .stderr(predicate::str::contains("volatility_thresholds"))
        .stderr(predicate::str::contains("value_thresholds"))
        .stderr(predicate::str::contains("2 invalid field(s)"));
}
