//! Analyze command implementation.
//!
//! Loads a workbook directory, runs the VaR engine and prints the result.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tabled::Tabled;

use erm_analytics::{VaRCalculator, VaRResult};
use erm_config::get_or_default;
use erm_core::types::ScaleConfig;

use crate::cli::OutputFormat;
use crate::commands::{matrix_size, read_store};
use crate::output::{
    format_amount, print_header, print_json, print_table, print_warning, KeyValue,
};

/// Arguments for the analyze command.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Directory holding Portfolio_Holdings.csv, Price_History.csv and Configuration.csv
    pub workbook: PathBuf,

    /// Organisation whose stored scale applies (needs --scale-dir)
    #[arg(long)]
    pub org: Option<String>,

    /// Risk matrix size used when no scale is stored
    #[arg(long, default_value = "5", value_parser = clap::value_parser!(u8).range(5..=6))]
    pub matrix_size: u8,

    /// Directory of stored scale configurations
    #[arg(long, env = "ERM_SCALE_DIR")]
    pub scale_dir: Option<PathBuf>,
}

#[derive(Tabled)]
struct AssetRow {
    #[tabled(rename = "Asset")]
    asset: String,
    #[tabled(rename = "Type")]
    asset_type: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Weight")]
    weight: String,
    #[tabled(rename = "Vol (ann.)")]
    volatility: String,
    #[tabled(rename = "Standalone VaR")]
    standalone: String,
    #[tabled(rename = "Contribution")]
    contribution: String,
    #[tabled(rename = "Share")]
    share: String,
}

/// Execute the analyze command.
pub fn execute(args: AnalyzeArgs, format: OutputFormat) -> Result<()> {
    let scale = resolve_scale(&args)?;
    let workbook = erm_ext_file::load_workbook_dir(&args.workbook)
        .with_context(|| format!("cannot load workbook {}", args.workbook.display()))?;

    let calculator = VaRCalculator::new(&scale)?;
    let result = calculator.calculate(&workbook.holdings, &workbook.history, &workbook.config)?;

    match format {
        OutputFormat::Table => print_result(&result),
        OutputFormat::Json => print_json(&result)?,
    }
    Ok(())
}

/// Stored scale of `--org` when a store is given, the standard scale otherwise.
fn resolve_scale(args: &AnalyzeArgs) -> Result<ScaleConfig> {
    let size = matrix_size(args.matrix_size)?;
    match (&args.org, &args.scale_dir) {
        (Some(org), Some(dir)) => {
            let store = read_store(dir);
            Ok(get_or_default(&store, org, size)?)
        }
        (Some(org), None) => {
            print_warning(&format!(
                "no --scale-dir given; using the standard {size} scale for '{org}'"
            ));
            Ok(ScaleConfig::standard(size))
        }
        (None, _) => Ok(ScaleConfig::standard(size)),
    }
}

fn print_result(result: &VaRResult) {
    let title = result
        .portfolio_name
        .as_deref()
        .map_or_else(|| "Portfolio VaR".to_string(), |n| format!("Portfolio VaR: {n}"));
    print_header(&title);

    let mut summary = vec![
        KeyValue::amount("Portfolio Value", result.portfolio_value),
        KeyValue::new(
            "Confidence / Horizon",
            format!("{} / {} day(s)", result.confidence, result.horizon_days),
        ),
        KeyValue::new("Z-Score", format!("{:.4}", result.z_score)),
        KeyValue::new(
            "Observations",
            format!("{} ({})", result.observations, result.frequency),
        ),
        KeyValue::percent("Volatility (ann.)", result.volatility_pct),
        KeyValue::amount("Value at Risk", result.var),
        KeyValue::amount("Standalone VaR Sum", result.standalone_var_sum),
        KeyValue::amount("Diversification Benefit", result.diversification_benefit),
    ];
    if let Some(historical) = result.historical_var {
        summary.push(KeyValue::amount("Historical VaR", historical));
    }
    summary.push(KeyValue::new(
        "Likelihood / Impact",
        format!(
            "{} / {} ({})",
            result.likelihood_score, result.impact_score, result.matrix_size
        ),
    ));
    print_table(&summary);

    print_header("Asset Breakdown");
    let rows: Vec<AssetRow> = result
        .assets
        .iter()
        .map(|a| AssetRow {
            asset: a.asset.clone(),
            asset_type: a.asset_type.as_str().to_string(),
            value: format_amount(a.market_value),
            weight: format!("{:.2}%", a.weight * 100.0),
            volatility: format!("{:.2}%", a.volatility_pct),
            standalone: format_amount(a.standalone_var),
            contribution: format_amount(a.contribution),
            share: format!("{:.2}%", a.contribution_pct),
        })
        .collect();
    print_table(&rows);

    for warning in &result.warnings {
        print_warning(&warning.to_string());
    }
}
