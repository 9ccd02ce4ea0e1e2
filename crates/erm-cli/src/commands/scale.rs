//! Scale command implementation.
//!
//! Shows, initialises and validates organisation scale configurations.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use tabled::Tabled;

use erm_config::{get_or_default, ScaleConfigStore, Validate};
use erm_core::types::{ImpactBasis, ScaleConfig};

use crate::cli::OutputFormat;
use crate::commands::{matrix_size, open_store, read_store};
use crate::output::{
    format_amount, print_error, print_header, print_json, print_success, print_table, KeyValue,
};

/// Arguments for the scale command.
#[derive(Args, Debug)]
pub struct ScaleArgs {
    #[command(subcommand)]
    pub command: ScaleCommand,
}

/// Scale subcommands.
#[derive(Subcommand, Debug)]
pub enum ScaleCommand {
    /// Show an organisation's scale (the standard one if none is stored)
    Show(ShowArgs),

    /// Store the standard scale for an organisation
    Init(InitArgs),

    /// Check a scale configuration file without storing it
    Validate(ValidateArgs),
}

/// Arguments for show subcommand.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Organisation id
    pub org: String,

    /// Matrix size assumed when nothing is stored
    #[arg(long, default_value = "5", value_parser = clap::value_parser!(u8).range(5..=6))]
    pub matrix_size: u8,

    /// Directory of stored scale configurations
    #[arg(long, env = "ERM_SCALE_DIR")]
    pub scale_dir: PathBuf,
}

/// Arguments for init subcommand.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Organisation id
    pub org: String,

    /// Risk matrix size
    #[arg(long, default_value = "5", value_parser = clap::value_parser!(u8).range(5..=6))]
    pub matrix_size: u8,

    /// Score impact on the VaR amount instead of portfolio value
    #[arg(long)]
    pub impact_on_var: bool,

    /// Replace an existing configuration
    #[arg(long)]
    pub force: bool,

    /// Directory of stored scale configurations
    #[arg(long, env = "ERM_SCALE_DIR")]
    pub scale_dir: PathBuf,
}

/// Arguments for validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// JSON file holding a scale configuration
    pub file: PathBuf,
}

#[derive(Tabled)]
struct ScaleRow {
    #[tabled(rename = "Score")]
    score: u8,
    #[tabled(rename = "Volatility from")]
    volatility: String,
    #[tabled(rename = "Value from")]
    value: String,
}

/// Execute the scale command.
pub fn execute(args: ScaleArgs, format: OutputFormat) -> Result<()> {
    match args.command {
        ScaleCommand::Show(args) => show(args, format),
        ScaleCommand::Init(args) => init(args, format),
        ScaleCommand::Validate(args) => validate(args),
    }
}

fn show(args: ShowArgs, format: OutputFormat) -> Result<()> {
    let store = read_store(&args.scale_dir);
    let stored = store.get(&args.org)?.is_some();
    let scale = get_or_default(&store, &args.org, matrix_size(args.matrix_size)?)?;

    match format {
        OutputFormat::Json => print_json(&scale)?,
        OutputFormat::Table => {
            let source = if stored { "stored" } else { "standard" };
            print_header(&format!("Scale: {} ({source})", args.org));
            print_table(&[
                KeyValue::new("Matrix Size", scale.matrix_size.to_string()),
                KeyValue::new("Impact Basis", impact_basis_label(scale.impact_basis)),
            ]);
            print_table(&scale_rows(&scale));
        }
    }
    Ok(())
}

fn init(args: InitArgs, format: OutputFormat) -> Result<()> {
    let store = open_store(&args.scale_dir)?;
    if !args.force && store.get(&args.org)?.is_some() {
        bail!(
            "a scale is already stored for '{}'; use --force to replace it",
            args.org
        );
    }

    let basis = if args.impact_on_var {
        ImpactBasis::VarAmount
    } else {
        ImpactBasis::PortfolioValue
    };
    let scale = ScaleConfig::standard(matrix_size(args.matrix_size)?).with_impact_basis(basis);
    let stored = store.put(&args.org, &scale)?;

    match format {
        OutputFormat::Json => print_json(&stored)?,
        OutputFormat::Table => print_success(&format!(
            "stored {} scale for '{}' in {}",
            scale.matrix_size,
            args.org,
            args.scale_dir.display()
        )),
    }
    Ok(())
}

fn validate(args: ValidateArgs) -> Result<()> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("cannot read {}", args.file.display()))?;
    let scale: ScaleConfig = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a scale configuration", args.file.display()))?;

    let errors = Validate::validate(&scale);
    if errors.is_empty() {
        print_success(&format!(
            "{} is a valid {} scale",
            args.file.display(),
            scale.matrix_size
        ));
        return Ok(());
    }
    for error in &errors {
        print_error(&error.to_string());
    }
    bail!("{} has {} invalid field(s)", args.file.display(), errors.len())
}

/// One row per score: the lowest volatility and value reaching it.
fn scale_rows(scale: &ScaleConfig) -> Vec<ScaleRow> {
    (1..=scale.matrix_size.points())
        .map(|score| {
            let below = usize::from(score).checked_sub(2);
            let from = |thresholds: &[f64], render: fn(f64) -> String| {
                below
                    .and_then(|i| thresholds.get(i))
                    .map_or_else(|| "-".to_string(), |t| render(*t))
            };
            ScaleRow {
                score,
                volatility: from(&scale.volatility_thresholds, |t| format!("{t:.2}%")),
                value: from(&scale.value_thresholds, format_amount),
            }
        })
        .collect()
}

fn impact_basis_label(basis: ImpactBasis) -> &'static str {
    match basis {
        ImpactBasis::PortfolioValue => "portfolio value",
        ImpactBasis::VarAmount => "VaR amount",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use erm_core::types::MatrixSize;

    #[test]
    fn test_scale_rows() {
        let rows = scale_rows(&ScaleConfig::standard(MatrixSize::Five));
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].volatility, "-");
        assert_eq!(rows[1].volatility, "5.00%");
        assert_eq!(rows[4].value, "10,000,000.00");
    }
}
