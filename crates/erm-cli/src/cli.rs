//! CLI argument definitions.

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands::{AnalyzeArgs, ScaleArgs};

/// ERM - Portfolio VaR and risk-matrix scoring
#[derive(Parser)]
#[command(name = "erm")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Log debug output to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Compute portfolio VaR and risk scores for a workbook
    Analyze(AnalyzeArgs),

    /// Manage organisation scale configurations
    Scale(ScaleArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
}
