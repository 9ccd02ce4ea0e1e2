//! ERM CLI - Command-line interface for portfolio VaR analysis.
//!
//! # Usage
//!
//! ```bash
//! # Analyse a workbook directory with the standard 5x5 scale
//! erm analyze ./q3-portfolio
//!
//! # Use the organisation's stored scale, JSON output
//! erm analyze ./q3-portfolio --org acme --scale-dir ./scales --format json
//!
//! # Manage stored scales
//! erm scale init acme --matrix-size 6 --scale-dir ./scales
//! erm scale show acme --scale-dir ./scales
//! erm scale validate ./draft-scale.json
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let format = cli.format;

    match cli.command {
        Commands::Analyze(args) => commands::analyze::execute(args, format)?,
        Commands::Scale(args) => commands::scale::execute(args, format)?,
    }

    Ok(())
}
