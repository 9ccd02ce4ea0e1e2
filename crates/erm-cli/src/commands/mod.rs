//! CLI command implementations.

pub mod analyze;
pub mod scale;

pub use analyze::AnalyzeArgs;
pub use scale::ScaleArgs;

use std::path::Path;

use anyhow::{Context, Result};
use erm_config::JsonFileScaleConfigStore;
use erm_core::types::MatrixSize;

/// Converts the `--matrix-size` flag value.
pub fn matrix_size(points: u8) -> Result<MatrixSize> {
    Ok(MatrixSize::try_from(points)?)
}

/// Opens the JSON scale store in `dir` for writing, creating the directory.
pub fn open_store(dir: &Path) -> Result<JsonFileScaleConfigStore> {
    JsonFileScaleConfigStore::open(dir)
        .with_context(|| format!("cannot open scale store at {}", dir.display()))
}

/// Opens the JSON scale store in `dir` for lookups only.
pub fn read_store(dir: &Path) -> JsonFileScaleConfigStore {
    JsonFileScaleConfigStore::open_read_only(dir)
}
