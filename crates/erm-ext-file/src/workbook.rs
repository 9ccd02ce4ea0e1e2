//! Sheet and workbook containers.

use std::io::Read;
use std::path::Path;

use erm_core::{RiskError, RiskResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Name of the holdings sheet.
pub const HOLDINGS_SHEET: &str = "Portfolio_Holdings";
/// Name of the price history sheet.
pub const HISTORY_SHEET: &str = "Price_History";
/// Name of the configuration sheet.
pub const CONFIG_SHEET: &str = "Configuration";

/// The sheets a workbook must provide.
pub const REQUIRED_SHEETS: [&str; 3] = [HOLDINGS_SHEET, HISTORY_SHEET, CONFIG_SHEET];

// =============================================================================
// SHEET
// =============================================================================

/// A rectangular table of text cells with a header row.
///
/// Row numbers reported in errors are spreadsheet rows: the header is row 1
/// and `rows[0]` is row 2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    /// Sheet name.
    pub name: String,
    /// Header cells, trimmed.
    pub headers: Vec<String>,
    /// Data rows. Rows may be shorter than the header; missing cells read as blank.
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    /// Creates a sheet from already-split cells.
    pub fn new<S: Into<String>>(name: impl Into<String>, headers: Vec<S>, rows: Vec<Vec<S>>) -> Self {
        Self {
            name: name.into(),
            headers: headers
                .into_iter()
                .map(|h| Into::<String>::into(h).trim().to_string())
                .collect(),
            rows: rows
                .into_iter()
                .map(|r| r.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// Reads a sheet from CSV text.
    pub fn from_csv_reader<R: Read>(name: impl Into<String>, reader: R) -> RiskResult<Self> {
        let name = name.into();
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| csv_error(&name, &e))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| csv_error(&name, &e))?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        debug!(sheet = %name, rows = rows.len(), "sheet read");
        Ok(Self {
            name,
            headers,
            rows,
        })
    }

    /// Position of a header, matched exactly.
    pub fn column(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    /// Position of a header that must be present.
    pub fn require_column(&self, header: &str) -> RiskResult<usize> {
        self.column(header).ok_or_else(|| {
            RiskError::malformed(&self.name, 1, format!("missing required header '{header}'"))
        })
    }

    /// Trimmed cell text; blank when the row is short.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map_or("", |c| c.trim())
    }

    /// True if every cell of the row is blank.
    pub fn is_blank_row(&self, row: usize) -> bool {
        self.rows
            .get(row)
            .map_or(true, |r| r.iter().all(|c| c.trim().is_empty()))
    }

    /// Spreadsheet row number of `rows[index]`.
    pub fn row_number(index: usize) -> usize {
        index + 2
    }

    /// Error at `rows[index]` of this sheet.
    pub fn error_at(&self, index: usize, reason: impl Into<String>) -> RiskError {
        RiskError::malformed(&self.name, Self::row_number(index), reason)
    }
}

fn csv_error(sheet: &str, err: &csv::Error) -> RiskError {
    let row = err.position().map_or(0, |p| p.line() as usize);
    RiskError::malformed(sheet, row, err.to_string())
}

// =============================================================================
// WORKBOOK
// =============================================================================

/// A set of named sheets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    /// Creates an empty workbook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a sheet, replacing any sheet of the same name.
    #[must_use]
    pub fn with_sheet(mut self, sheet: Sheet) -> Self {
        self.sheets.retain(|s| s.name != sheet.name);
        self.sheets.push(sheet);
        self
    }

    /// Reads `<sheet name>.csv` for each required sheet in `dir`.
    ///
    /// Absent files are skipped here and reported when the sheet is looked up.
    pub fn from_dir(dir: impl AsRef<Path>) -> RiskResult<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(RiskError::Io {
                path: dir.display().to_string(),
                message: "not a directory".to_string(),
            });
        }

        let mut workbook = Self::new();
        for name in REQUIRED_SHEETS {
            let path = dir.join(format!("{name}.csv"));
            if !path.exists() {
                continue;
            }
            let file = std::fs::File::open(&path).map_err(|e| RiskError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            workbook = workbook.with_sheet(Sheet::from_csv_reader(name, file)?);
        }
        Ok(workbook)
    }

    /// Looks up a sheet by name.
    pub fn sheet(&self, name: &str) -> RiskResult<&Sheet> {
        self.sheets
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| RiskError::malformed(name, 0, "sheet not found in workbook"))
    }

    /// Sheet names, in insertion order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}
