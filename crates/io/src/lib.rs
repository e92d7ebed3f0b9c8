// Spreadsheet decoding and report export

pub mod csv;
pub mod export;
pub mod xlsx;

use std::path::Path;

use pickrecon_recon::{GridSheet, ReconError, SheetSource};

/// A decoded upload, whichever reader produced it.
pub enum LoadedSheet {
    Workbook(xlsx::WorkbookSheet),
    Delimited(GridSheet),
}

impl SheetSource for LoadedSheet {
    fn cell(&self, row: u32, col: usize) -> Option<String> {
        match self {
            Self::Workbook(s) => s.cell(row, col),
            Self::Delimited(s) => s.cell(row, col),
        }
    }

    fn row_count(&self) -> u32 {
        match self {
            Self::Workbook(s) => s.row_count(),
            Self::Delimited(s) => s.row_count(),
        }
    }

    fn column_count(&self) -> usize {
        match self {
            Self::Workbook(s) => s.column_count(),
            Self::Delimited(s) => s.column_count(),
        }
    }
}

/// Decode a report file, choosing the reader by extension.
pub fn open_sheet(path: &Path) -> Result<LoadedSheet, ReconError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => xlsx::open(path).map(LoadedSheet::Workbook),
        "tsv" => self::csv::import(path, Some(b'\t')).map(LoadedSheet::Delimited),
        "csv" | "txt" => self::csv::import(path, None).map(LoadedSheet::Delimited),
        _ => Err(ReconError::Read(format!(
            "{}: unsupported file type (expected .xlsx, .xls, .ods or .csv)",
            path.display()
        ))),
    }
}
