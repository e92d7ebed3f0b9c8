// Excel workbooks (xlsx, xlsm, xls, xlsb, ods) via calamine

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use pickrecon_recon::{ReconError, SheetSource};

/// First worksheet of a decoded workbook.
pub struct WorkbookSheet {
    name: String,
    range: Range<Data>,
}

impl WorkbookSheet {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Open a workbook file and load its first worksheet.
pub fn open(path: &Path) -> Result<WorkbookSheet, ReconError> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| ReconError::Read(format!("{}: {e}", path.display())))?;
    let sheet = first_sheet(&mut workbook)?;
    log::info!(
        "opened {} (sheet '{}', {} rows)",
        path.display(),
        sheet.name,
        sheet.row_count()
    );
    Ok(sheet)
}

fn first_sheet<RS>(workbook: &mut Sheets<RS>) -> Result<WorkbookSheet, ReconError>
where
    RS: std::io::Read + std::io::Seek,
{
    let name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ReconError::Read("workbook contains no sheets".into()))?;
    let range = workbook
        .worksheet_range(&name)
        .map_err(|e| ReconError::Read(format!("failed to read sheet '{name}': {e}")))?;
    Ok(WorkbookSheet { name, range })
}

/// Text form of a cell. Whole floats print without a decimal part so numeric
/// pick numbers come through as typed.
fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty => return None,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Float(n) => {
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                n.to_string()
            }
        }
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => String::from(if *b { "TRUE" } else { "FALSE" }),
        Data::Error(e) => format!("#{e:?}"),
        Data::DateTime(dt) => dt.as_f64().to_string(),
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

impl SheetSource for WorkbookSheet {
    fn cell(&self, row: u32, col: usize) -> Option<String> {
        if row == 0 {
            return None;
        }
        // Range positions are absolute, so a sheet whose data starts below
        // A1 still reads A1 as empty.
        self.range
            .get_value((row - 1, col as u32))
            .and_then(cell_text)
    }

    fn row_count(&self) -> u32 {
        self.range.end().map(|(r, _)| r + 1).unwrap_or(0)
    }

    fn column_count(&self) -> usize {
        self.range.end().map(|(_, c)| c as usize + 1).unwrap_or(0)
    }
}
