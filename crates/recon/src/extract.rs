use crate::classify::classify;
use crate::error::ReconError;
use crate::model::{Extraction, LayoutDescriptor};
use crate::sheet::SheetSource;

/// Classify a sheet and pull its pick numbers in row order.
///
/// Fails with [`ReconError::UnknownFormat`] before reading any data row when
/// the layout is not recognized. Duplicates are kept.
pub fn extract<S: SheetSource + ?Sized>(sheet: &S) -> Result<Extraction, ReconError> {
    let layout = classify(sheet).ok_or(ReconError::UnknownFormat)?;
    let pick_numbers = pick_numbers_for(sheet, &layout);

    log::info!(
        "extracted {} pick numbers ({})",
        pick_numbers.len(),
        layout.label()
    );

    Ok(Extraction {
        report_type: layout.report_type,
        source: layout.source,
        pick_numbers,
    })
}

/// Walk the layout's identifier column from the first data row to the end
/// of the sheet. Blank cells are skipped; they never end the scan.
pub fn pick_numbers_for<S: SheetSource + ?Sized>(sheet: &S, layout: &LayoutDescriptor) -> Vec<String> {
    let last_row = sheet.row_count();
    (layout.first_data_row..=last_row)
        .filter_map(|row| sheet.cell(row, layout.identifier_column))
        .filter_map(|raw| normalize_pick_number(&raw))
        .collect()
}

/// Trim and drop every hyphen. `None` when nothing is left.
pub fn normalize_pick_number(raw: &str) -> Option<String> {
    let normalized = raw.trim().replace('-', "");
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}
