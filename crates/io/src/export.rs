// Discrepancy and per-source exports

use std::io::Write;
use std::path::Path;

use pickrecon_recon::{ItemSource, LogicalReport, MissingItems, PickRecord, ReconError};
use rust_xlsxwriter::{Format, Workbook};

pub const MISSING_HEADERS: [&str; 2] = ["pick_number", "missing_from"];
pub const SOURCE_HEADERS: [&str; 3] = ["pick_number", "source", "created"];

fn export_err(e: impl std::fmt::Display) -> ReconError {
    ReconError::Export(e.to_string())
}

/// Missing identifiers, one per row, sorted, tagged with the source that
/// lacks them.
pub fn write_missing_csv<W: Write>(writer: W, missing: &MissingItems) -> Result<(), ReconError> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(MISSING_HEADERS).map_err(export_err)?;
    for id in &missing.ids {
        out.write_record([id.as_str(), missing.label()]).map_err(export_err)?;
    }
    out.flush().map_err(export_err)
}

/// Raw picks of one source, in the order given.
pub fn write_source_csv<W: Write>(writer: W, picks: &[PickRecord]) -> Result<(), ReconError> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(SOURCE_HEADERS).map_err(export_err)?;
    for pick in picks {
        let created = pick.created.to_rfc3339();
        out.write_record([pick.pick_number.as_str(), pick.source.label(), created.as_str()])
            .map_err(export_err)?;
    }
    out.flush().map_err(export_err)
}

/// Same content as [`write_missing_csv`], as a single-sheet workbook.
pub fn write_missing_xlsx(path: &Path, missing: &MissingItems) -> Result<(), ReconError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Missing").map_err(export_err)?;

    for (col, header) in MISSING_HEADERS.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *header, &bold)
            .map_err(export_err)?;
    }
    for (i, id) in missing.ids.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, id.as_str()).map_err(export_err)?;
        sheet.write_string(row, 1, missing.label()).map_err(export_err)?;
    }

    workbook.save(path).map_err(export_err)?;
    log::info!("wrote {} missing picks to {}", missing.ids.len(), path.display());
    Ok(())
}

/// Default file names: `<type>_<date>_missing.csv`, `<type>_<date>_<source>.csv`.
pub fn missing_file_name(report: &LogicalReport, extension: &str) -> String {
    format!("{}_{}_missing.{extension}", report.report_type.code().to_lowercase(), report.date)
}

pub fn source_file_name(report: &LogicalReport, source: ItemSource) -> String {
    format!(
        "{}_{}_{}.csv",
        report.report_type.code().to_lowercase(),
        report.date,
        source.code().to_lowercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use pickrecon_recon::{missing, ReportId, ReportStatus, ReportType, SheetSource};
    use std::collections::BTreeSet;

    fn ids(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn report() -> LogicalReport {
        let now = Utc::now();
        LogicalReport {
            id: ReportId(3),
            name: String::new(),
            report_type: ReportType::ShippedOrders,
            date: NaiveDate::from_ymd_opt(2026, 1, 20).unwrap(),
            status: ReportStatus::Open,
            is_manual: false,
            created: now,
            modified: now,
        }
    }

    #[test]
    fn missing_csv_rows() {
        let view = missing(ReportType::ShippedOrders, &ids(&["B"]), &ids(&["C", "A", "B"]));
        let mut buf = Vec::new();
        write_missing_csv(&mut buf, &view).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "pick_number,missing_from\nA,Full Circle\nC,Full Circle\n");
    }

    #[test]
    fn empty_missing_csv_has_header_only() {
        let view = missing(ReportType::OpenOrders, &ids(&[]), &ids(&["A"]));
        let mut buf = Vec::new();
        write_missing_csv(&mut buf, &view).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "pick_number,missing_from\n");
    }

    #[test]
    fn source_csv_rows() {
        let created = Utc.with_ymd_and_hms(2026, 1, 20, 8, 30, 0).unwrap();
        let picks = vec![PickRecord {
            id: 1,
            pick_number: "123456".into(),
            source: ItemSource::Wms,
            report_type: ReportType::OpenOrders,
            report_id: ReportId(3),
            created,
        }];
        let mut buf = Vec::new();
        write_source_csv(&mut buf, &picks).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "pick_number,source,created\n123456,WMS,2026-01-20T08:30:00+00:00\n"
        );
    }

    #[test]
    fn missing_xlsx_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.xlsx");
        let view = missing(ReportType::OpenOrders, &ids(&["X-1", "Y"]), &ids(&["Y"]));
        write_missing_xlsx(&path, &view).unwrap();

        let sheet = crate::xlsx::open(&path).unwrap();
        assert_eq!(sheet.name(), "Missing");
        assert_eq!(sheet.cell(1, 0).as_deref(), Some("pick_number"));
        assert_eq!(sheet.cell(2, 0).as_deref(), Some("X-1"));
        assert_eq!(sheet.cell(2, 1).as_deref(), Some("WMS"));
        assert_eq!(sheet.row_count(), 2);
    }

    #[test]
    fn file_names() {
        let r = report();
        assert_eq!(missing_file_name(&r, "csv"), "shipped_2026-01-20_missing.csv");
        assert_eq!(source_file_name(&r, ItemSource::FullCircle), "shipped_2026-01-20_full_circle.csv");
    }
}
