use crate::error::ReconError;
use crate::extract::extract;
use crate::model::{ItemSource, LogicalReport, MissingItems, PickRecord, ReportId, UploadReceipt};
use crate::reconcile::reconcile_report;
use crate::sheet::SheetSource;
use crate::store::ReportStore;

/// Accept one uploaded sheet into an open report.
///
/// Order matters: the status gate runs before the sheet is touched, and the
/// whole extraction finishes before anything is written, so every failure
/// leaves the store unchanged.
pub fn accept_upload<St, S>(store: &mut St, report_id: ReportId, sheet: &S) -> Result<UploadReceipt, ReconError>
where
    St: ReportStore + ?Sized,
    S: SheetSource + ?Sized,
{
    let report = store.report(report_id)?;
    if !report.status.is_open() {
        log::warn!("rejected upload for {report}: report is {}", report.status);
        return Err(ReconError::InvalidTransition {
            report_id,
            status: report.status,
        });
    }

    let extraction = extract(sheet)?;
    if extraction.report_type != report.report_type {
        return Err(ReconError::ReportTypeMismatch {
            expected: report.report_type,
            found: extraction.report_type,
        });
    }

    let appended = store.append_picks(
        report_id,
        extraction.source,
        extraction.report_type,
        &extraction.pick_numbers,
    )?;
    log::info!(
        "appended {appended} {} picks to report {report_id}",
        extraction.source.label()
    );

    Ok(UploadReceipt {
        report_id,
        report_type: extraction.report_type,
        source: extraction.source,
        appended,
    })
}

/// Reconcile a stored report on read.
pub fn view_missing<St>(store: &St, report_id: ReportId) -> Result<MissingItems, ReconError>
where
    St: ReportStore + ?Sized,
{
    let report = store.report(report_id)?;
    let records = store.picks(report_id, None)?;
    let missing = reconcile_report(report.report_type, &records);
    log::debug!(
        "report {report_id}: {} missing from {}",
        missing.ids.len(),
        missing.label()
    );
    Ok(missing)
}

/// One source's raw picks for export, newest first.
pub fn source_listing<St>(store: &St, report_id: ReportId, source: ItemSource) -> Result<Vec<PickRecord>, ReconError>
where
    St: ReportStore + ?Sized,
{
    store.picks(report_id, Some(source))
}

/// Source of the report's most recent pick; `None` for an empty report.
pub fn infer_source<St>(store: &St, report_id: ReportId) -> Result<Option<ItemSource>, ReconError>
where
    St: ReportStore + ?Sized,
{
    Ok(store.picks(report_id, None)?.first().map(|p| p.source))
}

/// Another report of the same type and date that holds the opposite
/// source's picks.
pub fn counterpart_report<St>(store: &St, report: &LogicalReport) -> Result<Option<LogicalReport>, ReconError>
where
    St: ReportStore + ?Sized,
{
    let Some(source) = infer_source(store, report.id)? else {
        return Ok(None);
    };
    let wanted = source.opposite();

    for candidate in store.reports_for(report.report_type, report.date)? {
        if candidate.id == report.id {
            continue;
        }
        if !store.picks(candidate.id, Some(wanted))?.is_empty() {
            return Ok(Some(candidate));
        }
    }
    Ok(None)
}
