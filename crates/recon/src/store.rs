//! Persistence seam for logical reports and their picks.
//!
//! The engine never owns storage; it reads and appends through
//! [`ReportStore`]. [`MemoryStore`] is the reference implementation used by
//! tests and short-lived tools; `pickrecon-store` provides the SQLite one.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};

use crate::error::ReconError;
use crate::model::{ItemSource, LogicalReport, NewReport, PickRecord, ReportId, ReportType};

pub trait ReportStore {
    /// Create a report. A second automated report for the same
    /// (type, date) fails with [`ReconError::ConstraintViolation`].
    fn create_report(&mut self, new: &NewReport) -> Result<LogicalReport, ReconError>;

    fn report(&self, id: ReportId) -> Result<LogicalReport, ReconError>;

    /// All reports, newest date first.
    fn reports(&self) -> Result<Vec<LogicalReport>, ReconError>;

    /// Reports sharing a (type, date) key, manual ones included.
    fn reports_for(&self, report_type: ReportType, date: NaiveDate) -> Result<Vec<LogicalReport>, ReconError>;

    /// Picks of one report, newest first, optionally narrowed to a source.
    fn picks(&self, id: ReportId, source: Option<ItemSource>) -> Result<Vec<PickRecord>, ReconError>;

    /// Append one upload's picks. All rows land or none do. Closed reports
    /// refuse appends with [`ReconError::InvalidTransition`].
    fn append_picks(
        &mut self,
        id: ReportId,
        source: ItemSource,
        report_type: ReportType,
        pick_numbers: &[String],
    ) -> Result<usize, ReconError>;

    /// Open -> Closed. Closing twice fails with [`ReconError::InvalidTransition`].
    fn close_report(&mut self, id: ReportId) -> Result<LogicalReport, ReconError>;

    /// Delete a report together with its picks.
    fn delete_report(&mut self, id: ReportId) -> Result<(), ReconError>;
}

/// Process-local store. Enforces the same invariants as the SQLite store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    reports: BTreeMap<ReportId, LogicalReport>,
    picks: Vec<PickRecord>,
    next_report_id: i64,
    next_pick_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReportStore for MemoryStore {
    fn create_report(&mut self, new: &NewReport) -> Result<LogicalReport, ReconError> {
        if !new.is_manual {
            let taken = self.reports.values().any(|r| {
                !r.is_manual && r.report_type == new.report_type && r.date == new.date
            });
            if taken {
                return Err(ReconError::ConstraintViolation {
                    report_type: new.report_type,
                    date: new.date,
                });
            }
        }

        self.next_report_id += 1;
        let now = Utc::now();
        let report = LogicalReport {
            id: ReportId(self.next_report_id),
            name: new.name.clone(),
            report_type: new.report_type,
            date: new.date,
            status: Default::default(),
            is_manual: new.is_manual,
            created: now,
            modified: now,
        };
        self.reports.insert(report.id, report.clone());
        Ok(report)
    }

    fn report(&self, id: ReportId) -> Result<LogicalReport, ReconError> {
        self.reports.get(&id).cloned().ok_or(ReconError::ReportNotFound(id))
    }

    fn reports(&self) -> Result<Vec<LogicalReport>, ReconError> {
        let mut all: Vec<LogicalReport> = self.reports.values().cloned().collect();
        all.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(all)
    }

    fn reports_for(&self, report_type: ReportType, date: NaiveDate) -> Result<Vec<LogicalReport>, ReconError> {
        Ok(self
            .reports
            .values()
            .filter(|r| r.report_type == report_type && r.date == date)
            .cloned()
            .collect())
    }

    fn picks(&self, id: ReportId, source: Option<ItemSource>) -> Result<Vec<PickRecord>, ReconError> {
        self.report(id)?;
        Ok(self
            .picks
            .iter()
            .rev()
            .filter(|p| p.report_id == id && source.map_or(true, |s| p.source == s))
            .cloned()
            .collect())
    }

    fn append_picks(
        &mut self,
        id: ReportId,
        source: ItemSource,
        report_type: ReportType,
        pick_numbers: &[String],
    ) -> Result<usize, ReconError> {
        let report = self.report(id)?;
        if !report.status.is_open() {
            return Err(ReconError::InvalidTransition { report_id: id, status: report.status });
        }
        let created = Utc::now();
        for pick_number in pick_numbers {
            self.next_pick_id += 1;
            self.picks.push(PickRecord {
                id: self.next_pick_id,
                pick_number: pick_number.clone(),
                source,
                report_type,
                report_id: id,
                created,
            });
        }
        Ok(pick_numbers.len())
    }

    fn close_report(&mut self, id: ReportId) -> Result<LogicalReport, ReconError> {
        let report = self.reports.get_mut(&id).ok_or(ReconError::ReportNotFound(id))?;
        report.close()?;
        report.modified = Utc::now();
        Ok(report.clone())
    }

    fn delete_report(&mut self, id: ReportId) -> Result<(), ReconError> {
        self.reports.remove(&id).ok_or(ReconError::ReportNotFound(id))?;
        self.picks.retain(|p| p.report_id != id);
        Ok(())
    }
}
