use std::fmt;

use chrono::NaiveDate;

use crate::model::{ReportId, ReportStatus, ReportType};

#[derive(Debug)]
pub enum ReconError {
    /// Spreadsheet bytes could not be decoded.
    Read(String),
    /// Sheet decoded fine but matched none of the known layouts.
    UnknownFormat,
    /// A second automated report for an existing (type, date) pair.
    ConstraintViolation { report_type: ReportType, date: NaiveDate },
    /// Upload or close attempted against a report that is already closed.
    InvalidTransition { report_id: ReportId, status: ReportStatus },
    /// Uploaded sheet belongs to a different report type than the target report.
    ReportTypeMismatch { expected: ReportType, found: ReportType },
    ReportNotFound(ReportId),
    /// Stored or user-supplied enum code that doesn't map to a variant.
    InvalidCode { field: &'static str, value: String },
    /// Persistence failure other than the uniqueness constraint.
    Storage(String),
    /// Rendering or writing an export failed.
    Export(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(msg) => write!(f, "cannot read spreadsheet: {msg}"),
            Self::UnknownFormat => write!(f, "unrecognized report format"),
            Self::ConstraintViolation { report_type, date } => write!(
                f,
                "duplicate report: an automated {} report already exists for {date}",
                report_type.label()
            ),
            Self::InvalidTransition { report_id, status } => write!(
                f,
                "report {report_id} is {}; it no longer accepts changes",
                status.label().to_lowercase()
            ),
            Self::ReportTypeMismatch { expected, found } => write!(
                f,
                "sheet contains {} but the report expects {}",
                found.label(),
                expected.label()
            ),
            Self::ReportNotFound(id) => write!(f, "report {id} not found"),
            Self::InvalidCode { field, value } => write!(f, "invalid {field} code '{value}'"),
            Self::Storage(msg) => write!(f, "storage error: {msg}"),
            Self::Export(msg) => write!(f, "export error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_facing_messages() {
        assert_eq!(ReconError::UnknownFormat.to_string(), "unrecognized report format");

        let err = ReconError::ConstraintViolation {
            report_type: ReportType::ShippedOrders,
            date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "duplicate report: an automated Shipped Orders report already exists for 2026-03-02"
        );

        let err = ReconError::InvalidTransition {
            report_id: ReportId(7),
            status: ReportStatus::Closed,
        };
        assert!(err.to_string().starts_with("report 7 is closed"));
    }
}
