//! CLI Exit Code Registry
//!
//! Single source of truth for `pickrecon` exit codes. Scripts rely on them.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success                                              |
//! | 1    | General error, or `missing --strict` found gaps      |
//! | 2    | Usage or configuration error                         |
//! | 3    | Spreadsheet could not be read                        |
//! | 4    | Spreadsheet matched no known layout                  |
//! | 5    | Sheet's report type differs from the target report  |
//! | 6    | Duplicate automated report for (type, date)          |
//! | 7    | Report is closed                                     |
//! | 8    | Report not found                                     |
//! | 9    | Database error                                       |
//! | 10   | Export could not be written                          |

use pickrecon_recon::ReconError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// `missing --strict` found picks missing. Like `diff(1)`, 1 means "differs".
pub const EXIT_MISSING_FOUND: u8 = 1;

/// Usage error - bad arguments, unreadable settings file.
pub const EXIT_USAGE: u8 = 2;

pub const EXIT_READ: u8 = 3;
pub const EXIT_UNKNOWN_FORMAT: u8 = 4;
pub const EXIT_TYPE_MISMATCH: u8 = 5;
pub const EXIT_DUPLICATE_REPORT: u8 = 6;
pub const EXIT_REPORT_CLOSED: u8 = 7;
pub const EXIT_NOT_FOUND: u8 = 8;
pub const EXIT_STORAGE: u8 = 9;
pub const EXIT_EXPORT: u8 = 10;

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::Read(_) => EXIT_READ,
        ReconError::UnknownFormat => EXIT_UNKNOWN_FORMAT,
        ReconError::ReportTypeMismatch { .. } => EXIT_TYPE_MISMATCH,
        ReconError::ConstraintViolation { .. } => EXIT_DUPLICATE_REPORT,
        ReconError::InvalidTransition { .. } => EXIT_REPORT_CLOSED,
        ReconError::ReportNotFound(_) => EXIT_NOT_FOUND,
        ReconError::InvalidCode { .. } => EXIT_USAGE,
        ReconError::Storage(_) => EXIT_STORAGE,
        ReconError::Export(_) => EXIT_EXPORT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pickrecon_recon::{ReportId, ReportStatus};

    #[test]
    fn engine_errors_have_distinct_codes() {
        let errors = [
            ReconError::Read("x".into()),
            ReconError::UnknownFormat,
            ReconError::ReportTypeMismatch {
                expected: pickrecon_recon::ReportType::OpenOrders,
                found: pickrecon_recon::ReportType::ShippedOrders,
            },
            ReconError::ConstraintViolation {
                report_type: pickrecon_recon::ReportType::OpenOrders,
                date: chrono::NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            },
            ReconError::InvalidTransition { report_id: ReportId(1), status: ReportStatus::Closed },
            ReconError::ReportNotFound(ReportId(1)),
            ReconError::Storage("x".into()),
            ReconError::Export("x".into()),
        ];
        let mut codes: Vec<u8> = errors.iter().map(recon_exit_code).collect();
        assert!(codes.iter().all(|&c| c != EXIT_SUCCESS && c != EXIT_MISSING_FOUND));
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }
}
