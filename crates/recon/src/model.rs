use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Codes
// ---------------------------------------------------------------------------

/// Which kind of fulfillment report a sheet (and a logical report) carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ReportType {
    #[serde(rename = "OPEN")]
    OpenOrders,
    #[serde(rename = "SHIPPED")]
    ShippedOrders,
}

impl ReportType {
    pub const ALL: [ReportType; 2] = [Self::OpenOrders, Self::ShippedOrders];

    /// Stable storage code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::OpenOrders => "OPEN",
            Self::ShippedOrders => "SHIPPED",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::OpenOrders => "Open Orders",
            Self::ShippedOrders => "Shipped Orders",
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ReportType {
    type Err = ReconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(Self::OpenOrders),
            "SHIPPED" => Ok(Self::ShippedOrders),
            other => Err(ReconError::InvalidCode { field: "report type", value: other.into() }),
        }
    }
}

/// The external system that produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemSource {
    FullCircle,
    Wms,
}

impl ItemSource {
    pub const ALL: [ItemSource; 2] = [Self::FullCircle, Self::Wms];

    pub fn code(&self) -> &'static str {
        match self {
            Self::FullCircle => "FULL_CIRCLE",
            Self::Wms => "WMS",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::FullCircle => "Full Circle",
            Self::Wms => "WMS",
        }
    }

    /// The source a report of this source is compared against.
    pub fn opposite(&self) -> Self {
        match self {
            Self::FullCircle => Self::Wms,
            Self::Wms => Self::FullCircle,
        }
    }
}

impl fmt::Display for ItemSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ItemSource {
    type Err = ReconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FULL_CIRCLE" => Ok(Self::FullCircle),
            "WMS" => Ok(Self::Wms),
            other => Err(ReconError::InvalidCode { field: "source", value: other.into() }),
        }
    }
}

/// Lifecycle of a logical report. One-way: Open -> Closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    #[default]
    Open,
    Closed,
}

impl ReportStatus {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Closed => "Closed",
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ReportStatus {
    type Err = ReconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(Self::Open),
            "CLOSED" => Ok(Self::Closed),
            other => Err(ReconError::InvalidCode { field: "status", value: other.into() }),
        }
    }
}

// ---------------------------------------------------------------------------
// Logical reports + picks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ReportId(pub i64);

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One reconciliation unit, keyed by (report_type, date).
#[derive(Debug, Clone, Serialize)]
pub struct LogicalReport {
    pub id: ReportId,
    /// Empty when the report was created without a display name.
    pub name: String,
    pub report_type: ReportType,
    pub date: NaiveDate,
    pub status: ReportStatus,
    pub is_manual: bool,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl LogicalReport {
    /// The only status transition. Fails if the report is already closed.
    pub fn close(&mut self) -> Result<(), ReconError> {
        match self.status {
            ReportStatus::Open => {
                self.status = ReportStatus::Closed;
                Ok(())
            }
            ReportStatus::Closed => Err(ReconError::InvalidTransition {
                report_id: self.id,
                status: self.status,
            }),
        }
    }
}

impl fmt::Display for LogicalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({})", self.report_type, self.name, self.date)
    }
}

/// Fields supplied when creating a logical report.
#[derive(Debug, Clone)]
pub struct NewReport {
    pub name: String,
    pub report_type: ReportType,
    pub date: NaiveDate,
    pub is_manual: bool,
}

impl NewReport {
    pub fn automated(report_type: ReportType, date: NaiveDate) -> Self {
        Self { name: String::new(), report_type, date, is_manual: false }
    }

    pub fn manual(name: impl Into<String>, report_type: ReportType, date: NaiveDate) -> Self {
        Self { name: name.into(), report_type, date, is_manual: true }
    }
}

/// One normalized pick identifier as stored against a logical report.
#[derive(Debug, Clone, Serialize)]
pub struct PickRecord {
    pub id: i64,
    pub pick_number: String,
    pub source: ItemSource,
    pub report_type: ReportType,
    pub report_id: ReportId,
    pub created: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Classification + extraction
// ---------------------------------------------------------------------------

/// Where a known layout keeps its pick identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LayoutDescriptor {
    pub report_type: ReportType,
    pub source: ItemSource,
    /// 0-based column index.
    pub identifier_column: usize,
    /// 1-based row of the first data row.
    pub first_data_row: u32,
}

impl LayoutDescriptor {
    pub fn label(&self) -> &'static str {
        match (self.report_type, self.source) {
            (ReportType::OpenOrders, ItemSource::FullCircle) => "Open Orders from Full Circle",
            (ReportType::ShippedOrders, ItemSource::FullCircle) => "Shipped Orders from Full Circle",
            (ReportType::OpenOrders, ItemSource::Wms) => "Open Orders from WMS",
            (ReportType::ShippedOrders, ItemSource::Wms) => "Shipped Orders from WMS",
        }
    }
}

/// Identifiers pulled from one sheet, in row order, duplicates kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extraction {
    pub report_type: ReportType,
    pub source: ItemSource,
    pub pick_numbers: Vec<String>,
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

/// One report's identifiers split by source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceSets {
    pub full_circle: BTreeSet<String>,
    pub wms: BTreeSet<String>,
}

/// Identifiers present in the authoritative source but absent from the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingItems {
    pub report_type: ReportType,
    /// The source that lacks the identifiers.
    pub missing_from: ItemSource,
    pub ids: BTreeSet<String>,
    pub base_count: usize,
    pub comparison_count: usize,
}

impl MissingItems {
    /// Display label naming the source that is missing data.
    pub fn label(&self) -> &'static str {
        self.missing_from.label()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Result of accepting one upload into a logical report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadReceipt {
    pub report_id: ReportId,
    pub report_type: ReportType,
    pub source: ItemSource,
    pub appended: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(status: ReportStatus) -> LogicalReport {
        let now = Utc::now();
        LogicalReport {
            id: ReportId(1),
            name: "Morning".into(),
            report_type: ReportType::OpenOrders,
            date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            status,
            is_manual: false,
            created: now,
            modified: now,
        }
    }

    #[test]
    fn codes_round_trip_through_from_str() {
        for t in ReportType::ALL {
            assert_eq!(t.code().parse::<ReportType>().unwrap(), t);
        }
        for s in ItemSource::ALL {
            assert_eq!(s.code().parse::<ItemSource>().unwrap(), s);
        }
        assert_eq!("CLOSED".parse::<ReportStatus>().unwrap(), ReportStatus::Closed);
        assert!("open".parse::<ReportType>().is_err());
    }

    #[test]
    fn close_is_one_way() {
        let mut r = report(ReportStatus::Open);
        r.close().unwrap();
        assert_eq!(r.status, ReportStatus::Closed);

        let err = r.close().unwrap_err();
        assert!(matches!(err, ReconError::InvalidTransition { status: ReportStatus::Closed, .. }));
    }

    #[test]
    fn display_matches_listing_form() {
        assert_eq!(report(ReportStatus::Open).to_string(), "[OPEN] Morning (2026-01-15)");
    }

    #[test]
    fn opposite_source() {
        assert_eq!(ItemSource::FullCircle.opposite(), ItemSource::Wms);
        assert_eq!(ItemSource::Wms.opposite(), ItemSource::FullCircle);
    }

    #[test]
    fn serialized_codes() {
        assert_eq!(serde_json::to_string(&ReportType::ShippedOrders).unwrap(), "\"SHIPPED\"");
        assert_eq!(serde_json::to_string(&ItemSource::FullCircle).unwrap(), "\"FULL_CIRCLE\"");
        assert_eq!(serde_json::to_string(&ReportId(4)).unwrap(), "4");
    }
}
