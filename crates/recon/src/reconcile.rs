use std::collections::BTreeSet;

use crate::model::{ItemSource, MissingItems, PickRecord, ReportType, SourceSets};

/// Identifiers the authoritative source has that the other source lacks.
///
/// Open orders: Full Circle is authoritative, so WMS is checked against it.
/// Shipped orders: WMS is authoritative, so Full Circle is checked against it.
/// Membership only; repeated identifiers count once.
pub fn missing(
    report_type: ReportType,
    full_circle_ids: &BTreeSet<String>,
    wms_ids: &BTreeSet<String>,
) -> MissingItems {
    let (base, comparison, missing_from) = match report_type {
        ReportType::OpenOrders => (full_circle_ids, wms_ids, ItemSource::Wms),
        ReportType::ShippedOrders => (wms_ids, full_circle_ids, ItemSource::FullCircle),
    };

    MissingItems {
        report_type,
        missing_from,
        ids: base.difference(comparison).cloned().collect(),
        base_count: base.len(),
        comparison_count: comparison.len(),
    }
}

/// Split stored picks into one identifier set per source.
pub fn partition_by_source(records: &[PickRecord]) -> SourceSets {
    let mut sets = SourceSets::default();
    for record in records {
        let target = match record.source {
            ItemSource::FullCircle => &mut sets.full_circle,
            ItemSource::Wms => &mut sets.wms,
        };
        target.insert(record.pick_number.clone());
    }
    sets
}

/// Reconcile one logical report's picks.
pub fn reconcile_report(report_type: ReportType, records: &[PickRecord]) -> MissingItems {
    let sets = partition_by_source(records);
    missing(report_type, &sets.full_circle, &sets.wms)
}
