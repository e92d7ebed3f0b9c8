use crate::model::{ItemSource, LayoutDescriptor, ReportType};
use crate::sheet::SheetSource;

/// What the rules look at: A1 and the header row, both trimmed.
struct SheetProbe {
    a1: String,
    headers: Vec<String>,
}

impl SheetProbe {
    fn read<S: SheetSource + ?Sized>(sheet: &S) -> Self {
        Self {
            a1: sheet.cell(1, 0).map(|v| v.trim().to_string()).unwrap_or_default(),
            headers: sheet.header_row(),
        }
    }

    fn has_header(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }
}

struct LayoutRule {
    matches: fn(&SheetProbe) -> bool,
    layout: LayoutDescriptor,
}

fn is_pick_slip(p: &SheetProbe) -> bool {
    p.a1.contains("Pick Slip Report for Released Picks")
}

fn is_daily_shipment(p: &SheetProbe) -> bool {
    p.a1.contains("Daily Shipment Report")
}

fn has_shipping_info_id(p: &SheetProbe) -> bool {
    p.has_header("ShippingInfoId")
}

fn has_ord_id(p: &SheetProbe) -> bool {
    p.has_header("OrdId")
}

/// Known layouts in priority order. First match wins; a sheet that satisfies
/// several rules resolves to the earliest one.
const LAYOUT_RULES: [LayoutRule; 4] = [
    LayoutRule {
        matches: is_pick_slip,
        layout: LayoutDescriptor {
            report_type: ReportType::OpenOrders,
            source: ItemSource::FullCircle,
            identifier_column: 0,
            first_data_row: 6,
        },
    },
    LayoutRule {
        matches: is_daily_shipment,
        layout: LayoutDescriptor {
            report_type: ReportType::ShippedOrders,
            source: ItemSource::FullCircle,
            identifier_column: 13,
            first_data_row: 6,
        },
    },
    LayoutRule {
        matches: has_shipping_info_id,
        layout: LayoutDescriptor {
            report_type: ReportType::ShippedOrders,
            source: ItemSource::Wms,
            identifier_column: 3,
            first_data_row: 2,
        },
    },
    LayoutRule {
        matches: has_ord_id,
        layout: LayoutDescriptor {
            report_type: ReportType::OpenOrders,
            source: ItemSource::Wms,
            identifier_column: 2,
            first_data_row: 2,
        },
    },
];

/// Identify which known layout a sheet uses. `None` means the sheet is
/// readable but unrecognized.
pub fn classify<S: SheetSource + ?Sized>(sheet: &S) -> Option<LayoutDescriptor> {
    let probe = SheetProbe::read(sheet);
    let layout = LAYOUT_RULES
        .iter()
        .find(|rule| (rule.matches)(&probe))
        .map(|rule| rule.layout);

    match &layout {
        Some(l) => log::debug!("classified sheet as {}", l.label()),
        None => log::debug!("sheet matched no known layout (A1 = {:?})", probe.a1),
    }
    layout
}

/// Human label for the sheet's layout, or "Unknown Report".
pub fn describe<S: SheetSource + ?Sized>(sheet: &S) -> &'static str {
    classify(sheet).map(|l| l.label()).unwrap_or("Unknown Report")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::GridSheet;

    fn sheet(rows: Vec<Vec<&str>>) -> GridSheet {
        GridSheet::from_strings(rows)
    }

    #[test]
    fn full_circle_pick_slip() {
        let s = sheet(vec![vec!["  Pick Slip Report for Released Picks - Warehouse 4 "]]);
        assert_eq!(
            classify(&s),
            Some(LayoutDescriptor {
                report_type: ReportType::OpenOrders,
                source: ItemSource::FullCircle,
                identifier_column: 0,
                first_data_row: 6,
            })
        );
    }

    #[test]
    fn full_circle_daily_shipment() {
        let s = sheet(vec![vec!["Daily Shipment Report 01/15/2026"]]);
        let layout = classify(&s).unwrap();
        assert_eq!(layout.report_type, ReportType::ShippedOrders);
        assert_eq!(layout.source, ItemSource::FullCircle);
        assert_eq!(layout.identifier_column, 13);
        assert_eq!(layout.first_data_row, 6);
    }

    #[test]
    fn wms_shipped_by_header() {
        let s = sheet(vec![vec!["Carrier", "Date", "Ref", " ShippingInfoId "]]);
        assert_eq!(
            classify(&s),
            Some(LayoutDescriptor {
                report_type: ReportType::ShippedOrders,
                source: ItemSource::Wms,
                identifier_column: 3,
                first_data_row: 2,
            })
        );
    }

    #[test]
    fn wms_open_by_header() {
        let s = sheet(vec![vec!["Whse", "Cust", "OrdId"]]);
        let layout = classify(&s).unwrap();
        assert_eq!(layout.report_type, ReportType::OpenOrders);
        assert_eq!(layout.source, ItemSource::Wms);
        assert_eq!(layout.identifier_column, 2);
        assert_eq!(layout.first_data_row, 2);
    }

    #[test]
    fn a1_marker_beats_header_match() {
        // A1 doubles as the first header cell, so both rules fire.
        let s = sheet(vec![vec!["Pick Slip Report for Released Picks", "x", "y", "ShippingInfoId"]]);
        let layout = classify(&s).unwrap();
        assert_eq!(layout.report_type, ReportType::OpenOrders);
        assert_eq!(layout.source, ItemSource::FullCircle);
    }

    #[test]
    fn shipping_info_id_beats_ord_id() {
        let s = sheet(vec![vec!["OrdId", "x", "y", "ShippingInfoId"]]);
        let layout = classify(&s).unwrap();
        assert_eq!(layout.report_type, ReportType::ShippedOrders);
        assert_eq!(layout.source, ItemSource::Wms);
    }

    #[test]
    fn header_must_match_exactly() {
        let s = sheet(vec![vec!["OrdIds", "ShippingInfo"]]);
        assert_eq!(classify(&s), None);
    }

    #[test]
    fn unknown_and_empty() {
        assert_eq!(classify(&sheet(vec![vec!["Inventory Snapshot"]])), None);
        assert_eq!(classify(&GridSheet::default()), None);
        assert_eq!(describe(&GridSheet::default()), "Unknown Report");
    }

    #[test]
    fn describe_labels() {
        assert_eq!(describe(&sheet(vec![vec!["Whse", "Cust", "OrdId"]])), "Open Orders from WMS");
        assert_eq!(
            describe(&sheet(vec![vec!["Daily Shipment Report"]])),
            "Shipped Orders from Full Circle"
        );
    }
}
