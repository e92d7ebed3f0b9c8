//! `pickrecon-recon`: pick-number reconciliation engine.
//!
//! Pure engine crate: classifies decoded sheets, extracts normalized pick
//! numbers, and computes which source is missing which picks. Storage and
//! file decoding live behind the [`ReportStore`] and [`SheetSource`] traits.

pub mod classify;
pub mod error;
pub mod extract;
pub mod ingest;
pub mod model;
pub mod reconcile;
pub mod sheet;
pub mod store;

pub use classify::{classify, describe};
pub use error::ReconError;
pub use extract::{extract, normalize_pick_number};
pub use ingest::{accept_upload, counterpart_report, infer_source, source_listing, view_missing};
pub use model::{
    Extraction, ItemSource, LayoutDescriptor, LogicalReport, MissingItems, NewReport, PickRecord,
    ReportId, ReportStatus, ReportType, SourceSets, UploadReceipt,
};
pub use reconcile::{missing, partition_by_source, reconcile_report};
pub use sheet::{GridSheet, SheetSource};
pub use store::{MemoryStore, ReportStore};
