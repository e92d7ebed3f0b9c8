//! SQLite-backed [`ReportStore`].
//!
//! Reports live in `reports`, picks in `items`. The automated-report
//! uniqueness rule is a partial unique index, and deleting a report cascades
//! to its picks through a foreign key.

mod schema;

use std::path::Path;
use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{ffi, params, Connection, ErrorCode, OptionalExtension, Row};

use pickrecon_recon::{
    ItemSource, LogicalReport, NewReport, PickRecord, ReconError, ReportId, ReportStore, ReportType,
};

pub use schema::SCHEMA_VERSION;

const REPORT_COLUMNS: &str = "id, name, type, date, status, is_manual, created, modified";
const PICK_COLUMNS: &str = "id, pick_number, source, type, report_id, created";

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a database file and migrate it.
    pub fn open(path: &Path) -> Result<Self, ReconError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| ReconError::Storage(format!("{}: {e}", parent.display())))?;
            }
        }
        let conn = Connection::open(path)
            .map_err(|e| ReconError::Storage(format!("{}: {e}", path.display())))?;
        log::debug!("opened database {}", path.display());
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self, ReconError> {
        let conn = Connection::open_in_memory().map_err(storage_err)?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, ReconError> {
        conn.pragma_update(None, "foreign_keys", true).map_err(storage_err)?;
        schema::migrate(&conn).map_err(ReconError::Storage)?;
        Ok(Self { conn })
    }
}

fn storage_err(e: rusqlite::Error) -> ReconError {
    ReconError::Storage(e.to_string())
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == ErrorCode::ConstraintViolation
                && err.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

/// Parse a stored enum code, surfacing bad values as a conversion failure.
fn code<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = ReconError>,
{
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn report_from_row(row: &Row<'_>) -> rusqlite::Result<LogicalReport> {
    Ok(LogicalReport {
        id: ReportId(row.get(0)?),
        name: row.get(1)?,
        report_type: code(row, 2)?,
        date: row.get(3)?,
        status: code(row, 4)?,
        is_manual: row.get(5)?,
        created: row.get(6)?,
        modified: row.get(7)?,
    })
}

fn pick_from_row(row: &Row<'_>) -> rusqlite::Result<PickRecord> {
    Ok(PickRecord {
        id: row.get(0)?,
        pick_number: row.get(1)?,
        source: code(row, 2)?,
        report_type: code(row, 3)?,
        report_id: ReportId(row.get(4)?),
        created: row.get(5)?,
    })
}

fn load_report(conn: &Connection, id: ReportId) -> Result<LogicalReport, ReconError> {
    conn.query_row(
        &format!("SELECT {REPORT_COLUMNS} FROM reports WHERE id = ?1"),
        [id.0],
        report_from_row,
    )
    .optional()
    .map_err(storage_err)?
    .ok_or(ReconError::ReportNotFound(id))
}

impl ReportStore for SqliteStore {
    fn create_report(&mut self, new: &NewReport) -> Result<LogicalReport, ReconError> {
        let now = Utc::now();
        let inserted = self.conn.execute(
            "INSERT INTO reports (name, type, date, status, is_manual, created, modified)
             VALUES (?1, ?2, ?3, 'OPEN', ?4, ?5, ?5)",
            params![new.name, new.report_type.code(), new.date, new.is_manual, now],
        );
        match inserted {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(ReconError::ConstraintViolation {
                    report_type: new.report_type,
                    date: new.date,
                });
            }
            Err(e) => return Err(storage_err(e)),
        }

        let report = load_report(&self.conn, ReportId(self.conn.last_insert_rowid()))?;
        log::info!("created report {} {report}", report.id);
        Ok(report)
    }

    fn report(&self, id: ReportId) -> Result<LogicalReport, ReconError> {
        load_report(&self.conn, id)
    }

    fn reports(&self) -> Result<Vec<LogicalReport>, ReconError> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {REPORT_COLUMNS} FROM reports ORDER BY date DESC, id DESC"
            ))
            .map_err(storage_err)?;
        let rows = stmt.query_map([], report_from_row).map_err(storage_err)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(storage_err)
    }

    fn reports_for(&self, report_type: ReportType, date: NaiveDate) -> Result<Vec<LogicalReport>, ReconError> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {REPORT_COLUMNS} FROM reports WHERE type = ?1 AND date = ?2 ORDER BY id"
            ))
            .map_err(storage_err)?;
        let rows = stmt
            .query_map(params![report_type.code(), date], report_from_row)
            .map_err(storage_err)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(storage_err)
    }

    fn picks(&self, id: ReportId, source: Option<ItemSource>) -> Result<Vec<PickRecord>, ReconError> {
        load_report(&self.conn, id)?;
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {PICK_COLUMNS} FROM items
                 WHERE report_id = ?1 AND (?2 IS NULL OR source = ?2)
                 ORDER BY created DESC, id DESC"
            ))
            .map_err(storage_err)?;
        let rows = stmt
            .query_map(params![id.0, source.map(|s| s.code())], pick_from_row)
            .map_err(storage_err)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(storage_err)
    }

    fn append_picks(
        &mut self,
        id: ReportId,
        source: ItemSource,
        report_type: ReportType,
        pick_numbers: &[String],
    ) -> Result<usize, ReconError> {
        let tx = self.conn.transaction().map_err(storage_err)?;

        // The caller's status check may be stale by now.
        let report = load_report(&tx, id)?;
        if !report.status.is_open() {
            return Err(ReconError::InvalidTransition { report_id: id, status: report.status });
        }

        let created = Utc::now();
        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO items (pick_number, source, type, report_id, created)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                )
                .map_err(storage_err)?;
            for pick_number in pick_numbers {
                stmt.execute(params![pick_number, source.code(), report_type.code(), id.0, created])
                    .map_err(storage_err)?;
            }
        }
        tx.commit().map_err(storage_err)?;
        Ok(pick_numbers.len())
    }

    fn close_report(&mut self, id: ReportId) -> Result<LogicalReport, ReconError> {
        let tx = self.conn.transaction().map_err(storage_err)?;
        let mut report = load_report(&tx, id)?;
        report.close()?;
        report.modified = Utc::now();
        tx.execute(
            "UPDATE reports SET status = ?1, modified = ?2 WHERE id = ?3",
            params![report.status.code(), report.modified, id.0],
        )
        .map_err(storage_err)?;
        tx.commit().map_err(storage_err)?;
        log::info!("closed report {id}");
        Ok(report)
    }

    fn delete_report(&mut self, id: ReportId) -> Result<(), ReconError> {
        let deleted = self
            .conn
            .execute("DELETE FROM reports WHERE id = ?1", [id.0])
            .map_err(storage_err)?;
        if deleted == 0 {
            return Err(ReconError::ReportNotFound(id));
        }
        log::info!("deleted report {id}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pickrecon_recon::ReportStatus;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn store() -> SqliteStore {
        SqliteStore::open_in_memory().unwrap()
    }

    #[test]
    fn create_and_load() {
        let mut s = store();
        let created = s
            .create_report(&NewReport::manual("recount", ReportType::ShippedOrders, day(2)))
            .unwrap();
        let loaded = s.report(created.id).unwrap();
        assert_eq!(loaded.name, "recount");
        assert_eq!(loaded.report_type, ReportType::ShippedOrders);
        assert_eq!(loaded.date, day(2));
        assert_eq!(loaded.status, ReportStatus::Open);
        assert!(loaded.is_manual);
        assert_eq!(loaded.created, created.created);
    }

    #[test]
    fn unique_index_applies_to_automated_only() {
        let mut s = store();
        s.create_report(&NewReport::automated(ReportType::OpenOrders, day(1))).unwrap();
        let err = s
            .create_report(&NewReport::automated(ReportType::OpenOrders, day(1)))
            .unwrap_err();
        assert!(matches!(
            err,
            ReconError::ConstraintViolation { report_type: ReportType::OpenOrders, .. }
        ));

        s.create_report(&NewReport::manual("a", ReportType::OpenOrders, day(1))).unwrap();
        s.create_report(&NewReport::manual("b", ReportType::OpenOrders, day(1))).unwrap();
        s.create_report(&NewReport::automated(ReportType::ShippedOrders, day(1))).unwrap();
        assert_eq!(s.reports_for(ReportType::OpenOrders, day(1)).unwrap().len(), 3);
    }

    #[test]
    fn missing_report_is_not_found() {
        let mut s = store();
        assert!(matches!(s.report(ReportId(9)), Err(ReconError::ReportNotFound(ReportId(9)))));
        assert!(matches!(s.picks(ReportId(9), None), Err(ReconError::ReportNotFound(_))));
        assert!(matches!(s.delete_report(ReportId(9)), Err(ReconError::ReportNotFound(_))));
        assert!(matches!(s.close_report(ReportId(9)), Err(ReconError::ReportNotFound(_))));
    }

    #[test]
    fn reports_newest_date_first() {
        let mut s = store();
        for d in [4, 12, 7] {
            s.create_report(&NewReport::automated(ReportType::OpenOrders, day(d))).unwrap();
        }
        let dates: Vec<_> = s.reports().unwrap().into_iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![day(12), day(7), day(4)]);
    }

    #[test]
    fn picks_round_trip_newest_first() {
        let mut s = store();
        let r = s.create_report(&NewReport::automated(ReportType::OpenOrders, day(1))).unwrap();
        s.append_picks(r.id, ItemSource::FullCircle, ReportType::OpenOrders, &["A".into(), "B".into()])
            .unwrap();
        s.append_picks(r.id, ItemSource::Wms, ReportType::OpenOrders, &["C".into()]).unwrap();

        let all = s.picks(r.id, None).unwrap();
        let numbers: Vec<_> = all.iter().map(|p| p.pick_number.as_str()).collect();
        assert_eq!(numbers, vec!["C", "B", "A"]);
        assert_eq!(all[0].source, ItemSource::Wms);
        assert_eq!(all[0].report_id, r.id);

        let fc = s.picks(r.id, Some(ItemSource::FullCircle)).unwrap();
        assert_eq!(fc.len(), 2);
        assert!(fc.iter().all(|p| p.source == ItemSource::FullCircle));
    }

    #[test]
    fn close_blocks_appends_and_second_close() {
        let mut s = store();
        let r = s.create_report(&NewReport::automated(ReportType::OpenOrders, day(1))).unwrap();
        let closed = s.close_report(r.id).unwrap();
        assert_eq!(closed.status, ReportStatus::Closed);
        assert_eq!(s.report(r.id).unwrap().status, ReportStatus::Closed);

        assert!(matches!(s.close_report(r.id), Err(ReconError::InvalidTransition { .. })));
        assert!(matches!(
            s.append_picks(r.id, ItemSource::Wms, ReportType::OpenOrders, &["1".into()]),
            Err(ReconError::InvalidTransition { .. })
        ));
        assert!(s.picks(r.id, None).unwrap().is_empty());
    }

    #[test]
    fn delete_cascades() {
        let mut s = store();
        let gone = s.create_report(&NewReport::automated(ReportType::OpenOrders, day(1))).unwrap();
        let kept = s.create_report(&NewReport::automated(ReportType::OpenOrders, day(2))).unwrap();
        s.append_picks(gone.id, ItemSource::Wms, ReportType::OpenOrders, &["1".into(), "2".into()])
            .unwrap();
        s.append_picks(kept.id, ItemSource::Wms, ReportType::OpenOrders, &["3".into()]).unwrap();

        s.delete_report(gone.id).unwrap();
        let orphans: i64 = s
            .conn
            .query_row("SELECT COUNT(*) FROM items WHERE report_id = ?1", [gone.id.0], |r| r.get(0))
            .unwrap();
        assert_eq!(orphans, 0);
        assert_eq!(s.picks(kept.id, None).unwrap().len(), 1);

        // The freed (type, date) key can be reused.
        s.create_report(&NewReport::automated(ReportType::OpenOrders, day(1))).unwrap();
    }

    #[test]
    fn corrupt_code_is_a_storage_error() {
        let mut s = store();
        let r = s.create_report(&NewReport::automated(ReportType::OpenOrders, day(1))).unwrap();
        s.conn
            .execute_batch("PRAGMA ignore_check_constraints = ON")
            .unwrap();
        s.conn
            .execute("UPDATE reports SET status = 'ARCHIVED' WHERE id = ?1", [r.id.0])
            .unwrap();
        let err = s.report(r.id).unwrap_err();
        assert!(matches!(err, ReconError::Storage(_)));
        assert!(err.to_string().contains("ARCHIVED"));
    }

    #[test]
    fn reopen_file_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("recon.db");
        let id = {
            let mut s = SqliteStore::open(&path).unwrap();
            let r = s.create_report(&NewReport::automated(ReportType::ShippedOrders, day(5))).unwrap();
            s.append_picks(r.id, ItemSource::Wms, ReportType::ShippedOrders, &["9".into()]).unwrap();
            r.id
        };

        let s = SqliteStore::open(&path).unwrap();
        assert_eq!(s.report(id).unwrap().date, day(5));
        assert_eq!(s.picks(id, None).unwrap()[0].pick_number, "9");
    }
}
