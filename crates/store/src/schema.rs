// Database schema and migrations

use rusqlite::Connection;

pub const SCHEMA_VERSION: i32 = 1;

const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS reports (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL DEFAULT '',
    type TEXT NOT NULL CHECK (type IN ('OPEN', 'SHIPPED')),
    date TEXT NOT NULL,                 -- YYYY-MM-DD
    status TEXT NOT NULL DEFAULT 'OPEN' CHECK (status IN ('OPEN', 'CLOSED')),
    is_manual INTEGER NOT NULL DEFAULT 0,
    created TEXT NOT NULL,
    modified TEXT NOT NULL
);

-- One automated report per (type, date). Manual reports are exempt.
CREATE UNIQUE INDEX IF NOT EXISTS reports_unique_type_date_automated
    ON reports (type, date) WHERE is_manual = 0;

CREATE TABLE IF NOT EXISTS items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    pick_number TEXT NOT NULL,
    source TEXT NOT NULL CHECK (source IN ('FULL_CIRCLE', 'WMS')),
    type TEXT NOT NULL CHECK (type IN ('OPEN', 'SHIPPED')),
    report_id INTEGER NOT NULL REFERENCES reports (id) ON DELETE CASCADE,
    created TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS items_report_source ON items (report_id, source);
"#;

/// Bring the schema up to [`SCHEMA_VERSION`], tracked in `PRAGMA user_version`.
pub fn migrate(conn: &Connection) -> Result<(), String> {
    let version: i32 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| e.to_string())?;

    if version > SCHEMA_VERSION {
        return Err(format!(
            "database schema version {version} is newer than supported version {SCHEMA_VERSION}"
        ));
    }
    if version < 1 {
        conn.execute_batch(SCHEMA_V1).map_err(|e| e.to_string())?;
        log::info!("initialized schema version 1");
    }
    conn.pragma_update(None, "user_version", SCHEMA_VERSION)
        .map_err(|e| e.to_string())?;
    Ok(())
}
