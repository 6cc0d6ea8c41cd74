use crate::errors::AppResult;
use crate::store::Store;
use chrono::Local;
use rusqlite::params;

/// Write an operation line into the `audit_log` table.
pub fn audit(store: &Store, operation: &str, target: &str, message: &str) -> AppResult<()> {
    let now = Local::now().to_rfc3339();

    let mut stmt = store.conn.prepare_cached(
        "INSERT INTO audit_log (date, operation, target, message)
         VALUES (?1, ?2, ?3, ?4)",
    )?;

    stmt.execute(params![now, operation, target, message])?;

    Ok(())
}

pub struct AuditRow {
    pub id: i64,
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

pub fn load_audit(store: &Store) -> AppResult<Vec<AuditRow>> {
    let mut stmt = store.conn.prepare_cached(
        "SELECT id, date, operation, target, message FROM audit_log ORDER BY id ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(AuditRow {
            id: row.get(0)?,
            date: row.get(1)?,
            operation: row.get(2)?,
            target: row.get(3)?,
            message: row.get(4)?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
