use crate::errors::AppResult;
use rusqlite::Connection;

/// Create the local store tables if they do not exist yet.
pub fn init_store(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS kv (
             key   TEXT PRIMARY KEY,
             value TEXT NOT NULL
         );
         CREATE TABLE IF NOT EXISTS audit_log (
             id        INTEGER PRIMARY KEY AUTOINCREMENT,
             date      TEXT NOT NULL,
             operation TEXT NOT NULL,
             target    TEXT NOT NULL DEFAULT '',
             message   TEXT NOT NULL DEFAULT ''
         );",
    )?;
    Ok(())
}
