use std::fs;
use std::path::Path;

use rusqlite::Connection;

use crate::error::TaskpadError;

use super::migrations;

/// Open (or create) the database at `path` and bring the schema up to date.
pub fn open(path: &Path) -> Result<Connection, TaskpadError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| TaskpadError::database(e.to_string()))?;
        }
    }
    let conn = Connection::open(path)?;
    configure_connection(&conn)?;
    migrations::run_migrations(&conn)?;
    Ok(conn)
}

/// In-memory database with the full schema. Used by tests.
pub fn open_in_memory() -> Result<Connection, TaskpadError> {
    let conn = Connection::open_in_memory()?;
    configure_connection(&conn)?;
    migrations::run_migrations(&conn)?;
    Ok(conn)
}

fn configure_connection(conn: &Connection) -> Result<(), TaskpadError> {
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA busy_timeout=5000;",
    )?;
    Ok(())
}
