use rusqlite::Connection;

use crate::error::TaskpadError;

pub fn run_migrations(conn: &Connection) -> Result<(), TaskpadError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS tasks (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT,
            category TEXT,
            due_date TEXT NOT NULL,
            reminder_date TEXT,
            status TEXT NOT NULL DEFAULT 'pending'
                CHECK (status IN ('pending', 'in-progress', 'completed')),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_tasks_created ON tasks(created_at);
        ",
    )?;
    Ok(())
}
