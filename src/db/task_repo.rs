use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection};
use ulid::Ulid;

use crate::error::TaskpadError;
use crate::models::{NewTask, Task, TaskPatch, TaskStatus};

const TASK_COLUMNS: &str = "id, name, description, category, due_date, reminder_date,
                status, created_at, updated_at";

pub fn create_task(conn: &Connection, new: &NewTask) -> Result<Task, TaskpadError> {
    let id = Ulid::new().to_string();
    let now = Utc::now();
    conn.execute(
        "INSERT INTO tasks (id, name, description, category, due_date, reminder_date,
                            status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            id,
            new.name,
            new.description,
            new.category,
            ts_to_db(&new.due_date),
            new.reminder_date.as_ref().map(ts_to_db),
            TaskStatus::Pending.as_str(),
            ts_to_db(&now),
            ts_to_db(&now),
        ],
    )?;
    get_task_by_id(conn, &id)
}

pub fn get_task_by_id(conn: &Connection, id: &str) -> Result<Task, TaskpadError> {
    conn.query_row(
        &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
        params![id],
        row_to_task,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => TaskpadError::task_not_found(id),
        _ => TaskpadError::from(e),
    })
}

/// All tasks, most recently created first. Ties on `created_at` fall back to
/// insertion order so the newest row still sorts first.
pub fn list_tasks(conn: &Connection) -> Result<Vec<Task>, TaskpadError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks ORDER BY created_at DESC, rowid DESC"
    ))?;
    let tasks = stmt
        .query_map([], row_to_task)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tasks)
}

/// Merge `patch` over the stored row. Unset patch fields keep their stored
/// values; a patched status is normalized to its storage base first.
pub fn update_task(conn: &Connection, id: &str, patch: &TaskPatch) -> Result<Task, TaskpadError> {
    let current = get_task_by_id(conn, id)?;

    let name = patch.name.clone().unwrap_or(current.name);
    let description = patch.description.clone().or(current.description);
    let category = patch.category.clone().or(current.category);
    let due_date = patch.due_date.unwrap_or(current.due_date);
    let reminder_date = patch.reminder_date.or(current.reminder_date);
    let status = patch
        .status
        .map(|s| s.storage_base())
        .unwrap_or(current.status);
    let now = Utc::now();

    conn.execute(
        "UPDATE tasks SET name = ?1, description = ?2, category = ?3, due_date = ?4,
                          reminder_date = ?5, status = ?6, updated_at = ?7
         WHERE id = ?8",
        params![
            name,
            description,
            category,
            ts_to_db(&due_date),
            reminder_date.as_ref().map(ts_to_db),
            status.as_str(),
            ts_to_db(&now),
            id,
        ],
    )?;
    get_task_by_id(conn, id)
}

pub fn delete_task(conn: &Connection, id: &str) -> Result<(), TaskpadError> {
    let deleted = conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
    if deleted == 0 {
        return Err(TaskpadError::task_not_found(id));
    }
    Ok(())
}

pub fn set_status(conn: &Connection, id: &str, status: TaskStatus) -> Result<Task, TaskpadError> {
    let now = Utc::now();
    let changed = conn.execute(
        "UPDATE tasks SET status = ?1, updated_at = ?2 WHERE id = ?3",
        params![status.storage_base().as_str(), ts_to_db(&now), id],
    )?;
    if changed == 0 {
        return Err(TaskpadError::task_not_found(id));
    }
    get_task_by_id(conn, id)
}

fn ts_to_db(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn ts_from_db(idx: usize, s: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
    let status: String = row.get(6)?;
    Ok(Task {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        due_date: ts_from_db(4, row.get(4)?)?,
        reminder_date: row
            .get::<_, Option<String>>(5)?
            .map(|s| ts_from_db(5, s))
            .transpose()?,
        status: TaskStatus::from_str(&status).unwrap_or(TaskStatus::Pending),
        created_at: ts_from_db(7, row.get(7)?)?,
        updated_at: ts_from_db(8, row.get(8)?)?,
    })
}
