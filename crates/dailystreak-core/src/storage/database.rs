//! SQLite-based task storage.
//!
//! One row per task. Recurrence tags and completion days are stored as JSON
//! arrays of strings; the streak is stored in two columns. Every check-in
//! write is conditioned on the row's `revision`, so two writers racing on
//! the same task cannot both apply a check-in computed from the same state.

use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, warn};

use super::data_dir;
use super::task_store::{StoredTask, TaskStore};
use crate::date_window::CalendarDay;
use crate::error::{Result, StoreError};
use crate::task::{Recurrence, StreakState, Task, TaskPatch};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const TASK_COLUMNS: &str = "id, title, notes, recurrence, completions, streak_count, \
                            last_check_in, created_at, updated_at, revision";

/// SQLite task store.
pub struct SqliteTaskStore {
    conn: Connection,
}

impl SqliteTaskStore {
    /// Open the store at `<data dir>/dailystreak.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("dailystreak.db");
        Self::open_at(&path)
    }

    /// Open the store at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory store.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS tasks (
                id            TEXT PRIMARY KEY,
                title         TEXT NOT NULL,
                notes         TEXT,
                recurrence    TEXT NOT NULL DEFAULT '[]',
                completions   TEXT NOT NULL DEFAULT '[]',
                streak_count  INTEGER NOT NULL DEFAULT 0,
                last_check_in TEXT,
                created_at    TEXT NOT NULL,
                updated_at    TEXT NOT NULL,
                revision      INTEGER NOT NULL DEFAULT 0
            );

            CREATE INDEX IF NOT EXISTS idx_tasks_created_at ON tasks(created_at);",
        )?;
        Ok(())
    }

    fn row_to_stored(row: &rusqlite::Row) -> rusqlite::Result<StoredTask> {
        let id: String = row.get(0)?;
        let recurrence_json: String = row.get(3)?;
        let completions_json: String = row.get(4)?;
        let streak_count: i64 = row.get(5)?;
        let last_check_in: Option<String> = row.get(6)?;
        let created_at: String = row.get(7)?;
        let updated_at: String = row.get(8)?;

        let task = Task {
            recurrence: parse_recurrence(&id, &recurrence_json),
            completions: parse_completions(&id, &completions_json),
            streak: StreakState {
                count: u32::try_from(streak_count.max(0)).unwrap_or(u32::MAX),
                last_check_in: last_check_in.and_then(|raw| parse_day(&id, &raw)),
            },
            created_at: parse_datetime_fallback(&created_at),
            updated_at: parse_datetime_fallback(&updated_at),
            title: row.get(1)?,
            notes: row.get(2)?,
            id,
        };
        Ok(StoredTask {
            task,
            revision: row.get(9)?,
        })
    }
}

impl TaskStore for SqliteTaskStore {
    fn list_tasks(&self) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks ORDER BY created_at ASC, id ASC"
        ))?;
        let rows = stmt.query_map([], Self::row_to_stored)?;

        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?.task);
        }
        Ok(tasks)
    }

    fn get_task(&self, id: &str) -> Result<Option<StoredTask>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"))?;
        let stored = stmt.query_row(params![id], Self::row_to_stored).optional()?;
        Ok(stored)
    }

    fn create_task(&self, task: &Task) -> Result<()> {
        self.conn.execute(
            "INSERT INTO tasks (id, title, notes, recurrence, completions, streak_count,
                                last_check_in, created_at, updated_at, revision)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 0)",
            params![
                task.id,
                task.title,
                task.notes,
                serde_json::to_string(&task.recurrence)?,
                serde_json::to_string(&task.completions)?,
                i64::from(task.streak.count),
                task.streak.last_check_in.map(|d| d.to_string()),
                task.created_at.to_rfc3339(),
                task.updated_at.to_rfc3339(),
            ],
        )?;
        debug!(task_id = %task.id, title = %task.title, "task created");
        Ok(())
    }

    fn update_task(&self, id: &str, patch: TaskPatch) -> Result<Task> {
        let Some(StoredTask { mut task, .. }) = self.get_task(id)? else {
            return Err(StoreError::NotFound(id.to_string()).into());
        };
        patch.apply(&mut task, Utc::now())?;

        self.conn.execute(
            "UPDATE tasks SET title = ?2, notes = ?3, recurrence = ?4, updated_at = ?5
             WHERE id = ?1",
            params![
                id,
                task.title,
                task.notes,
                serde_json::to_string(&task.recurrence)?,
                task.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(task)
    }

    fn delete_task(&self, id: &str) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }

    fn record_check_in(
        &self,
        id: &str,
        expected_revision: i64,
        completions: &BTreeSet<CalendarDay>,
        streak: &StreakState,
    ) -> Result<i64> {
        let changed = self.conn.execute(
            "UPDATE tasks
             SET completions = ?3, streak_count = ?4, last_check_in = ?5,
                 updated_at = ?6, revision = revision + 1
             WHERE id = ?1 AND revision = ?2",
            params![
                id,
                expected_revision,
                serde_json::to_string(completions)?,
                i64::from(streak.count),
                streak.last_check_in.map(|d| d.to_string()),
                Utc::now().to_rfc3339(),
            ],
        )?;

        if changed == 0 {
            let exists: Option<i64> = self
                .conn
                .query_row("SELECT revision FROM tasks WHERE id = ?1", params![id], |row| {
                    row.get(0)
                })
                .optional()?;
            return Err(match exists {
                Some(_) => StoreError::Conflict {
                    task_id: id.to_string(),
                    expected: expected_revision,
                },
                None => StoreError::NotFound(id.to_string()),
            }
            .into());
        }
        Ok(expected_revision + 1)
    }
}

fn parse_day(task_id: &str, raw: &str) -> Option<CalendarDay> {
    match raw.parse() {
        Ok(day) => Some(day),
        Err(e) => {
            warn!(task_id, value = raw, error = %e, "skipping malformed calendar day");
            None
        }
    }
}

fn parse_completions(task_id: &str, json: &str) -> BTreeSet<CalendarDay> {
    match serde_json::from_str::<Vec<String>>(json) {
        Ok(raw) => raw.iter().filter_map(|d| parse_day(task_id, d)).collect(),
        Err(e) => {
            warn!(
                task_id,
                error = %e,
                "completions column is not a string array; treating as empty"
            );
            BTreeSet::new()
        }
    }
}

fn parse_recurrence(task_id: &str, json: &str) -> BTreeSet<Recurrence> {
    match serde_json::from_str::<Vec<String>>(json) {
        Ok(raw) => raw
            .iter()
            .filter_map(|tag| match tag.parse() {
                Ok(r) => Some(r),
                Err(e) => {
                    warn!(task_id, error = %e, "skipping unknown recurrence tag");
                    None
                }
            })
            .collect(),
        Err(e) => {
            warn!(
                task_id,
                error = %e,
                "recurrence column is not a string array; treating as empty"
            );
            BTreeSet::new()
        }
    }
}

/// Parse datetime from RFC3339 string with fallback to current time
fn parse_datetime_fallback(dt_str: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
