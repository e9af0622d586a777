//! Persistent task store interface.

use std::collections::BTreeSet;

use crate::date_window::CalendarDay;
use crate::error::Result;
use crate::task::{StreakState, Task, TaskPatch};

/// A task together with the store revision it was read at.
///
/// The revision is what conditional writes compare against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredTask {
    pub task: Task,
    pub revision: i64,
}

/// Storage backend for a user's tasks.
pub trait TaskStore {
    /// All tasks, oldest first (creation time, then id).
    fn list_tasks(&self) -> Result<Vec<Task>>;

    fn get_task(&self, id: &str) -> Result<Option<StoredTask>>;

    fn create_task(&self, task: &Task) -> Result<()>;

    /// Edit title, notes or recurrence. Fails with `StoreError::NotFound` for
    /// an unknown id.
    fn update_task(&self, id: &str, patch: TaskPatch) -> Result<Task>;

    /// Delete a task and its history. Returns whether a task was removed.
    fn delete_task(&self, id: &str) -> Result<bool>;

    /// Write completions and streak state only if the task is still at
    /// `expected_revision`. Returns the new revision, or
    /// `StoreError::Conflict` if the task changed in between.
    fn record_check_in(
        &self,
        id: &str,
        expected_revision: i64,
        completions: &BTreeSet<CalendarDay>,
        streak: &StreakState,
    ) -> Result<i64>;
}
