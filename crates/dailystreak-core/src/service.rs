//! Check-ins and task edits bound to a store and a clock.
//!
//! The service is the only place that writes streak state. A check-in reads
//! the task with its revision, computes the new state on a copy, and commits
//! it with a conditional write. Subscribers see a fresh snapshot only after a
//! write has committed.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::date_window::{Clock, DateWindow};
use crate::error::{Result, StoreError};
use crate::storage::TaskStore;
use crate::streak::{self, CheckInOutcome};
use crate::task::{NewTask, Task, TaskPatch};

/// Callback invoked with the full task collection after every write.
pub type Subscriber = Box<dyn Fn(&[Task]) + Send + Sync>;

pub struct StreakService<S, C> {
    store: S,
    clock: C,
    subscribers: Vec<Subscriber>,
}

impl<S: TaskStore, C: Clock> StreakService<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            subscribers: Vec::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Window anchored at the clock's current day.
    pub fn window(&self) -> DateWindow {
        DateWindow::from_clock(&self.clock)
    }

    /// Register a callback for committed writes.
    pub fn subscribe(&mut self, subscriber: Subscriber) {
        self.subscribers.push(subscriber);
    }

    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        self.store.list_tasks()
    }

    /// Fetch one task, failing with `StoreError::NotFound` if it is missing.
    pub fn get_task(&self, id: &str) -> Result<Task> {
        self.store
            .get_task(id)?
            .map(|stored| stored.task)
            .ok_or_else(|| StoreError::NotFound(id.to_string()).into())
    }

    pub fn create_task(&self, new_task: NewTask) -> Result<Task> {
        let task = new_task.into_task(Utc::now())?;
        self.store.create_task(&task)?;
        self.notify();
        Ok(task)
    }

    pub fn update_task(&self, id: &str, patch: TaskPatch) -> Result<Task> {
        let task = self.store.update_task(id, patch)?;
        self.notify();
        Ok(task)
    }

    /// Delete a task and its completion history.
    pub fn delete_task(&self, id: &str) -> Result<()> {
        if !self.store.delete_task(id)? {
            return Err(StoreError::NotFound(id.to_string()).into());
        }
        self.notify();
        Ok(())
    }

    /// Check `id` in for today.
    ///
    /// Repeating a check-in on the same day is a no-op and writes nothing.
    /// Otherwise the new state is returned only after the store accepted it.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown id and
    /// `StoreError::Conflict` if another writer changed the task between the
    /// read and the write. Conflicts are not retried.
    pub fn check_in(&self, id: &str) -> Result<CheckInOutcome> {
        self.check_in_on(id, &self.window())
    }

    /// Check `id` in for `window.today()` instead of sampling the clock.
    pub fn check_in_on(&self, id: &str, window: &DateWindow) -> Result<CheckInOutcome> {
        let today = window.today();
        let Some(stored) = self.store.get_task(id)? else {
            return Err(StoreError::NotFound(id.to_string()).into());
        };

        let mut task = stored.task;
        let outcome = streak::check_in(&mut task, today);
        if !outcome.is_recorded() {
            return Ok(outcome);
        }

        let revision =
            self.store
                .record_check_in(id, stored.revision, &task.completions, &task.streak)?;
        info!(
            task_id = id,
            %today,
            count = outcome.state.count,
            revision,
            "check-in committed"
        );
        self.notify();
        Ok(outcome)
    }

    fn notify(&self) {
        if self.subscribers.is_empty() {
            return;
        }
        match self.store.list_tasks() {
            Ok(tasks) => {
                debug!(subscribers = self.subscribers.len(), tasks = tasks.len(), "notifying");
                for subscriber in &self.subscribers {
                    subscriber(&tasks);
                }
            }
            Err(e) => warn!(error = %e, "could not load snapshot for subscribers"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date_window::{CalendarDay, FixedClock};
    use crate::error::CoreError;
    use crate::storage::SqliteTaskStore;
    use crate::streak::CheckInStatus;
    use crate::task::Recurrence;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn day(s: &str) -> CalendarDay {
        s.parse().unwrap()
    }

    fn service_at(today: &str) -> StreakService<SqliteTaskStore, FixedClock> {
        StreakService::new(SqliteTaskStore::open_memory().unwrap(), FixedClock(day(today)))
    }

    #[test]
    fn first_check_in_starts_streak() {
        let service = service_at("2026-10-18");
        let task = service.create_task(NewTask::new("Meditate")).unwrap();

        let outcome = service.check_in(&task.id).unwrap();
        assert_eq!(outcome.status, CheckInStatus::Recorded);
        assert_eq!(outcome.state.count, 1);
        assert_eq!(outcome.state.last_check_in, Some(day("2026-10-18")));

        let stored = service.store().get_task(&task.id).unwrap().unwrap();
        assert_eq!(stored.revision, 1);
        assert!(stored.task.is_done_on(day("2026-10-18")));
    }

    #[test]
    fn check_in_on_uses_the_given_window() {
        let service = service_at("2026-10-18");
        let task = service.create_task(NewTask::new("Meditate")).unwrap();

        let sampled = DateWindow::anchored_at(day("2026-10-17"));
        let outcome = service.check_in_on(&task.id, &sampled).unwrap();
        assert_eq!(outcome.state.last_check_in, Some(day("2026-10-17")));

        let stored = service.store().get_task(&task.id).unwrap().unwrap();
        assert!(stored.task.is_done_on(day("2026-10-17")));
        assert!(!stored.task.is_done_on(day("2026-10-18")));
    }

    #[test]
    fn repeat_check_in_writes_nothing() {
        let service = service_at("2026-10-18");
        let task = service.create_task(NewTask::new("Meditate")).unwrap();
        service.check_in(&task.id).unwrap();

        let again = service.check_in(&task.id).unwrap();
        assert_eq!(again.status, CheckInStatus::AlreadyCheckedIn);
        assert_eq!(again.state.count, 1);
        assert_eq!(service.store().get_task(&task.id).unwrap().unwrap().revision, 1);
    }

    #[test]
    fn consecutive_days_extend_streak() {
        let store = SqliteTaskStore::open_memory().unwrap();
        let task = NewTask::new("Run")
            .with_recurrence([Recurrence::Daily])
            .into_task(Utc::now())
            .unwrap();
        store.create_task(&task).unwrap();

        let service = StreakService::new(store, FixedClock(day("2026-10-17")));
        service.check_in(&task.id).unwrap();
        let service = StreakService::new(service.store, FixedClock(day("2026-10-18")));
        let outcome = service.check_in(&task.id).unwrap();
        assert_eq!(outcome.state.count, 2);
    }

    #[test]
    fn check_in_unknown_task_is_not_found() {
        let service = service_at("2026-10-18");
        let err = service.check_in("missing").unwrap_err();
        assert!(matches!(err, CoreError::Store(StoreError::NotFound(_))));
    }

    #[test]
    fn subscribers_see_committed_writes() {
        let mut service = service_at("2026-10-18");
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        service.subscribe(Box::new(move |tasks: &[Task]| {
            seen.fetch_add(1, Ordering::SeqCst);
            assert_eq!(tasks.len(), 1);
        }));

        let task = service.create_task(NewTask::new("Read")).unwrap();
        service.check_in(&task.id).unwrap();
        service.check_in(&task.id).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn delete_missing_task_fails() {
        let service = service_at("2026-10-18");
        let err = service.delete_task("missing").unwrap_err();
        assert!(matches!(err, CoreError::Store(StoreError::NotFound(_))));
    }

    #[test]
    fn create_rejects_blank_title() {
        let service = service_at("2026-10-18");
        assert!(matches!(
            service.create_task(NewTask::new("   ")),
            Err(CoreError::Validation(_))
        ));
        assert!(service.list_tasks().unwrap().is_empty());
    }
}
