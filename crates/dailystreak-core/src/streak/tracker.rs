//! Consecutive-day streak tracking.
//!
//! Continuity is decided only by the recorded `last_check_in`: a check-in on
//! the day right after it extends the streak, anything else starts over at 1.
//! The completion set is never scanned for gaps.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::date_window::{CalendarDay, DateWindow};
use crate::task::{StreakState, Task};

/// Whether a check-in changed the task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CheckInStatus {
    /// `day` was added to the history and the streak updated
    Recorded,
    /// `day` was already in the history; nothing changed
    AlreadyCheckedIn,
}

/// Result of [`check_in`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckInOutcome {
    pub status: CheckInStatus,
    pub state: StreakState,
}

impl CheckInOutcome {
    pub fn is_recorded(&self) -> bool {
        self.status == CheckInStatus::Recorded
    }
}

/// Record a check-in for `day` on `task`.
///
/// Idempotent per day: a second call for the same day returns the current
/// state untouched.
pub fn check_in(task: &mut Task, day: CalendarDay) -> CheckInOutcome {
    if task.completions.contains(&day) {
        debug!(task_id = %task.id, %day, "check-in already recorded");
        return CheckInOutcome {
            status: CheckInStatus::AlreadyCheckedIn,
            state: task.streak,
        };
    }

    let previous = task.streak;
    let yesterday = DateWindow::day_offset(day, 1);
    let count = match previous.last_check_in {
        Some(last) if last == yesterday => previous.count.saturating_add(1),
        _ => 1,
    };

    task.completions.insert(day);
    task.streak = StreakState {
        count,
        last_check_in: Some(day),
    };

    debug!(
        task_id = %task.id,
        %day,
        previous = previous.count,
        count,
        "streak updated"
    );

    CheckInOutcome {
        status: CheckInStatus::Recorded,
        state: task.streak,
    }
}

/// The streak as it stands on `today` without mutating anything.
///
/// A streak whose last check-in is older than yesterday has lapsed and reads
/// as 0. Check-ins dated after `today` are treated as lapsed too.
pub fn current_streak(state: &StreakState, today: CalendarDay) -> u32 {
    match state.last_check_in {
        Some(last) if last == today || last == DateWindow::day_offset(today, 1) => state.count,
        _ => 0,
    }
}
