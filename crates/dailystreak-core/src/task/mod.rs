//! Task records tracked by dailystreak.
//!
//! A task carries its full check-in history (`completions`) and a cached
//! [`StreakState`] that is only ever changed by a check-in.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::date_window::CalendarDay;
use crate::error::ValidationError;

/// Recurrence tag of a task. Purely descriptive; the engine does not
/// schedule by it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    Daily,
    Weekly,
    Monthly,
}

impl Recurrence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recurrence::Daily => "daily",
            Recurrence::Weekly => "weekly",
            Recurrence::Monthly => "monthly",
        }
    }

    /// Parse a comma-separated tag list such as `"daily, weekly"`.
    pub fn parse_list(raw: &str) -> Result<BTreeSet<Recurrence>, ValidationError> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Recurrence {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Recurrence::Daily),
            "weekly" => Ok(Recurrence::Weekly),
            "monthly" => Ok(Recurrence::Monthly),
            other => Err(ValidationError::InvalidRecurrence(other.to_string())),
        }
    }
}

/// Cached streak of a task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct StreakState {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub last_check_in: Option<CalendarDay>,
}

/// A tracked task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub recurrence: BTreeSet<Recurrence>,
    #[serde(default)]
    pub completions: BTreeSet<CalendarDay>,
    #[serde(default)]
    pub streak: StreakState,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Whether the task has a check-in recorded for `day`.
    pub fn is_done_on(&self, day: CalendarDay) -> bool {
        self.completions.contains(&day)
    }

    pub fn total_completions(&self) -> usize {
        self.completions.len()
    }
}

/// Input for creating a task.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub notes: Option<String>,
    pub recurrence: BTreeSet<Recurrence>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_recurrence(mut self, recurrence: impl IntoIterator<Item = Recurrence>) -> Self {
        self.recurrence = recurrence.into_iter().collect();
        self
    }

    /// Validate and turn into a fresh task with empty history.
    pub fn into_task(self, now: DateTime<Utc>) -> Result<Task, ValidationError> {
        let title = validate_title(&self.title)?;
        Ok(Task {
            id: Uuid::new_v4().to_string(),
            title,
            notes: normalize_notes(self.notes),
            recurrence: self.recurrence,
            completions: BTreeSet::new(),
            streak: StreakState::default(),
            created_at: now,
            updated_at: now,
        })
    }
}

/// Metadata edit. History and streak state are never touched.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    /// `Some(None)` clears the notes.
    pub notes: Option<Option<String>>,
    pub recurrence: Option<BTreeSet<Recurrence>>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.notes.is_none() && self.recurrence.is_none()
    }

    pub fn apply(self, task: &mut Task, now: DateTime<Utc>) -> Result<(), ValidationError> {
        if let Some(title) = self.title {
            task.title = validate_title(&title)?;
        }
        if let Some(notes) = self.notes {
            task.notes = normalize_notes(notes);
        }
        if let Some(recurrence) = self.recurrence {
            task.recurrence = recurrence;
        }
        task.updated_at = now;
        Ok(())
    }
}

fn validate_title(raw: &str) -> Result<String, ValidationError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(title.to_string())
}

fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
}
