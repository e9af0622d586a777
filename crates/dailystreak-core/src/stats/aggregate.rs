//! Windowed statistics over the whole task collection.
//!
//! Everything is recomputed from a snapshot: one pass over the tasks, one
//! pass over the window. Nothing is cached between calls.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::date_window::{CalendarDay, DateWindow};
use crate::streak::{Tier, TierCatalog};
use crate::task::Task;

/// Length of a weekly growth chunk.
const WEEK_DAYS: usize = 7;

/// Title reported when there is no task to show.
pub const NO_TASK_TITLE: &str = "-";

/// Tasks done today vs. still pending today.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TodaySplit {
    pub completed: usize,
    pub pending: usize,
}

/// Completion count for one day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayCount {
    pub date: CalendarDay,
    pub count: usize,
}

/// Histogram bar for one day, labelled `MM-DD`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistogramBar {
    pub label: String,
    pub tasks: usize,
}

/// Sum of daily counts for one chunk of up to seven days.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeekTotal {
    pub week: String,
    pub total: usize,
}

/// Total completions of one task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskTotal {
    pub task_id: String,
    pub title: String,
    pub completions: usize,
}

/// The task with the highest streak count.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopStreak {
    /// `None` when the collection is empty
    pub task_id: Option<String>,
    pub title: String,
    pub count: u32,
}

impl TopStreak {
    pub fn none() -> Self {
        Self {
            task_id: None,
            title: NO_TASK_TITLE.to_string(),
            count: 0,
        }
    }

    pub fn is_none(&self) -> bool {
        self.task_id.is_none()
    }
}

/// Everything the analytics views need, computed in one go.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AggregateReport {
    pub today: CalendarDay,
    pub window_days: usize,
    pub today_split: TodaySplit,
    pub heatmap: Vec<DayCount>,
    pub histogram: Vec<HistogramBar>,
    pub weekly_growth: Vec<WeekTotal>,
    pub per_task_totals: Vec<TaskTotal>,
    pub top_streak_task: TopStreak,
    /// Sum of every task's streak count
    pub total_streak: u64,
    /// Tier of the top streak count
    pub level: Tier,
}

impl AggregateReport {
    /// Sum of all heatmap counts.
    pub fn heatmap_total(&self) -> usize {
        self.heatmap.iter().map(|d| d.count).sum()
    }

    /// Largest single-day count, at least 1 so it can be used as a divisor.
    pub fn max_day_count(&self) -> usize {
        self.heatmap.iter().map(|d| d.count).max().unwrap_or(0).max(1)
    }
}

/// Fold the task collection into an [`AggregateReport`] over the last
/// `window_days` days (at least one).
pub fn aggregate(
    tasks: &[Task],
    window: &DateWindow,
    window_days: usize,
    tiers: &TierCatalog,
) -> AggregateReport {
    let today = window.today();
    let days = window.window(window_days);

    let mut split = TodaySplit::default();
    let mut per_day: HashMap<CalendarDay, usize> = HashMap::new();
    let mut per_task_totals = Vec::with_capacity(tasks.len());
    let mut top: Option<&Task> = None;
    let mut total_streak: u64 = 0;

    for task in tasks {
        if task.is_done_on(today) {
            split.completed += 1;
        } else {
            split.pending += 1;
        }

        for day in &task.completions {
            *per_day.entry(*day).or_insert(0) += 1;
        }

        per_task_totals.push(TaskTotal {
            task_id: task.id.clone(),
            title: task.title.clone(),
            completions: task.total_completions(),
        });

        total_streak += u64::from(task.streak.count);

        // Strictly greater: ties keep the first task seen.
        if top.map_or(true, |best| task.streak.count > best.streak.count) {
            top = Some(task);
        }
    }

    let heatmap: Vec<DayCount> = days
        .iter()
        .map(|day| DayCount {
            date: *day,
            count: per_day.get(day).copied().unwrap_or(0),
        })
        .collect();

    let histogram = heatmap
        .iter()
        .map(|d| HistogramBar {
            label: d.date.short_label(),
            tasks: d.count,
        })
        .collect();

    let weekly_growth = heatmap
        .chunks(WEEK_DAYS)
        .enumerate()
        .map(|(i, chunk)| WeekTotal {
            week: format!("Week {}", i + 1),
            total: chunk.iter().map(|d| d.count).sum(),
        })
        .collect();

    let top_streak_task = top
        .map(|task| TopStreak {
            task_id: Some(task.id.clone()),
            title: task.title.clone(),
            count: task.streak.count,
        })
        .unwrap_or_else(TopStreak::none);

    let level = tiers.classify(top_streak_task.count).clone();

    debug!(
        tasks = tasks.len(),
        window_days = heatmap.len(),
        %today,
        top_streak = top_streak_task.count,
        "aggregated task statistics"
    );

    AggregateReport {
        today,
        window_days: heatmap.len(),
        today_split: split,
        heatmap,
        histogram,
        weekly_growth,
        per_task_totals,
        top_streak_task,
        total_streak,
        level,
    }
}
