//! Statistics module for dailystreak
//!
//! This module folds the task collection into the windowed analytics shown
//! by the dashboard: today's split, the completion heatmap and histogram,
//! weekly growth, per-task totals and the top streak.

pub mod aggregate;
pub mod heatmap;

pub use aggregate::{
    aggregate, AggregateReport, DayCount, HistogramBar, TaskTotal, TodaySplit, TopStreak,
    WeekTotal, NO_TASK_TITLE,
};
