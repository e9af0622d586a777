//! # dailystreak core library
//!
//! Streak and progress engine for a daily habit tracker. Every operation is
//! available through the standalone `dailystreak` CLI, which is a thin layer
//! over this crate.
//!
//! ## Architecture
//!
//! - **Date window**: calendar-day arithmetic anchored to a single "today"
//!   sampled per operation
//! - **Streak engine**: consecutive-day check-ins and tier classification
//! - **Challenges**: progress against a catalog of goals
//! - **Stats**: windowed aggregation (heatmap, histogram, weekly growth)
//! - **Storage**: SQLite task store with conditional check-in writes and
//!   TOML-based configuration
//!
//! ## Key Components
//!
//! - [`StreakService`]: check-ins against a [`TaskStore`], with change
//!   notification
//! - [`Dashboard`]: recompute-on-notify view with tier-up detection
//! - [`aggregate`]: the statistics fold
//! - [`Config`]: Application configuration management

pub mod challenges;
pub mod dashboard;
pub mod date_window;
pub mod error;
pub mod service;
pub mod stats;
pub mod storage;
pub mod streak;
pub mod task;

pub use challenges::{evaluate_challenges, Challenge, ChallengeKind, ChallengeResult};
pub use dashboard::{Dashboard, DashboardView};
pub use date_window::{CalendarDay, Clock, DateWindow, FixedClock, SystemClock};
pub use error::{ConfigError, CoreError, StoreError, ValidationError};
pub use service::StreakService;
pub use stats::{aggregate, AggregateReport};
pub use storage::{Config, SqliteTaskStore, StoredTask, TaskStore};
pub use streak::{CheckInOutcome, CheckInStatus, Tier, TierCatalog, TierChange};
pub use task::{NewTask, Recurrence, StreakState, Task, TaskPatch};
