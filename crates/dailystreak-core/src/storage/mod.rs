mod config;
pub mod database;
mod task_store;

pub use config::{AnalyticsConfig, CalendarConfig, Config, StreakConfig};
pub use database::SqliteTaskStore;
pub use task_store::{StoredTask, TaskStore};

use std::path::PathBuf;

use crate::error::Result;

/// Returns the data directory, creating it if needed.
///
/// `DAILYSTREAK_HOME` overrides the location outright. Otherwise this is
/// `~/.config/dailystreak[-dev]/`, with the `-dev` suffix when
/// `DAILYSTREAK_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("DAILYSTREAK_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env =
                std::env::var("DAILYSTREAK_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("dailystreak-dev")
            } else {
                base_dir.join("dailystreak")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
