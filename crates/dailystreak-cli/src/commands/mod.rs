pub mod checkin;
pub mod config;
pub mod stats;
pub mod streaks;
pub mod task;
pub mod tiers;

use std::error::Error;

use dailystreak_core::{Config, SqliteTaskStore, StreakService, SystemClock};
use tracing::debug;

pub type CommandResult = Result<(), Box<dyn Error>>;

pub type Service = StreakService<SqliteTaskStore, SystemClock>;

/// Open the default store with the configured clock.
pub fn open_service() -> Result<(Config, Service), Box<dyn Error>> {
    let config = Config::load()?;
    let store = SqliteTaskStore::open()?;
    debug!(
        utc_offset_minutes = config.calendar.utc_offset_minutes,
        window_days = config.analytics.window_days,
        "task store opened"
    );
    let service = StreakService::new(store, config.clock());
    Ok((config, service))
}

pub fn print_json<T: serde::Serialize>(value: &T) -> CommandResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
