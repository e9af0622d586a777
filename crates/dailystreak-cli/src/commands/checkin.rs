//! `checkin` command: record today's check-in and report the streak.

use std::sync::{Arc, Mutex};

use dailystreak_core::{CalendarDay, CheckInStatus, Dashboard, DashboardView, Task};
use serde::Serialize;

use super::{open_service, print_json, CommandResult};

#[derive(Serialize)]
struct CheckInReport {
    task_id: String,
    status: CheckInStatus,
    count: u32,
    last_check_in: Option<CalendarDay>,
    /// Tier of this task's streak
    tier: String,
    /// Tier of the best streak across all tasks
    level: String,
    tier_up: bool,
}

pub fn run(id: &str) -> CommandResult {
    let (config, mut service) = open_service()?;
    let window = service.window();

    let mut dashboard = Dashboard::from_config(&config);
    let baseline = dashboard.refresh(&service.list_tasks()?, &window);

    // Refreshed after the write commits, from the snapshot the service hands out.
    let latest: Arc<Mutex<Option<DashboardView>>> = Arc::new(Mutex::new(None));
    let slot = Arc::clone(&latest);
    let dashboard = Mutex::new(dashboard);
    service.subscribe(Box::new(move |tasks: &[Task]| {
        if let (Ok(mut dashboard), Ok(mut slot)) = (dashboard.lock(), slot.lock()) {
            *slot = Some(dashboard.refresh(tasks, &window));
        }
    }));

    let outcome = service.check_in_on(id, &window)?;

    let refreshed = latest.lock().ok().and_then(|mut view| view.take());
    let (level, tier_up) = match refreshed {
        Some(view) => (view.report.level.name.clone(), view.is_tier_up()),
        None => (baseline.report.level.name, false),
    };

    print_json(&CheckInReport {
        task_id: id.to_string(),
        status: outcome.status,
        count: outcome.state.count,
        last_check_in: outcome.state.last_check_in,
        tier: config.tier_catalog().classify(outcome.state.count).name.clone(),
        level,
        tier_up,
    })
}
