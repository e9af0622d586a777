use dailystreak_core::stats::TopStreak;
use dailystreak_core::streak::current_streak;
use dailystreak_core::{ChallengeResult, Dashboard, Tier};
use serde::Serialize;

use super::{open_service, print_json, CommandResult};

#[derive(Serialize)]
struct StreaksReport {
    top_streak_task: TopStreak,
    total_streak: u64,
    level: Tier,
    /// Percent of the way through the current level
    level_progress: u8,
    challenges: Vec<ChallengeResult>,
    /// Per-task streak as of today; lapsed streaks read 0
    current: Vec<CurrentStreak>,
}

#[derive(Serialize)]
struct CurrentStreak {
    task_id: String,
    title: String,
    count: u32,
}

pub fn run() -> CommandResult {
    let (config, service) = open_service()?;
    let tasks = service.list_tasks()?;
    let window = service.window();
    let mut dashboard = Dashboard::from_config(&config);
    let view = dashboard.refresh(&tasks, &window);
    let report = view.report;

    let current = tasks
        .into_iter()
        .map(|task| CurrentStreak {
            count: current_streak(&task.streak, window.today()),
            task_id: task.id,
            title: task.title,
        })
        .collect();

    print_json(&StreaksReport {
        level_progress: report.level.progress_percent(report.top_streak_task.count),
        top_streak_task: report.top_streak_task,
        total_streak: report.total_streak,
        level: report.level,
        challenges: view.challenges,
        current,
    })
}
