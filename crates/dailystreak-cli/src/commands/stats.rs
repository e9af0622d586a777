use clap::{Args, Subcommand};
use dailystreak_core::stats::heatmap::render_ascii;
use dailystreak_core::date_window::MAX_WINDOW_DAYS;
use dailystreak_core::{aggregate, ValidationError};

use super::{open_service, print_json, CommandResult};

#[derive(Args)]
pub struct StatsArgs {
    /// Window length in days (defaults to `analytics.window_days`)
    #[arg(long, global = true)]
    days: Option<usize>,

    #[command(subcommand)]
    view: Option<StatsView>,
}

#[derive(Subcommand)]
pub enum StatsView {
    /// Daily completion heatmap as text
    Heatmap,
}

pub fn run(args: StatsArgs) -> CommandResult {
    let (config, service) = open_service()?;
    let days = args.days.unwrap_or(config.analytics.window_days);
    if days == 0 || days > MAX_WINDOW_DAYS {
        return Err(ValidationError::InvalidWindow(days).into());
    }

    let tasks = service.list_tasks()?;
    let report = aggregate(&tasks, &service.window(), days, &config.tier_catalog());

    match args.view {
        None => print_json(&report)?,
        Some(StatsView::Heatmap) => print!("{}", render_ascii(&report)),
    }
    Ok(())
}
