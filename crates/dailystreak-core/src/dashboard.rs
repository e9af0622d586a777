//! Recompute-on-notify progress view.
//!
//! The engine itself keeps no memory of what was last shown. A `Dashboard`
//! owns the last tier it reported so that a refresh after a check-in can say
//! whether the level went up.

use serde::Serialize;
use tracing::info;

use crate::challenges::{default_catalog, evaluate_challenges, Challenge, ChallengeResult};
use crate::date_window::DateWindow;
use crate::stats::{aggregate, AggregateReport};
use crate::storage::Config;
use crate::streak::{TierCatalog, TierChange};
use crate::task::Task;

/// One refresh worth of derived state.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub report: AggregateReport,
    pub challenges: Vec<ChallengeResult>,
    pub tier_change: TierChange,
}

impl DashboardView {
    pub fn is_tier_up(&self) -> bool {
        self.tier_change.is_tier_up()
    }
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    window_days: usize,
    tiers: TierCatalog,
    challenges: Vec<Challenge>,
    previous_tier: Option<String>,
}

impl Dashboard {
    pub fn new(window_days: usize, tiers: TierCatalog) -> Self {
        Self {
            window_days,
            tiers,
            challenges: default_catalog(),
            previous_tier: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.analytics.window_days, config.tier_catalog())
    }

    pub fn with_challenges(mut self, challenges: Vec<Challenge>) -> Self {
        self.challenges = challenges;
        self
    }

    pub fn previous_tier(&self) -> Option<&str> {
        self.previous_tier.as_deref()
    }

    /// Recompute everything from `tasks` and remember the resulting tier.
    pub fn refresh(&mut self, tasks: &[Task], window: &DateWindow) -> DashboardView {
        let report = aggregate(tasks, window, self.window_days, &self.tiers);
        let challenges = evaluate_challenges(&self.challenges, tasks);
        let tier_change = self.tiers.change(self.previous_tier.as_deref(), &report.level);

        if tier_change.is_tier_up() {
            info!(
                from = self.previous_tier.as_deref().unwrap_or("-"),
                to = %report.level.name,
                "tier up"
            );
        }
        self.previous_tier = Some(report.level.name.clone());

        DashboardView {
            report,
            challenges,
            tier_change,
        }
    }
}
