//! Challenge catalog and progress evaluation.
//!
//! Challenges are read-only catalog entries. Progress and completion are
//! derived from the task collection on every evaluation and never stored.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::task::Task;

/// What a challenge measures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChallengeKind {
    /// Highest streak count across all tasks
    DailyStreak,
    /// Number of tasks with at least one completion
    TaskCompletion,
    /// Kind this build does not understand; always zero progress
    Unknown(String),
}

impl ChallengeKind {
    pub fn as_str(&self) -> &str {
        match self {
            ChallengeKind::DailyStreak => "dailyStreak",
            ChallengeKind::TaskCompletion => "taskCompletion",
            ChallengeKind::Unknown(raw) => raw,
        }
    }
}

impl From<&str> for ChallengeKind {
    fn from(raw: &str) -> Self {
        match raw {
            "dailyStreak" => ChallengeKind::DailyStreak,
            "taskCompletion" => ChallengeKind::TaskCompletion,
            other => ChallengeKind::Unknown(other.to_string()),
        }
    }
}

impl Serialize for ChallengeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ChallengeKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ChallengeKind::from(raw.as_str()))
    }
}

/// A catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Challenge {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ChallengeKind,
    pub target: u32,
    pub reward: String,
}

impl Challenge {
    pub fn new(id: &str, title: &str, kind: ChallengeKind, target: u32, reward: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            kind,
            target,
            reward: reward.to_string(),
        }
    }
}

/// The built-in challenge catalog, in display order.
pub fn default_catalog() -> Vec<Challenge> {
    vec![
        Challenge::new(
            "daily_7",
            "7-Day Streak",
            ChallengeKind::DailyStreak,
            7,
            "🔥 7-Day Streak Badge",
        ),
        Challenge::new(
            "daily_14",
            "14-Day Streak",
            ChallengeKind::DailyStreak,
            14,
            "🌟 14-Day Streak Badge",
        ),
        Challenge::new(
            "daily_30",
            "30-Day Streak",
            ChallengeKind::DailyStreak,
            30,
            "🏅 30-Day Streak Badge",
        ),
        Challenge::new(
            "complete_10_tasks",
            "Complete 10 Tasks",
            ChallengeKind::TaskCompletion,
            10,
            "🏆 Task Master Certificate",
        ),
        Challenge::new(
            "complete_50_tasks",
            "Complete 50 Tasks",
            ChallengeKind::TaskCompletion,
            50,
            "🎖️ Task Champion Certificate",
        ),
    ]
}

/// Evaluated progress against one challenge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChallengeResult {
    pub id: String,
    pub title: String,
    pub progress: u32,
    pub target: u32,
    pub completed: bool,
    pub reward: String,
}

impl ChallengeResult {
    /// Progress as a 0-100 percentage for progress bars.
    pub fn percent(&self) -> u8 {
        if self.target == 0 {
            return if self.completed { 100 } else { 0 };
        }
        ((u64::from(self.progress) * 100) / u64::from(self.target)).min(100) as u8
    }
}

/// Inputs every challenge kind is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChallengeInputs {
    pub top_streak: u32,
    pub tasks_with_completions: u32,
}

impl ChallengeInputs {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        tasks.iter().fold(Self::default(), |mut acc, task| {
            acc.top_streak = acc.top_streak.max(task.streak.count);
            if !task.completions.is_empty() {
                acc.tasks_with_completions = acc.tasks_with_completions.saturating_add(1);
            }
            acc
        })
    }
}

/// Evaluate `catalog` against the task collection, preserving catalog order.
pub fn evaluate_challenges(catalog: &[Challenge], tasks: &[Task]) -> Vec<ChallengeResult> {
    evaluate_with(catalog, ChallengeInputs::from_tasks(tasks))
}

/// Evaluate `catalog` against precomputed inputs.
pub fn evaluate_with(catalog: &[Challenge], inputs: ChallengeInputs) -> Vec<ChallengeResult> {
    catalog
        .iter()
        .map(|challenge| {
            let measured = match challenge.kind {
                ChallengeKind::DailyStreak => Some(inputs.top_streak),
                ChallengeKind::TaskCompletion => Some(inputs.tasks_with_completions),
                ChallengeKind::Unknown(_) => None,
            };
            let (progress, completed) = match measured {
                Some(value) => (value.min(challenge.target), value >= challenge.target),
                None => (0, false),
            };
            ChallengeResult {
                id: challenge.id.clone(),
                title: challenge.title.clone(),
                progress,
                target: challenge.target,
                completed,
                reward: challenge.reward.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{NewTask, StreakState};
    use chrono::Utc;
    use proptest::prelude::*;

    fn task(streak: u32, completions: &[&str]) -> Task {
        let mut task = NewTask::new("t").into_task(Utc::now()).unwrap();
        task.streak = StreakState {
            count: streak,
            last_check_in: completions.last().map(|d| d.parse().unwrap()),
        };
        task.completions = completions.iter().map(|d| d.parse().unwrap()).collect();
        task
    }

    #[test]
    fn empty_collection_has_zero_progress() {
        let results = evaluate_challenges(&default_catalog(), &[]);
        assert_eq!(results.len(), 5);
        assert!(results.iter().all(|r| r.progress == 0 && !r.completed));
    }

    #[test]
    fn streak_challenges_use_top_streak() {
        let tasks = vec![task(3, &["2026-10-18"]), task(9, &["2026-10-18"])];
        let results = evaluate_challenges(&default_catalog(), &tasks);

        assert_eq!(results[0].id, "daily_7");
        assert_eq!(results[0].progress, 7);
        assert!(results[0].completed);
        assert_eq!(results[1].progress, 9);
        assert!(!results[1].completed);
        assert_eq!(results[1].percent(), 64);
    }

    #[test]
    fn completion_challenges_count_tasks_once() {
        let tasks = vec![
            task(1, &["2026-10-16", "2026-10-17", "2026-10-18"]),
            task(0, &[]),
            task(1, &["2026-10-18"]),
        ];
        let results = evaluate_challenges(&default_catalog(), &tasks);
        let ten = results.iter().find(|r| r.id == "complete_10_tasks").unwrap();
        assert_eq!(ten.progress, 2);
        assert!(!ten.completed);
        assert_eq!(ten.reward, "🏆 Task Master Certificate");
    }

    #[test]
    fn unknown_kind_is_fail_safe() {
        let raw = r#"[{"id": "x", "title": "Mystery", "type": "weekendWarrior",
                       "target": 1, "reward": "?"}]"#;
        let catalog: Vec<Challenge> = serde_json::from_str(raw).unwrap();
        assert_eq!(catalog[0].kind, ChallengeKind::Unknown("weekendWarrior".into()));

        let results = evaluate_challenges(&catalog, &[task(50, &["2026-10-18"])]);
        assert_eq!(results[0].progress, 0);
        assert!(!results[0].completed);
    }

    #[test]
    fn kind_serializes_with_catalog_names() {
        let json = serde_json::to_value(&default_catalog()[0]).unwrap();
        assert_eq!(json["type"], "dailyStreak");
    }

    proptest! {
        #[test]
        fn progress_never_exceeds_target(top in 0u32..100, done in 0u32..100, target in 1u32..60) {
            let catalog = vec![
                Challenge::new("s", "s", ChallengeKind::DailyStreak, target, ""),
                Challenge::new("c", "c", ChallengeKind::TaskCompletion, target, ""),
            ];
            let inputs = ChallengeInputs { top_streak: top, tasks_with_completions: done };
            for result in evaluate_with(&catalog, inputs) {
                prop_assert!(result.progress <= result.target);
                prop_assert_eq!(result.completed, result.progress == result.target);
            }
        }
    }
}
