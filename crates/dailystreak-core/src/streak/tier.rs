//! Named streak tiers.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A band of streak counts, `min..=max` (`max = None` is unbounded).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tier {
    pub name: String,
    pub min: u32,
    #[serde(default)]
    pub max: Option<u32>,
    #[serde(default)]
    pub quote: String,
}

impl Tier {
    pub fn new(name: &str, min: u32, max: Option<u32>, quote: &str) -> Self {
        Self {
            name: name.to_string(),
            min,
            max,
            quote: quote.to_string(),
        }
    }

    pub fn contains(&self, count: u32) -> bool {
        count >= self.min && self.max.map_or(true, |max| count <= max)
    }

    /// How far `count` has progressed through this band, 0-100.
    ///
    /// The unbounded top tier reads as 100 once entered. Counts below the band
    /// read as 0 and counts above it as 100.
    pub fn progress_percent(&self, count: u32) -> u8 {
        let Some(max) = self.max else {
            return if count >= self.min { 100 } else { 0 };
        };
        if count <= self.min {
            return 0;
        }
        if count >= max {
            return 100;
        }
        let span = u64::from(max - self.min);
        let done = u64::from(count - self.min);
        ((done * 100) / span) as u8
    }

    /// Human label for the band, e.g. `4-7` or `15+`.
    pub fn range_label(&self) -> String {
        match self.max {
            Some(max) => format!("{}-{}", self.min, max),
            None => format!("{}+", self.min),
        }
    }
}

/// How the tier moved between two classifications.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TierChange {
    /// No previous classification to compare with
    Initial,
    Unchanged,
    Up,
    Down,
}

impl TierChange {
    pub fn is_tier_up(&self) -> bool {
        matches!(self, TierChange::Up)
    }
}

/// Ordered tier table. Never empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "Vec<Tier>", into = "Vec<Tier>")]
pub struct TierCatalog {
    tiers: Vec<Tier>,
}

impl Default for TierCatalog {
    fn default() -> Self {
        Self {
            tiers: vec![
                Tier::new("Bronze", 0, Some(3), "Every journey begins with a single step."),
                Tier::new("Silver", 4, Some(7), "Keep going! Progress is visible."),
                Tier::new("Gold", 8, Some(14), "Your consistency is inspiring!"),
                Tier::new("Diamond", 15, None, "Legendary streak! Keep conquering!"),
            ],
        }
    }
}

impl TierCatalog {
    /// Build a catalog, sorting tiers by `min`. An empty list yields the
    /// default catalog.
    pub fn new(mut tiers: Vec<Tier>) -> Self {
        if tiers.is_empty() {
            return Self::default();
        }
        tiers.sort_by_key(|t| t.min);
        Self { tiers }
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    /// The tier containing `count`.
    ///
    /// Falls back to the lowest tier when no band matches.
    pub fn classify(&self, count: u32) -> &Tier {
        self.tiers
            .iter()
            .find(|tier| tier.contains(count))
            .unwrap_or_else(|| self.lowest())
    }

    fn lowest(&self) -> &Tier {
        &self.tiers[0]
    }

    /// Position of the tier named `name`, lowest first.
    pub fn rank(&self, name: &str) -> Option<usize> {
        self.tiers.iter().position(|t| t.name == name)
    }

    /// Compare a previously shown tier name against the current tier.
    ///
    /// A previous name no longer in the catalog counts as `Initial`.
    pub fn change(&self, previous: Option<&str>, current: &Tier) -> TierChange {
        let Some(previous) = previous else {
            return TierChange::Initial;
        };
        if previous == current.name {
            return TierChange::Unchanged;
        }
        match (self.rank(previous), self.rank(&current.name)) {
            (Some(before), Some(after)) if after > before => TierChange::Up,
            (Some(before), Some(after)) if after < before => TierChange::Down,
            (Some(_), Some(_)) => TierChange::Unchanged,
            _ => TierChange::Initial,
        }
    }

    /// Check that the tiers partition the non-negative integers: the first
    /// starts at 0, each starts right after the previous ends, only the last
    /// is unbounded.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let malformed = |msg: String| -> Result<(), ValidationError> {
            Err(ValidationError::MalformedTierCatalog(msg))
        };

        let Some(first) = self.tiers.first() else {
            return malformed("no tiers defined".into());
        };
        if first.min != 0 {
            return malformed(format!(
                "lowest tier '{}' starts at {}, not 0",
                first.name, first.min
            ));
        }

        for (i, tier) in self.tiers.iter().enumerate() {
            if let Some(max) = tier.max {
                if max < tier.min {
                    return malformed(format!("tier '{}' has max below min", tier.name));
                }
            }
            match (tier.max, self.tiers.get(i + 1)) {
                (None, Some(next)) => {
                    return malformed(format!(
                        "tier '{}' is unbounded but followed by '{}'",
                        tier.name, next.name
                    ));
                }
                (Some(max), Some(next)) if max.checked_add(1) != Some(next.min) => {
                    return malformed(format!(
                        "gap or overlap between '{}' and '{}'",
                        tier.name, next.name
                    ));
                }
                (Some(_), None) => {
                    return malformed(format!("top tier '{}' must be unbounded", tier.name));
                }
                _ => {}
            }
        }

        let mut names: Vec<&str> = self.tiers.iter().map(|t| t.name.as_str()).collect();
        names.sort_unstable();
        if names.windows(2).any(|w| w[0] == w[1]) {
            return malformed("tier names must be unique".into());
        }
        Ok(())
    }
}

impl From<Vec<Tier>> for TierCatalog {
    fn from(tiers: Vec<Tier>) -> Self {
        Self::new(tiers)
    }
}

impl From<TierCatalog> for Vec<Tier> {
    fn from(catalog: TierCatalog) -> Self {
        catalog.tiers
    }
}
