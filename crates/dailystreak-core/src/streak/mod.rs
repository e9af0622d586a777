//! Streak continuity and tier classification.

mod tier;
mod tracker;

pub use tier::{Tier, TierCatalog, TierChange};
pub use tracker::{check_in, current_streak, CheckInOutcome, CheckInStatus};
