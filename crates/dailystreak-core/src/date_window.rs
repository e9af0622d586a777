//! Calendar-day utilities.
//!
//! Every date comparison in the engine goes through [`CalendarDay`], a plain
//! calendar date rendered as `YYYY-MM-DD`. Timestamps are converted to days
//! exactly once, by a [`Clock`], using a single configured UTC offset.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Longest window [`DateWindow::window`] will produce, about ten years.
pub const MAX_WINDOW_DAYS: usize = 3660;

/// A canonical calendar day identifier (`YYYY-MM-DD`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDay(NaiveDate);

impl CalendarDay {
    /// The day `n` calendar days before this one. Saturates at the minimum
    /// representable date.
    pub fn days_before(&self, n: u32) -> Self {
        self.0
            .checked_sub_signed(Duration::days(i64::from(n)))
            .map(Self)
            .unwrap_or(Self(NaiveDate::MIN))
    }

    /// Short `MM-DD` label used on histogram axes.
    pub fn short_label(&self) -> String {
        self.0.format("%m-%d").to_string()
    }
}

impl fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DAY_FORMAT))
    }
}

impl FromStr for CalendarDay {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), DAY_FORMAT).map(Self)
    }
}

impl Serialize for CalendarDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Source of the current calendar day.
pub trait Clock {
    fn today(&self) -> CalendarDay;
}

/// Wall clock pinned to a fixed UTC offset.
///
/// The offset decides where the day boundary falls; with the default of zero
/// the day flips at UTC midnight.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    /// Create a clock for the given offset in minutes east of UTC. Offsets
    /// outside ±24h fall back to UTC.
    pub fn with_offset_minutes(minutes: i32) -> Self {
        let offset = minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix());
        Self { offset }
    }

    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::utc()
    }
}

impl Clock for SystemClock {
    fn today(&self) -> CalendarDay {
        CalendarDay(Utc::now().with_timezone(&self.offset).date_naive())
    }
}

/// Clock that always reports the same day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub CalendarDay);

impl Clock for FixedClock {
    fn today(&self) -> CalendarDay {
        self.0
    }
}

/// A view of the calendar anchored at a single sampled `today`.
///
/// Build one per logical operation so that an aggregation pass never sees the
/// day change underneath it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    today: CalendarDay,
}

impl DateWindow {
    /// Sample the clock once.
    pub fn from_clock(clock: &dyn Clock) -> Self {
        Self {
            today: clock.today(),
        }
    }

    pub fn anchored_at(today: CalendarDay) -> Self {
        Self { today }
    }

    pub fn today(&self) -> CalendarDay {
        self.today
    }

    pub fn yesterday(&self) -> CalendarDay {
        Self::day_offset(self.today, 1)
    }

    /// The day `n` calendar days before `day`.
    pub fn day_offset(day: CalendarDay, n: u32) -> CalendarDay {
        day.days_before(n)
    }

    /// The most recent `n` days ending at today, oldest first.
    ///
    /// `n` is clamped to `1..=MAX_WINDOW_DAYS`. Every day appears once; the
    /// window is shorter than `n` only if it would run past the earliest
    /// representable date.
    pub fn window(&self, n: usize) -> Vec<CalendarDay> {
        let n = n.clamp(1, MAX_WINDOW_DAYS);
        let mut days: Vec<CalendarDay> = std::iter::successors(Some(self.today), |day| {
            day.0.pred_opt().map(CalendarDay)
        })
        .take(n)
        .collect();
        days.reverse();
        days
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> CalendarDay {
        s.parse().unwrap()
    }

    #[test]
    fn parses_and_formats_canonical_form() {
        let d = day("2026-03-01");
        assert_eq!(d.to_string(), "2026-03-01");
        assert_eq!(d.short_label(), "03-01");
        assert!("2026-02-30".parse::<CalendarDay>().is_err());
        assert!("yesterday".parse::<CalendarDay>().is_err());
    }

    #[test]
    fn day_offset_crosses_month_and_year_boundaries() {
        assert_eq!(DateWindow::day_offset(day("2026-03-01"), 1), day("2026-02-28"));
        assert_eq!(DateWindow::day_offset(day("2024-03-01"), 1), day("2024-02-29"));
        assert_eq!(DateWindow::day_offset(day("2026-01-01"), 1), day("2025-12-31"));
        assert_eq!(DateWindow::day_offset(day("2026-01-01"), 0), day("2026-01-01"));
    }

    #[test]
    fn window_is_oldest_first_and_ends_today() {
        let window = DateWindow::anchored_at(day("2026-03-02"));
        let days = window.window(4);
        assert_eq!(
            days,
            vec![
                day("2026-02-27"),
                day("2026-02-28"),
                day("2026-03-01"),
                day("2026-03-02"),
            ]
        );
    }

    #[test]
    fn window_of_zero_is_clamped_to_today() {
        let window = DateWindow::anchored_at(day("2026-03-02"));
        assert_eq!(window.window(0), vec![day("2026-03-02")]);
    }

    #[test]
    fn window_is_capped_and_never_repeats_a_day() {
        let window = DateWindow::anchored_at(day("2026-10-18"));
        let days = window.window(usize::MAX);
        assert_eq!(days.len(), MAX_WINDOW_DAYS);
        assert_eq!(days.last(), Some(&day("2026-10-18")));
        assert!(days.windows(2).all(|pair| pair[0] < pair[1]));

        let earliest = DateWindow::anchored_at(CalendarDay(NaiveDate::MIN));
        assert_eq!(earliest.window(5), vec![CalendarDay(NaiveDate::MIN)]);
    }

    #[test]
    fn window_is_restartable() {
        let window = DateWindow::from_clock(&FixedClock(day("2026-10-18")));
        assert_eq!(window.window(30), window.window(30));
        assert_eq!(window.window(30).len(), 30);
        assert_eq!(window.yesterday(), day("2026-10-17"));
    }

    #[test]
    fn serde_uses_canonical_string() {
        let json = serde_json::to_string(&day("2026-10-18")).unwrap();
        assert_eq!(json, "\"2026-10-18\"");
        let back: CalendarDay = serde_json::from_str(&json).unwrap();
        assert_eq!(back, day("2026-10-18"));
    }

    #[test]
    fn invalid_offset_falls_back_to_utc() {
        let clock = SystemClock::with_offset_minutes(48 * 60);
        let utc = SystemClock::utc();
        // Both sample "now"; they only disagree if midnight passes between calls.
        let a = clock.today();
        let b = utc.today();
        assert!(a == b || a.days_before(1) == b || b.days_before(1) == a);
    }
}
