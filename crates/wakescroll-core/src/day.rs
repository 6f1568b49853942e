//! Calendar day keys.
//!
//! A [`DayKey`] is the local calendar date used as the join key across all
//! per-day aggregation. It renders as `YYYY-MM-DD` and is what gets persisted
//! wherever the data model calls for a day string.

use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single local calendar day.
///
/// Ordering and equality follow the underlying date. Serialized as the
/// `YYYY-MM-DD` string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayKey(NaiveDate);

impl DayKey {
    /// The device-local calendar day right now.
    ///
    /// This is the only place the library reads the wall clock for day
    /// attribution; aggregation functions take an explicit anchor day.
    pub fn today() -> Self {
        DayKey(Local::now().date_naive())
    }

    /// The local calendar day a UTC instant falls on.
    pub fn from_utc(at: DateTime<Utc>) -> Self {
        DayKey(at.with_timezone(&Local).date_naive())
    }

    /// Build a key from calendar components. Returns `None` for invalid dates.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(DayKey)
    }

    /// The previous calendar day. Saturates at the representable minimum.
    pub fn pred(&self) -> Self {
        DayKey(self.0.pred_opt().unwrap_or(self.0))
    }

    /// The next calendar day. Saturates at the representable maximum.
    pub fn succ(&self) -> Self {
        DayKey(self.0.succ_opt().unwrap_or(self.0))
    }

    /// Whether `self` is the day immediately before `other`.
    pub fn is_yesterday_of(&self, other: DayKey) -> bool {
        self.succ() == other
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Day of month, 1-based.
    pub fn day_of_month(&self) -> u32 {
        self.0.day()
    }

    /// Whether this day falls in the given year/month.
    pub fn in_month(&self, year: i32, month: u32) -> bool {
        self.year() == year && self.month() == month
    }

    /// Short weekday label, e.g. `Mon`.
    pub fn weekday_label(&self) -> String {
        self.0.format("%a").to_string()
    }

    /// Number of days in the given month, or 0 for an invalid month.
    pub fn days_in_month(year: i32, month: u32) -> u32 {
        let first = match NaiveDate::from_ymd_opt(year, month, 1) {
            Some(d) => d,
            None => return 0,
        };
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        };
        match next {
            Some(n) => (n - first).num_days() as u32,
            None => 0,
        }
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DayKey {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").map(DayKey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> DayKey {
        s.parse().unwrap()
    }

    #[test]
    fn round_trips_through_string_form() {
        let d = day("2026-08-07");
        assert_eq!(d.to_string(), "2026-08-07");
        assert_eq!(d.to_string().parse::<DayKey>().unwrap(), d);
    }

    #[test]
    fn serializes_as_plain_date_string() {
        let d = day("2026-01-31");
        assert_eq!(serde_json::to_string(&d).unwrap(), "\"2026-01-31\"");
    }

    #[test]
    fn pred_succ_cross_month_boundaries() {
        assert_eq!(day("2026-03-01").pred(), day("2026-02-28"));
        assert_eq!(day("2025-12-31").succ(), day("2026-01-01"));
    }

    #[test]
    fn yesterday_relation() {
        assert!(day("2026-08-06").is_yesterday_of(day("2026-08-07")));
        assert!(!day("2026-08-05").is_yesterday_of(day("2026-08-07")));
        assert!(!day("2026-08-07").is_yesterday_of(day("2026-08-07")));
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(DayKey::days_in_month(2024, 2), 29);
        assert_eq!(DayKey::days_in_month(2026, 2), 28);
        assert_eq!(DayKey::days_in_month(2026, 12), 31);
        assert_eq!(DayKey::days_in_month(2026, 13), 0);
    }
}
