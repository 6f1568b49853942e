//! XP and streak ledger.
//!
//! Records point-earning events, keeps a running total, a per-day history,
//! and a consecutive-day streak. The history log is the source of truth for
//! the streak; the stored scalar is a cache that
//! [`XpLedger::validate_and_fix_streak`] re-anchors whenever it drifts.
//!
//! All writes for one earning event (total, streak, last-interaction day,
//! history) commit in a single store transaction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::day::DayKey;
use crate::error::{Result, ValidationError};
use crate::storage::{EventLog, Insert, Kv, Store};
use crate::streak;

const XP_TOTAL_KEY: &str = "mindful_xp";
const STREAK_KEY: &str = "mindful_streak";
const LAST_INTERACTION_KEY: &str = "last_interaction_date";

/// Days of XP history kept before the oldest record is evicted.
const XP_HISTORY_CAP: usize = 30;
const CATCH_SCROLL_CAP: usize = 30;

const XP_HISTORY: EventLog<XpEvent> = EventLog::new("xp_history", XP_HISTORY_CAP, Insert::Back);
const CATCH_SCROLL: EventLog<CatchScrollDay> =
    EventLog::new("catch_scroll_taps", CATCH_SCROLL_CAP, Insert::Front);

/// XP accumulated on one calendar day.
///
/// At most one record exists per distinct day; same-day events fold into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpEvent {
    pub date: DayKey,
    pub xp: u32,
}

/// One day's catch-scroll taps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatchScrollDay {
    pub date: DayKey,
    /// Always equals `times.len()`.
    pub taps: u32,
    pub times: Vec<DateTime<Utc>>,
    pub xp_earned: u32,
}

/// Store-backed reward ledger.
///
/// Holds no in-memory state of its own; every read goes to the store.
pub struct XpLedger<'s> {
    store: &'s Store,
}

impl<'s> XpLedger<'s> {
    pub fn new(store: &'s Store) -> Self {
        Self { store }
    }

    /// Total XP ever earned. 0 when unset.
    pub fn total(&self) -> Result<u64> {
        read_counter(self.store, XP_TOTAL_KEY)
    }

    /// Current streak in days. 0 when unset.
    pub fn streak(&self) -> Result<u32> {
        Ok(read_counter(self.store, STREAK_KEY)? as u32)
    }

    /// The calendar day of the most recent earning event, if any.
    pub fn last_interaction(&self) -> Result<Option<DayKey>> {
        Ok(self
            .store
            .get(LAST_INTERACTION_KEY)?
            .and_then(|s| s.parse().ok()))
    }

    /// XP earned today.
    pub fn today(&self) -> Result<u32> {
        self.earned_on(DayKey::today())
    }

    /// XP earned on a specific day, per the history log.
    pub fn earned_on(&self, day: DayKey) -> Result<u32> {
        let history = XP_HISTORY.load(self.store)?;
        Ok(history
            .iter()
            .find(|event| event.date == day)
            .map(|event| event.xp)
            .unwrap_or(0))
    }

    /// The daily XP history, oldest first.
    pub fn history(&self) -> Result<Vec<XpEvent>> {
        XP_HISTORY.load(self.store)
    }

    /// Record `amount` XP for today and return the new running total.
    pub fn add(&self, amount: u32) -> Result<u64> {
        self.add_on(amount, DayKey::today())
    }

    /// Record `amount` XP attributed to `day`.
    ///
    /// Rejects a zero amount. Atomically bumps the total, updates the streak
    /// and last-interaction day, and upserts the day's history record.
    pub fn add_on(&self, amount: u32, day: DayKey) -> Result<u64> {
        if amount == 0 {
            return Err(ValidationError::InvalidValue {
                field: "amount".into(),
                message: "XP amount must be positive".into(),
            }
            .into());
        }
        self.store.with_txn(|kv| add_in_txn(kv, amount, day))
    }

    /// Recompute the streak from the history log and overwrite the stored
    /// scalar when it drifts. Returns the corrected value.
    pub fn validate_and_fix_streak(&self) -> Result<u32> {
        self.validate_and_fix_streak_on(DayKey::today())
    }

    /// Validate the streak as of an explicit day (the history is ground
    /// truth; the scalar is a cache).
    pub fn validate_and_fix_streak_on(&self, today: DayKey) -> Result<u32> {
        self.store.with_txn(|kv| {
            let history = XP_HISTORY.load(kv)?;
            let present =
                streak::present_days(history.iter().filter(|e| e.xp > 0).map(|e| e.date));
            let computed = streak::run_ending_at(&present, today);
            let stored = read_counter(kv, STREAK_KEY)? as u32;
            if computed != stored {
                info!(stored, computed, "repairing streak from history");
                kv.set(STREAK_KEY, &computed.to_string())?;
            }
            Ok(computed)
        })
    }

    /// Record one catch-scroll tap (fixed reward of 1 XP) and return the new
    /// running total.
    pub fn catch_scroll_tap(&self) -> Result<u64> {
        let now = Utc::now();
        self.catch_scroll_tap_at(now, DayKey::from_utc(now))
    }

    /// Tap with an explicit instant and attribution day.
    pub fn catch_scroll_tap_at(&self, at: DateTime<Utc>, day: DayKey) -> Result<u64> {
        self.store.with_txn(|kv| {
            let mut days = CATCH_SCROLL.load(kv)?;
            match days.iter_mut().find(|d| d.date == day) {
                Some(record) => {
                    record.taps += 1;
                    record.times.push(at);
                    record.xp_earned += 1;
                }
                None => {
                    days.insert(
                        0,
                        CatchScrollDay {
                            date: day,
                            taps: 1,
                            times: vec![at],
                            xp_earned: 1,
                        },
                    );
                }
            }
            if days.len() > CATCH_SCROLL_CAP {
                days.sort_by_key(|d| d.date);
                let excess = days.len() - CATCH_SCROLL_CAP;
                days.drain(..excess);
                days.sort_by(|a, b| b.date.cmp(&a.date));
            }
            CATCH_SCROLL.replace(kv, &days)?;
            add_in_txn(kv, 1, day)
        })
    }

    /// Per-day catch-scroll records, newest first.
    pub fn catch_scroll_days(&self) -> Result<Vec<CatchScrollDay>> {
        CATCH_SCROLL.load(self.store)
    }
}

/// The earning path shared by `add_on` and `catch_scroll_tap_at`; must run
/// inside an open transaction.
fn add_in_txn(kv: &dyn Kv, amount: u32, day: DayKey) -> Result<u64> {
    let total = read_counter(kv, XP_TOTAL_KEY)? + u64::from(amount);
    kv.set(XP_TOTAL_KEY, &total.to_string())?;

    let last: Option<DayKey> = kv.get(LAST_INTERACTION_KEY)?.and_then(|s| s.parse().ok());
    match last {
        Some(prev) if prev == day => {
            // Same-day event: streak and last-interaction day stay as stored.
        }
        Some(prev) if prev.is_yesterday_of(day) => {
            let streak = read_counter(kv, STREAK_KEY)? as u32 + 1;
            kv.set(STREAK_KEY, &streak.to_string())?;
            kv.set(LAST_INTERACTION_KEY, &day.to_string())?;
        }
        _ => {
            // First event ever, or a gap of two or more days.
            kv.set(STREAK_KEY, "1")?;
            kv.set(LAST_INTERACTION_KEY, &day.to_string())?;
        }
    }

    let mut history = XP_HISTORY.load(kv)?;
    match history.iter_mut().find(|event| event.date == day) {
        Some(event) => event.xp += amount,
        None => history.push(XpEvent { date: day, xp: amount }),
    }
    if history.len() > XP_HISTORY_CAP {
        history.sort_by_key(|event| event.date);
        let excess = history.len() - XP_HISTORY_CAP;
        history.drain(..excess);
    }
    XP_HISTORY.replace(kv, &history)?;

    Ok(total)
}

fn read_counter(kv: &dyn Kv, key: &str) -> Result<u64> {
    Ok(kv
        .get(key)?
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> DayKey {
        s.parse().unwrap()
    }

    fn ledger(store: &Store) -> XpLedger<'_> {
        XpLedger::new(store)
    }

    #[test]
    fn totals_default_to_zero() {
        let store = Store::open_memory().unwrap();
        let xp = ledger(&store);
        assert_eq!(xp.total().unwrap(), 0);
        assert_eq!(xp.streak().unwrap(), 0);
        assert!(xp.last_interaction().unwrap().is_none());
    }

    #[test]
    fn add_accumulates_total_and_history() {
        let store = Store::open_memory().unwrap();
        let xp = ledger(&store);
        let d = day("2026-08-07");

        assert_eq!(xp.add_on(3, d).unwrap(), 3);
        assert_eq!(xp.add_on(4, d).unwrap(), 7);

        assert_eq!(xp.total().unwrap(), 7);
        assert_eq!(xp.earned_on(d).unwrap(), 7);
        // Same-day events fold into one history record.
        let history = xp.history().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0], XpEvent { date: d, xp: 7 });
    }

    #[test]
    fn zero_amount_is_rejected() {
        let store = Store::open_memory().unwrap();
        let xp = ledger(&store);
        assert!(xp.add_on(0, day("2026-08-07")).is_err());
        assert_eq!(xp.total().unwrap(), 0);
    }

    #[test]
    fn first_event_starts_streak_at_one() {
        let store = Store::open_memory().unwrap();
        let xp = ledger(&store);
        xp.add_on(5, day("2026-08-07")).unwrap();
        assert_eq!(xp.streak().unwrap(), 1);
        assert_eq!(xp.last_interaction().unwrap(), Some(day("2026-08-07")));
    }

    #[test]
    fn consecutive_days_increment_streak() {
        let store = Store::open_memory().unwrap();
        let xp = ledger(&store);
        xp.add_on(5, day("2026-08-05")).unwrap();
        xp.add_on(5, day("2026-08-06")).unwrap();
        xp.add_on(5, day("2026-08-07")).unwrap();
        assert_eq!(xp.streak().unwrap(), 3);
    }

    #[test]
    fn same_day_leaves_streak_unchanged() {
        let store = Store::open_memory().unwrap();
        let xp = ledger(&store);
        xp.add_on(5, day("2026-08-06")).unwrap();
        xp.add_on(5, day("2026-08-07")).unwrap();
        xp.add_on(5, day("2026-08-07")).unwrap();
        assert_eq!(xp.streak().unwrap(), 2);
    }

    #[test]
    fn gap_resets_streak_to_one() {
        let store = Store::open_memory().unwrap();
        let xp = ledger(&store);
        xp.add_on(5, day("2026-08-03")).unwrap();
        xp.add_on(5, day("2026-08-04")).unwrap();
        xp.add_on(5, day("2026-08-07")).unwrap();
        assert_eq!(xp.streak().unwrap(), 1);
    }

    #[test]
    fn validator_recomputes_from_history() {
        let store = Store::open_memory().unwrap();
        let xp = ledger(&store);
        xp.add_on(5, day("2026-08-04")).unwrap();
        xp.add_on(5, day("2026-08-05")).unwrap();
        xp.add_on(5, day("2026-08-06")).unwrap();

        // Clobber the cached scalar; history remains ground truth.
        store.set("mindful_streak", "99").unwrap();
        assert_eq!(xp.validate_and_fix_streak_on(day("2026-08-06")).unwrap(), 3);
        assert_eq!(xp.streak().unwrap(), 3);
    }

    #[test]
    fn validator_is_zero_the_day_after_the_run() {
        let store = Store::open_memory().unwrap();
        let xp = ledger(&store);
        xp.add_on(5, day("2026-08-04")).unwrap();
        xp.add_on(5, day("2026-08-05")).unwrap();
        xp.add_on(5, day("2026-08-06")).unwrap();
        assert_eq!(xp.validate_and_fix_streak_on(day("2026-08-07")).unwrap(), 0);
    }

    #[test]
    fn validator_sees_gaps_the_increment_path_missed() {
        let store = Store::open_memory().unwrap();
        let xp = ledger(&store);
        xp.add_on(5, day("2026-08-05")).unwrap();
        xp.add_on(5, day("2026-08-07")).unwrap();
        assert_eq!(xp.validate_and_fix_streak_on(day("2026-08-07")).unwrap(), 1);
    }

    #[test]
    fn history_caps_at_thirty_days_dropping_oldest_by_date() {
        let store = Store::open_memory().unwrap();
        let xp = ledger(&store);
        let mut d = day("2026-01-01");
        for _ in 0..35 {
            xp.add_on(1, d).unwrap();
            d = d.succ();
        }
        let history = xp.history().unwrap();
        assert_eq!(history.len(), 30);
        // The five oldest days fell off.
        assert_eq!(history[0].date, day("2026-01-06"));
        assert_eq!(history[29].date, day("2026-02-04"));
    }

    #[test]
    fn catch_scroll_tap_keeps_taps_equal_to_times() {
        let store = Store::open_memory().unwrap();
        let xp = ledger(&store);
        let d = day("2026-08-07");
        let base = Utc::now();

        xp.catch_scroll_tap_at(base, d).unwrap();
        xp.catch_scroll_tap_at(base + chrono::Duration::seconds(10), d)
            .unwrap();
        let total = xp
            .catch_scroll_tap_at(base + chrono::Duration::seconds(20), d)
            .unwrap();

        assert_eq!(total, 3);
        let days = xp.catch_scroll_days().unwrap();
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].taps, 3);
        assert_eq!(days[0].times.len(), 3);
        assert_eq!(days[0].xp_earned, 3);
        // Taps flow into the normal earning path.
        assert_eq!(xp.earned_on(d).unwrap(), 3);
        assert_eq!(xp.streak().unwrap(), 1);
    }
}
