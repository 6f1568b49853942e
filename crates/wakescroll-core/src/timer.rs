//! Focus sessions: the countdown state machine and the session log.
//!
//! [`FocusTimer`] is a wall-clock state machine: no internal thread, the
//! caller invokes `tick()` periodically. Only a naturally completed
//! countdown yields a persistable [`TimerSession`]; a cancelled one leaves
//! no trace in the log, so total time statistics count finished effort only.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::day::DayKey;
use crate::error::{Result, ValidationError};
use crate::storage::{EventLog, Insert, Store};
use crate::streak;

const TIMER_CAP: usize = 200;
const TIMER: EventLog<TimerSession> =
    EventLog::new("mindful_timer_sessions", TIMER_CAP, Insert::Front);

/// The preset focus session lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub enum SessionLength {
    Quick,
    Short,
    Classic,
    Deep,
}

impl SessionLength {
    pub const ALL: [SessionLength; 4] = [
        SessionLength::Quick,
        SessionLength::Short,
        SessionLength::Classic,
        SessionLength::Deep,
    ];

    pub fn minutes(&self) -> u32 {
        match self {
            SessionLength::Quick => 10,
            SessionLength::Short => 15,
            SessionLength::Classic => 25,
            SessionLength::Deep => 40,
        }
    }
}

impl From<SessionLength> for u32 {
    fn from(length: SessionLength) -> u32 {
        length.minutes()
    }
}

impl TryFrom<u32> for SessionLength {
    type Error = ValidationError;

    fn try_from(minutes: u32) -> Result<Self, Self::Error> {
        SessionLength::ALL
            .into_iter()
            .find(|l| l.minutes() == minutes)
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "duration_minutes".into(),
                message: format!("no {minutes}-minute preset (have 10, 15, 25, 40)"),
            })
    }
}

impl fmt::Display for SessionLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m", self.minutes())
    }
}

/// A completed focus session. Persisted sessions always have
/// `completed == true`; cancelled countdowns are never saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSession {
    /// Creation timestamp in milliseconds, as a string.
    pub id: String,
    pub length: SessionLength,
    pub created_at: DateTime<Utc>,
    /// The local calendar day the session is attributed to.
    pub day: DayKey,
    pub completed: bool,
}

/// Overall timer statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerStats {
    pub total_sessions: u32,
    pub total_minutes: u32,
    pub unique_days: u32,
    /// Consecutive days with at least one session, ending today.
    pub current_streak: u32,
    /// Session count keyed by preset minutes.
    pub sessions_per_length: BTreeMap<u32, u32>,
    pub last_session: Option<TimerSession>,
}

/// One month's timer statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerMonthlyStats {
    pub total_sessions: u32,
    pub total_minutes: u32,
    pub days_with_sessions: u32,
    /// Minutes per calendar day of the month.
    pub average_minutes_per_day: f64,
    pub sessions_per_length: BTreeMap<u32, u32>,
}

/// One day of a weekly summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerDaySummary {
    pub day: DayKey,
    /// Short weekday label, e.g. `Mon`.
    pub label: String,
    pub sessions: u32,
    pub minutes: u32,
}

/// Store-backed session log and aggregator.
pub struct TimerLog<'s> {
    store: &'s Store,
}

impl<'s> TimerLog<'s> {
    pub fn new(store: &'s Store) -> Self {
        Self { store }
    }

    /// Record a completed session attributed to the current local day.
    pub fn save(&self, length: SessionLength) -> Result<TimerSession> {
        let now = Utc::now();
        self.save_at(length, now, DayKey::from_utc(now))
    }

    /// Record with an explicit completion instant and attribution day.
    pub fn save_at(
        &self,
        length: SessionLength,
        at: DateTime<Utc>,
        day: DayKey,
    ) -> Result<TimerSession> {
        let session = TimerSession {
            id: at.timestamp_millis().to_string(),
            length,
            created_at: at,
            day,
            completed: true,
        };
        TIMER.append(self.store, session.clone())?;
        Ok(session)
    }

    /// All sessions, newest first.
    pub fn sessions(&self) -> Result<Vec<TimerSession>> {
        TIMER.load(self.store)
    }

    /// Sessions attributed to a specific day, newest first.
    pub fn sessions_on(&self, day: DayKey) -> Result<Vec<TimerSession>> {
        Ok(self
            .sessions()?
            .into_iter()
            .filter(|s| s.day == day)
            .collect())
    }

    /// Today's sessions.
    pub fn sessions_today(&self) -> Result<Vec<TimerSession>> {
        self.sessions_on(DayKey::today())
    }

    /// Delete the session with the given id. Returns whether a record matched.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let sessions = self.sessions()?;
        let before = sessions.len();
        let kept: Vec<TimerSession> = sessions.into_iter().filter(|s| s.id != id).collect();
        if kept.len() == before {
            return Ok(false);
        }
        TIMER.replace(self.store, &kept)?;
        Ok(true)
    }

    /// Overall statistics anchored at today.
    pub fn stats(&self) -> Result<TimerStats> {
        self.stats_on(DayKey::today())
    }

    /// Overall statistics anchored at an explicit day.
    pub fn stats_on(&self, today: DayKey) -> Result<TimerStats> {
        let sessions = self.sessions()?;
        let present = streak::present_days(sessions.iter().map(|s| s.day));
        let mut per_length: BTreeMap<u32, u32> = BTreeMap::new();
        let mut minutes = 0u32;
        for session in &sessions {
            minutes += session.length.minutes();
            *per_length.entry(session.length.minutes()).or_insert(0) += 1;
        }
        Ok(TimerStats {
            total_sessions: sessions.len() as u32,
            total_minutes: minutes,
            unique_days: present.len() as u32,
            current_streak: streak::run_ending_at(&present, today),
            sessions_per_length: per_length,
            last_session: sessions.first().cloned(),
        })
    }

    /// Sessions of a month bucketed by day of month.
    pub fn calendar(&self, year: i32, month: u32) -> Result<BTreeMap<u32, Vec<TimerSession>>> {
        let mut buckets: BTreeMap<u32, Vec<TimerSession>> = BTreeMap::new();
        for session in self.sessions()? {
            if session.day.in_month(year, month) {
                buckets
                    .entry(session.day.day_of_month())
                    .or_default()
                    .push(session);
            }
        }
        Ok(buckets)
    }

    /// Single-pass statistics over one month's sessions.
    pub fn monthly_stats(&self, year: i32, month: u32) -> Result<TimerMonthlyStats> {
        let mut total = 0u32;
        let mut minutes = 0u32;
        let mut days = HashSet::new();
        let mut per_length: BTreeMap<u32, u32> = BTreeMap::new();
        for session in self.sessions()? {
            if !session.day.in_month(year, month) {
                continue;
            }
            total += 1;
            minutes += session.length.minutes();
            days.insert(session.day);
            *per_length.entry(session.length.minutes()).or_insert(0) += 1;
        }
        let days_in_month = DayKey::days_in_month(year, month);
        Ok(TimerMonthlyStats {
            total_sessions: total,
            total_minutes: minutes,
            days_with_sessions: days.len() as u32,
            average_minutes_per_day: if days_in_month == 0 {
                0.0
            } else {
                f64::from(minutes) / f64::from(days_in_month)
            },
            sessions_per_length: per_length,
        })
    }

    /// Summaries for the 7 consecutive days starting at `week_start`.
    ///
    /// Always exactly 7 elements; days without sessions appear with zero
    /// counts.
    pub fn weekly(&self, week_start: DayKey) -> Result<Vec<TimerDaySummary>> {
        let sessions = self.sessions()?;
        let mut summaries = Vec::with_capacity(7);
        let mut day = week_start;
        for _ in 0..7 {
            let mut count = 0u32;
            let mut minutes = 0u32;
            for session in sessions.iter().filter(|s| s.day == day) {
                count += 1;
                minutes += session.length.minutes();
            }
            summaries.push(TimerDaySummary {
                day,
                label: day.weekday_label(),
                sessions: count,
                minutes,
            });
            day = day.succ();
        }
        Ok(summaries)
    }
}

// ── Countdown state machine ──────────────────────────────────────────

/// Countdown lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusState {
    Idle,
    Running,
    Completed,
    Cancelled,
}

/// Wall-clock countdown for one focus session.
///
/// Operates on wall-clock deltas -- no internal thread. The caller is
/// responsible for calling `tick()` periodically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusTimer {
    length: SessionLength,
    state: FocusState,
    /// Remaining time in milliseconds.
    remaining_ms: u64,
    /// Timestamp (ms since epoch) of the last resume or tick.
    #[serde(default)]
    last_tick_epoch_ms: Option<u64>,
}

impl FocusTimer {
    /// Create an idle countdown for the given preset.
    pub fn new(length: SessionLength) -> Self {
        Self {
            length,
            state: FocusState::Idle,
            remaining_ms: u64::from(length.minutes()) * 60_000,
            last_tick_epoch_ms: None,
        }
    }

    pub fn state(&self) -> FocusState {
        self.state
    }

    pub fn length(&self) -> SessionLength {
        self.length
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    /// 0.0 .. 1.0 progress through the countdown.
    pub fn progress(&self) -> f64 {
        let total = u64::from(self.length.minutes()) * 60_000;
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_ms as f64 / total as f64)
    }

    /// Start the countdown. Returns false unless the timer was idle.
    pub fn start(&mut self) -> bool {
        self.start_at(now_ms())
    }

    fn start_at(&mut self, epoch_ms: u64) -> bool {
        if self.state != FocusState::Idle {
            return false;
        }
        self.state = FocusState::Running;
        self.last_tick_epoch_ms = Some(epoch_ms);
        true
    }

    /// Advance the countdown by the wall-clock time elapsed since the last
    /// tick. Returns the state after the update.
    pub fn tick(&mut self) -> FocusState {
        self.tick_at(now_ms())
    }

    fn tick_at(&mut self, epoch_ms: u64) -> FocusState {
        if self.state != FocusState::Running {
            return self.state;
        }
        let last = self.last_tick_epoch_ms.unwrap_or(epoch_ms);
        let elapsed = epoch_ms.saturating_sub(last);
        self.last_tick_epoch_ms = Some(epoch_ms);
        self.remaining_ms = self.remaining_ms.saturating_sub(elapsed);
        if self.remaining_ms == 0 {
            self.state = FocusState::Completed;
        }
        self.state
    }

    /// Abandon the countdown. A cancelled session is never persisted.
    pub fn cancel(&mut self) {
        if self.state == FocusState::Running || self.state == FocusState::Idle {
            self.state = FocusState::Cancelled;
        }
    }

    /// The session to persist, present only after natural completion.
    pub fn into_session(self, log: &TimerLog<'_>) -> Result<Option<TimerSession>> {
        if self.state != FocusState::Completed {
            return Ok(None);
        }
        log.save(self.length).map(Some)
    }
}

fn now_ms() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}
