//! Mood-tagged journal entries and their statistics.
//!
//! Entries are immutable once saved: created on save, deleted only by an
//! explicit delete, silently evicted past the retention bound. Aggregation
//! re-reads the log on every query; there is no cache to invalidate.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::day::DayKey;
use crate::error::Result;
use crate::storage::{EventLog, Insert, Store};
use crate::streak;

const JOURNAL_CAP: usize = 100;
const JOURNAL: EventLog<JournalEntry> =
    EventLog::new("mindful_journal_entries", JOURNAL_CAP, Insert::Front);

/// Longest text kept per entry; anything beyond is cut at a char boundary.
const MAX_TEXT_CHARS: usize = 500;

/// The fixed set of moods an entry can carry. Serializes as the emoji.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mood {
    #[serde(rename = "😄")]
    Great,
    #[serde(rename = "🙂")]
    Good,
    #[serde(rename = "😐")]
    Neutral,
    #[serde(rename = "😔")]
    Low,
    #[serde(rename = "😫")]
    Stressed,
}

impl Mood {
    pub const ALL: [Mood; 5] = [
        Mood::Great,
        Mood::Good,
        Mood::Neutral,
        Mood::Low,
        Mood::Stressed,
    ];

    pub fn emoji(&self) -> &'static str {
        match self {
            Mood::Great => "😄",
            Mood::Good => "🙂",
            Mood::Neutral => "😐",
            Mood::Low => "😔",
            Mood::Stressed => "😫",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mood::Great => "great",
            Mood::Good => "good",
            Mood::Neutral => "neutral",
            Mood::Low => "low",
            Mood::Stressed => "stressed",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.emoji())
    }
}

impl FromStr for Mood {
    type Err = String;

    /// Accepts either the emoji or the lowercase name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mood::ALL
            .into_iter()
            .find(|m| m.emoji() == s || m.name() == s)
            .ok_or_else(|| format!("unknown mood: {s}"))
    }
}

/// A single saved journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Creation timestamp in milliseconds, as a string.
    pub id: String,
    pub text: String,
    pub mood: Mood,
    pub created_at: DateTime<Utc>,
    /// The local calendar day the entry is attributed to.
    pub day: DayKey,
}

/// Whitespace-separated word count of an entry.
fn word_count(text: &str) -> u32 {
    text.split_whitespace().count() as u32
}

/// Overall journal statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalStats {
    pub total_entries: u32,
    pub unique_days: u32,
    /// Consecutive days with at least one entry, ending today.
    pub current_streak: u32,
    pub mood_counts: HashMap<Mood, u32>,
    pub last_entry: Option<JournalEntry>,
}

/// One month's journal statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalMonthlyStats {
    pub total_entries: u32,
    pub days_with_entries: u32,
    /// Entries per calendar day of the month.
    pub average_per_day: f64,
    pub average_words: f64,
    pub mood_counts: HashMap<Mood, u32>,
}

/// One day of a weekly summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalDaySummary {
    pub day: DayKey,
    /// Short weekday label, e.g. `Mon`.
    pub label: String,
    pub entries: u32,
    pub words: u32,
}

/// Store-backed journal log and aggregator.
pub struct Journal<'s> {
    store: &'s Store,
}

impl<'s> Journal<'s> {
    pub fn new(store: &'s Store) -> Self {
        Self { store }
    }

    /// Save a new entry attributed to the current local day.
    ///
    /// The text is trimmed and cut to 500 characters; nothing else is
    /// validated. The entry is prepended and the log truncated to its
    /// retention bound.
    pub fn save(&self, text: &str, mood: Mood) -> Result<JournalEntry> {
        let now = Utc::now();
        self.save_at(text, mood, now, DayKey::from_utc(now))
    }

    /// Save with an explicit creation instant and attribution day.
    pub fn save_at(
        &self,
        text: &str,
        mood: Mood,
        at: DateTime<Utc>,
        day: DayKey,
    ) -> Result<JournalEntry> {
        let trimmed = text.trim();
        let text: String = trimmed.chars().take(MAX_TEXT_CHARS).collect();
        let entry = JournalEntry {
            id: at.timestamp_millis().to_string(),
            text,
            mood,
            created_at: at,
            day,
        };
        JOURNAL.append(self.store, entry.clone())?;
        Ok(entry)
    }

    /// All entries, newest first.
    pub fn entries(&self) -> Result<Vec<JournalEntry>> {
        JOURNAL.load(self.store)
    }

    /// Entries attributed to a specific day, newest first.
    pub fn entries_on(&self, day: DayKey) -> Result<Vec<JournalEntry>> {
        Ok(self
            .entries()?
            .into_iter()
            .filter(|e| e.day == day)
            .collect())
    }

    /// Today's entries.
    pub fn entries_today(&self) -> Result<Vec<JournalEntry>> {
        self.entries_on(DayKey::today())
    }

    /// Delete the entry with the given id. Returns whether a record matched.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let entries = self.entries()?;
        let before = entries.len();
        let kept: Vec<JournalEntry> = entries.into_iter().filter(|e| e.id != id).collect();
        if kept.len() == before {
            return Ok(false);
        }
        JOURNAL.replace(self.store, &kept)?;
        Ok(true)
    }

    /// Overall statistics anchored at today.
    pub fn stats(&self) -> Result<JournalStats> {
        self.stats_on(DayKey::today())
    }

    /// Overall statistics anchored at an explicit day.
    pub fn stats_on(&self, today: DayKey) -> Result<JournalStats> {
        let entries = self.entries()?;
        let present = streak::present_days(entries.iter().map(|e| e.day));
        let mut mood_counts: HashMap<Mood, u32> = HashMap::new();
        for entry in &entries {
            *mood_counts.entry(entry.mood).or_insert(0) += 1;
        }
        Ok(JournalStats {
            total_entries: entries.len() as u32,
            unique_days: present.len() as u32,
            current_streak: streak::run_ending_at(&present, today),
            mood_counts,
            last_entry: entries.first().cloned(),
        })
    }

    /// Entries of a month bucketed by day of month.
    pub fn calendar(&self, year: i32, month: u32) -> Result<BTreeMap<u32, Vec<JournalEntry>>> {
        let mut buckets: BTreeMap<u32, Vec<JournalEntry>> = BTreeMap::new();
        for entry in self.entries()? {
            if entry.day.in_month(year, month) {
                buckets
                    .entry(entry.day.day_of_month())
                    .or_default()
                    .push(entry);
            }
        }
        Ok(buckets)
    }

    /// Single-pass statistics over one month's entries.
    pub fn monthly_stats(&self, year: i32, month: u32) -> Result<JournalMonthlyStats> {
        let mut total = 0u32;
        let mut words = 0u32;
        let mut days = std::collections::HashSet::new();
        let mut mood_counts: HashMap<Mood, u32> = HashMap::new();
        for entry in self.entries()? {
            if !entry.day.in_month(year, month) {
                continue;
            }
            total += 1;
            words += word_count(&entry.text);
            days.insert(entry.day);
            *mood_counts.entry(entry.mood).or_insert(0) += 1;
        }
        let days_in_month = DayKey::days_in_month(year, month);
        Ok(JournalMonthlyStats {
            total_entries: total,
            days_with_entries: days.len() as u32,
            average_per_day: if days_in_month == 0 {
                0.0
            } else {
                f64::from(total) / f64::from(days_in_month)
            },
            average_words: if total == 0 {
                0.0
            } else {
                f64::from(words) / f64::from(total)
            },
            mood_counts,
        })
    }

    /// Summaries for the 7 consecutive days starting at `week_start`.
    ///
    /// Always exactly 7 elements; days without entries appear with zero
    /// counts.
    pub fn weekly(&self, week_start: DayKey) -> Result<Vec<JournalDaySummary>> {
        let entries = self.entries()?;
        let mut summaries = Vec::with_capacity(7);
        let mut day = week_start;
        for _ in 0..7 {
            let mut count = 0u32;
            let mut words = 0u32;
            for entry in entries.iter().filter(|e| e.day == day) {
                count += 1;
                words += word_count(&entry.text);
            }
            summaries.push(JournalDaySummary {
                day,
                label: day.weekday_label(),
                entries: count,
                words,
            });
            day = day.succ();
        }
        Ok(summaries)
    }
}
