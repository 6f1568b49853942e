//! # Wake Scroll Core Library
//!
//! This library provides the core bookkeeping logic for Wake Scroll, a
//! mindfulness companion that rewards users for scrolling less. It implements
//! a CLI-first philosophy where all operations are available via a standalone
//! CLI binary, with any GUI shell being a thin layer over the same core
//! library.
//!
//! ## Architecture
//!
//! - **Storage**: a SQLite-backed string key-value store; every durable log
//!   is a JSON array kept under a single key with a fixed retention bound
//! - **Ledger**: XP totals, daily XP history, and a self-healing streak
//!   derived from the history log
//! - **Aggregators**: journal entries and completed focus sessions with
//!   per-day, weekly, monthly, and calendar summaries
//! - **Rating**: pure scoring functions behind the onboarding quiz
//!
//! ## Key Components
//!
//! - [`Store`]: durable key-value store with transactional multi-key updates
//! - [`XpLedger`]: reward points and streak bookkeeping
//! - [`Journal`]: mood-tagged journal entries and their statistics
//! - [`TimerLog`]: completed focus sessions and their statistics
//! - [`FocusTimer`]: wall-clock countdown state machine

pub mod config;
pub mod day;
pub mod error;
pub mod goals;
pub mod journal;
pub mod ledger;
pub mod rating;
pub mod storage;
pub mod streak;
pub mod timer;

pub use config::{Config, NotificationsConfig, RewardsConfig};
pub use day::DayKey;
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use goals::{FocusGoal, Goals};
pub use journal::{Journal, JournalDaySummary, JournalEntry, JournalMonthlyStats, JournalStats, Mood};
pub use ledger::{CatchScrollDay, XpEvent, XpLedger};
pub use rating::{LifestyleRating, PotentialRating};
pub use storage::{Kv, Store};
pub use timer::{FocusState, FocusTimer, SessionLength, TimerDaySummary, TimerLog, TimerMonthlyStats, TimerSession, TimerStats};
