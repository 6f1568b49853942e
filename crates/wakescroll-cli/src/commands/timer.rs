use std::io::Write;

use clap::Subcommand;
use wakescroll_core::{
    Config, DayKey, FocusState, FocusTimer, SessionLength, Store, TimerLog, XpLedger,
};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Record an already-finished session (awards the configured XP)
    Log {
        /// One of the presets: 10, 15, 25, 40
        minutes: u32,
    },
    /// Run a countdown in the foreground; completion records the session
    Run {
        /// One of the presets: 10, 15, 25, 40
        minutes: u32,
    },
    /// The preset session lengths
    Presets,
    /// All sessions, newest first
    List,
    /// Today's sessions
    Today,
    /// Overall statistics
    Stats,
    /// Sessions of a month bucketed by day
    Calendar { year: i32, month: u32 },
    /// One month's statistics
    Month { year: i32, month: u32 },
    /// Seven-day summary starting at the given day (default: today)
    Week {
        /// Week start as YYYY-MM-DD
        start: Option<String>,
    },
    /// Delete a session by id
    Delete { id: String },
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = Store::open()?;
    let timers = TimerLog::new(&store);

    match action {
        TimerAction::Log { minutes } => {
            let length = SessionLength::try_from(minutes)?;
            let session = timers.save(length)?;
            award_xp(&store)?;
            println!("{}", serde_json::to_string_pretty(&session)?);
        }
        TimerAction::Run { minutes } => {
            let length = SessionLength::try_from(minutes)?;
            let mut timer = FocusTimer::new(length);
            timer.start();
            loop {
                match timer.tick() {
                    FocusState::Completed => break,
                    FocusState::Running => {
                        let remaining = timer.remaining_ms() / 1000;
                        print!("\r{:02}:{:02} remaining ", remaining / 60, remaining % 60);
                        std::io::stdout().flush()?;
                        std::thread::sleep(std::time::Duration::from_millis(250));
                    }
                    // Idle/Cancelled cannot be reached once started.
                    _ => break,
                }
            }
            println!();
            if let Some(session) = timer.into_session(&timers)? {
                award_xp(&store)?;
                println!("{}", serde_json::to_string_pretty(&session)?);
            }
        }
        TimerAction::Presets => {
            let presets: Vec<u32> = SessionLength::ALL.iter().map(|l| l.minutes()).collect();
            println!("{}", serde_json::to_string_pretty(&presets)?);
        }
        TimerAction::List => {
            println!("{}", serde_json::to_string_pretty(&timers.sessions()?)?);
        }
        TimerAction::Today => {
            println!("{}", serde_json::to_string_pretty(&timers.sessions_today()?)?);
        }
        TimerAction::Stats => {
            println!("{}", serde_json::to_string_pretty(&timers.stats()?)?);
        }
        TimerAction::Calendar { year, month } => {
            println!("{}", serde_json::to_string_pretty(&timers.calendar(year, month)?)?);
        }
        TimerAction::Month { year, month } => {
            println!("{}", serde_json::to_string_pretty(&timers.monthly_stats(year, month)?)?);
        }
        TimerAction::Week { start } => {
            let start = match start {
                Some(s) => s.parse()?,
                None => DayKey::today(),
            };
            println!("{}", serde_json::to_string_pretty(&timers.weekly(start)?)?);
        }
        TimerAction::Delete { id } => {
            if timers.delete(&id)? {
                println!("deleted {id}");
            } else {
                eprintln!("no session with id {id}");
            }
        }
    }
    Ok(())
}

fn award_xp(store: &Store) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    if config.rewards.timer_xp > 0 {
        XpLedger::new(store).add(config.rewards.timer_xp)?;
    }
    Ok(())
}
