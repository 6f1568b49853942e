use clap::Subcommand;
use wakescroll_core::{Config, DayKey, Journal, Mood, Store, XpLedger};

#[derive(Subcommand)]
pub enum JournalAction {
    /// Save an entry (awards the configured XP)
    Add {
        text: String,
        /// Mood emoji or name (great, good, neutral, low, stressed)
        #[arg(default_value = "neutral")]
        mood: String,
    },
    /// All entries, newest first
    List,
    /// Today's entries
    Today,
    /// Overall statistics
    Stats,
    /// Entries of a month bucketed by day
    Calendar { year: i32, month: u32 },
    /// One month's statistics
    Month { year: i32, month: u32 },
    /// Seven-day summary starting at the given day (default: today)
    Week {
        /// Week start as YYYY-MM-DD
        start: Option<String>,
    },
    /// Delete an entry by id
    Delete { id: String },
}

pub fn run(action: JournalAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = Store::open()?;
    let journal = Journal::new(&store);

    match action {
        JournalAction::Add { text, mood } => {
            let mood: Mood = mood.parse()?;
            let entry = journal.save(&text, mood)?;
            let config = Config::load()?;
            if config.rewards.journal_xp > 0 {
                XpLedger::new(&store).add(config.rewards.journal_xp)?;
            }
            println!("{}", serde_json::to_string_pretty(&entry)?);
        }
        JournalAction::List => {
            println!("{}", serde_json::to_string_pretty(&journal.entries()?)?);
        }
        JournalAction::Today => {
            println!("{}", serde_json::to_string_pretty(&journal.entries_today()?)?);
        }
        JournalAction::Stats => {
            println!("{}", serde_json::to_string_pretty(&journal.stats()?)?);
        }
        JournalAction::Calendar { year, month } => {
            println!("{}", serde_json::to_string_pretty(&journal.calendar(year, month)?)?);
        }
        JournalAction::Month { year, month } => {
            println!("{}", serde_json::to_string_pretty(&journal.monthly_stats(year, month)?)?);
        }
        JournalAction::Week { start } => {
            let start = match start {
                Some(s) => s.parse()?,
                None => DayKey::today(),
            };
            println!("{}", serde_json::to_string_pretty(&journal.weekly(start)?)?);
        }
        JournalAction::Delete { id } => {
            if journal.delete(&id)? {
                println!("deleted {id}");
            } else {
                eprintln!("no entry with id {id}");
            }
        }
    }
    Ok(())
}
