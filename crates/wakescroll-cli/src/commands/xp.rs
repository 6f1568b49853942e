use clap::Subcommand;
use wakescroll_core::{Store, XpLedger};

#[derive(Subcommand)]
pub enum XpAction {
    /// Total XP and current streak
    Show,
    /// Award XP directly
    Add { amount: u32 },
    /// XP earned today
    Today,
    /// Daily XP history
    History,
    /// Current streak
    Streak,
    /// Recompute the streak from history and repair the stored value
    Validate,
}

pub fn run(action: XpAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = Store::open()?;
    let xp = XpLedger::new(&store);

    match action {
        XpAction::Show => {
            let summary = serde_json::json!({
                "total": xp.total()?,
                "today": xp.today()?,
                "streak": xp.streak()?,
                "last_interaction": xp.last_interaction()?,
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        XpAction::Add { amount } => {
            let total = xp.add(amount)?;
            println!("{total}");
        }
        XpAction::Today => {
            println!("{}", xp.today()?);
        }
        XpAction::History => {
            println!("{}", serde_json::to_string_pretty(&xp.history()?)?);
        }
        XpAction::Streak => {
            println!("{}", xp.streak()?);
        }
        XpAction::Validate => {
            let streak = xp.validate_and_fix_streak()?;
            println!("{streak}");
        }
    }
    Ok(())
}
