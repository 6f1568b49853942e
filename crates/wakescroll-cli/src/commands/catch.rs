use clap::Subcommand;
use wakescroll_core::{Store, XpLedger};

#[derive(Subcommand)]
pub enum CatchAction {
    /// Record one caught scroll (awards 1 XP)
    Tap,
    /// Per-day tap records
    Show,
}

pub fn run(action: CatchAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = Store::open()?;
    let xp = XpLedger::new(&store);

    match action {
        CatchAction::Tap => {
            let total = xp.catch_scroll_tap()?;
            println!("{total}");
        }
        CatchAction::Show => {
            println!("{}", serde_json::to_string_pretty(&xp.catch_scroll_days()?)?);
        }
    }
    Ok(())
}
